pub mod pdf;

use crate::config::Config;
use crate::error::Result;
use chrono::{DateTime, Local, NaiveDate};
use omvetan_common::export::pdf_core::SlipLayoutOptions;
use omvetan_common::Slip;
use std::path::{Path, PathBuf};

/// 出力ファイル名: `<prefix>_YYYY-MM-DD.pdf`
pub fn batch_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.pdf", prefix, date.format("%Y-%m-%d"))
}

/// ディレクトリ（または拡張子なし）ならその中に既定名で、そうでなければそのまま
pub fn output_path_for(output: &Path, file_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(file_name)
    } else {
        output.to_path_buf()
    }
}

/// 書き出し結果
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    pub slips: usize,
    pub pages: usize,
}

/// 明細をPDFに書き出す
///
/// `now` はファイル名の日付と「Generated on」に使う。
pub fn export_slips(
    slips: &[Slip],
    output: &Path,
    header: &str,
    config: &Config,
    now: DateTime<Local>,
    show_progress: bool,
) -> Result<ExportReport> {
    let file_name = batch_file_name(&config.file_prefix, now.date_naive());
    let path = output_path_for(output, &file_name);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SlipLayoutOptions {
        header: header.to_string(),
        generated_on: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        two_column_threshold: config.two_column_threshold,
    };

    tracing::info!(slips = slips.len(), path = %path.display(), "PDF書き出し開始");
    let pages = pdf::generate_pdf(slips, &path, &options, show_progress)?;

    Ok(ExportReport {
        path,
        slips: slips.len(),
        pages,
    })
}
