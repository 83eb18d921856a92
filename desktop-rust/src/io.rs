use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use anyhow::{Context, Result};
use chrono::Local;
use omvetan_payroll::config::Config;
use omvetan_payroll::export::batch_file_name;
use omvetan_payroll::importer::{self, SUPPORTED_EXTENSIONS};

use crate::model::UiMessage;

/// 設定読み込みをバックグラウンドで実行
pub fn spawn_initialize(tx: Sender<UiMessage>) {
    std::thread::spawn(move || {
        let _ = tx.send(UiMessage::Initialized(Config::load()));
    });
}

/// スプレッドシート読み込みをバックグラウンドで実行
pub fn spawn_import(path: PathBuf, name: String, tx: Sender<UiMessage>) {
    std::thread::spawn(move || {
        let result = importer::read_spreadsheet_blocking(&path);
        let _ = tx.send(UiMessage::Imported { name, result });
    });
}

pub fn pick_spreadsheet() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Spreadsheet", SUPPORTED_EXTENSIONS)
        .pick_file()
}

/// 保存先を選ぶ（既定名は `<prefix>_YYYY-MM-DD.pdf`）
pub fn pick_pdf_destination(prefix: &str) -> Result<Option<PathBuf>> {
    let default_name = batch_file_name(prefix, Local::now().date_naive());
    let start_dir = std::env::current_dir().context("カレントディレクトリを取得できません")?;
    Ok(rfd::FileDialog::new()
        .add_filter("PDF", &["pdf"])
        .set_directory(start_dir)
        .set_file_name(default_name)
        .save_file()
        .map(|path| with_pdf_extension(&path)))
}

/// 拡張子が無ければ `.pdf` を付ける（フォルダとして扱われないように）
pub fn with_pdf_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("pdf")
    }
}
