//! スプレッドシート取り込みモジュール
//!
//! 先頭シートの1行目を見出しとして、各行を `Record` に変換する。
//!
//! - 空の見出しは `__EMPTY`, `__EMPTY_1`, ... を割り当てる
//! - 重複した見出しは `Name_1`, `Name_2`, ... とする
//! - 全セルが空の行は読み飛ばす

use crate::error::{PayrollError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use omvetan_common::types::{CellValue, Record, PLACEHOLDER_PREFIX};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

/// 受け付ける拡張子
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// 拡張子が対応形式か確認
pub fn check_extension(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(PayrollError::UnsupportedFormat(path.display().to_string()))
    }
}

/// ファイルを非同期で読み込み、レコードに変換
pub async fn read_spreadsheet(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(PayrollError::FileNotFound(path.display().to_string()));
    }
    check_extension(path)?;

    let bytes = tokio::fs::read(path).await?;
    parse_workbook(bytes)
}

/// ブロッキング版（デスクトップのワーカースレッド用）
pub fn read_spreadsheet_blocking(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(PayrollError::FileNotFound(path.display().to_string()));
    }
    check_extension(path)?;

    let bytes = std::fs::read(path)?;
    parse_workbook(bytes)
}

/// バイト列からレコードを生成
pub fn parse_workbook(bytes: Vec<u8>) -> Result<Vec<Record>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| PayrollError::Parse(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| PayrollError::Parse("workbook has no sheets".into()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| PayrollError::Parse(format!("{}: {}", sheet_name, e)))?;

    let records = records_from_range(&range);
    tracing::debug!(sheet = %sheet_name, records = records.len(), "シート取り込み完了");
    Ok(records)
}

/// セル範囲をレコード列に変換
pub fn records_from_range(range: &Range<Data>) -> Vec<Record> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let keys = header_keys(header);

    rows.filter(|row| !row.iter().all(|c| cell_value(c).is_blank()))
        .map(|row| {
            keys.iter()
                .enumerate()
                .map(|(i, key)| (key.clone(), row.get(i).map(cell_value).unwrap_or_default()))
                .collect::<Record>()
        })
        .collect()
}

/// 見出し行から列キーを生成
fn header_keys(header: &[Data]) -> Vec<String> {
    let mut used = HashSet::new();

    header
        .iter()
        .map(|cell| {
            // 見出しの前後の空白はキーにそのまま残す
            let text = cell_value(cell).to_string();
            let base = if text.is_empty() { PLACEHOLDER_PREFIX.to_string() } else { text };

            let mut key = base.clone();
            let mut n = 0;
            while used.contains(&key) {
                n += 1;
                key = format!("{}_{}", base, n);
            }
            used.insert(key.clone());
            key
        })
        .collect()
}

/// calamineのセル値を変換
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Blank,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // 日付はシリアル値のまま
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
