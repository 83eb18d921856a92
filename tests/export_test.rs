//! 取り込みからPDF出力までの統合テスト

use chrono::{Local, TimeZone};
use omvetan_common::{CellValue, SlipStat};
use omvetan_payroll::config::Config;
use omvetan_payroll::{PayrollError, Readiness, Session};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Name / Basic / Net の3列 + 部署名だけが値として入った列
fn write_staff_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("staff.xlsx");
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();

    ws.write_string(0, 0, "Name").unwrap();
    ws.write_string(0, 1, "Basic").unwrap();
    ws.write_string(0, 2, "Net").unwrap();

    ws.write_string(1, 0, "Alice").unwrap();
    ws.write_number(1, 1, 5000).unwrap();
    ws.write_number(1, 2, 4800).unwrap();

    ws.write_string(2, 0, "Bob").unwrap();
    ws.write_number(2, 1, 6000).unwrap();
    ws.write_number(2, 2, 5700).unwrap();

    workbook.save(&path).expect("xlsx保存失敗");
    path
}

fn fixed_now() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2026, 3, 7, 9, 30, 0).single().expect("日時生成失敗")
}

async fn ready_session() -> Session {
    let mut session = Session::new();
    let readiness = session.initialize_with(async { Ok(Config::default()) }).await;
    assert_eq!(readiness, &Readiness::Ready);
    session
}

#[tokio::test]
async fn test_single_target_all_columns() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = write_staff_workbook(dir.path());

    let mut session = ready_session().await;
    assert_eq!(session.import_file(&file).await.unwrap(), 2);
    assert_eq!(session.prepare("alice", "").unwrap(), 1);

    let slip = &session.slips()[0];
    assert_eq!(slip.name, "Alice");
    assert_eq!(
        slip.stats,
        vec![
            SlipStat { label: "Name".into(), value: CellValue::Text("Alice".into()) },
            SlipStat { label: "Basic".into(), value: CellValue::Number(5000.0) },
            SlipStat { label: "Net".into(), value: CellValue::Number(4800.0) },
        ]
    );
}

#[tokio::test]
async fn test_wildcard_export_writes_batch_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = write_staff_workbook(dir.path());
    let out_dir = dir.path().join("out");

    let mut session = ready_session().await;
    session.import_file(&file).await.unwrap();
    assert_eq!(session.prepare("*", "Basic, Net").unwrap(), 2);
    for slip in session.slips() {
        let labels: Vec<&str> = slip.stats.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Basic", "Net"]);
    }

    let report = session.export(&out_dir, None, fixed_now(), false).unwrap();
    assert_eq!(report.path, out_dir.join("OmVetan_Batch_2026-03-07.pdf"));
    assert_eq!(report.slips, 2);
    assert_eq!(report.pages, 2);

    let bytes = std::fs::read(&report.path).expect("PDF読み込み失敗");
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(session.last_entry().unwrap().message, "Batch exported successfully.");
}

#[tokio::test]
async fn test_no_match_produces_no_slips() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = write_staff_workbook(dir.path());

    let mut session = ready_session().await;
    session.import_file(&file).await.unwrap();
    session.prepare("*", "").unwrap();

    let result = session.prepare("zzz", "");
    assert!(result.is_err());
    assert!(session.slips().is_empty());

    let export = session.export(dir.path(), None, fixed_now(), false);
    assert!(matches!(export, Err(PayrollError::NothingToExport)));
}

#[tokio::test]
async fn test_field_resolved_by_cell_value() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("dept.xlsx");
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    // 2列目の見出しが空で、1行目の値が見出し代わり
    ws.write_string(0, 0, "Name").unwrap();
    ws.write_string(1, 0, "Header").unwrap();
    ws.write_string(1, 1, "Department").unwrap();
    ws.write_string(2, 0, "Alice").unwrap();
    ws.write_string(2, 1, "Finance").unwrap();
    workbook.save(&path).unwrap();

    let mut session = ready_session().await;
    session.import_file(&path).await.unwrap();
    session.prepare("alice", "department").unwrap();

    let slip = &session.slips()[0];
    assert_eq!(slip.stats.len(), 1);
    assert_eq!(slip.stats[0].label, "Department");
    assert_eq!(slip.stats[0].value, CellValue::Text("Finance".into()));
}

#[tokio::test]
async fn test_long_slip_spills_to_continuation_pages() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("wide.xlsx");
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.write_string(0, 0, "Name").unwrap();
    ws.write_string(1, 0, "Alice").unwrap();
    for col in 1..=120u16 {
        ws.write_string(0, col, format!("Allowance {}", col)).unwrap();
        ws.write_number(1, col, col as f64 * 10.0).unwrap();
    }
    workbook.save(&path).unwrap();

    let mut session = ready_session().await;
    session.import_file(&path).await.unwrap();
    session.prepare("alice", "").unwrap();
    assert_eq!(session.slips()[0].stats.len(), 121);

    let report = session
        .export(&dir.path().join("wide.pdf"), Some("Payroll March"), fixed_now(), false)
        .unwrap();
    assert_eq!(report.path, dir.path().join("wide.pdf"));
    assert_eq!(report.slips, 1);
    assert!(report.pages > 1, "長い明細は続きのページに分割される");
}

#[tokio::test]
async fn test_failed_import_keeps_previous_records() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = write_staff_workbook(dir.path());
    let broken = dir.path().join("broken.xlsx");
    std::fs::write(&broken, b"not a zip").unwrap();

    let mut session = ready_session().await;
    session.import_file(&file).await.unwrap();

    let result = session.import_file(&broken).await;
    assert!(matches!(result, Err(PayrollError::Parse(_))));
    assert_eq!(session.records().len(), 2);
    assert_eq!(session.source_name(), Some("staff.xlsx"));
}

#[tokio::test]
async fn test_padded_header_kept_as_label() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("padded.xlsx");
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.write_string(0, 0, "Name").unwrap();
    ws.write_string(0, 1, " Net ").unwrap();
    ws.write_string(1, 0, "Alice").unwrap();
    ws.write_number(1, 1, 4800).unwrap();
    workbook.save(&path).unwrap();

    let mut session = ready_session().await;
    session.import_file(&path).await.unwrap();

    session.prepare("alice", "").unwrap();
    assert_eq!(session.slips()[0].stats[1].label, " Net ");

    // 項目指定では前後の空白を無視して列を解決する
    session.prepare("alice", "Net").unwrap();
    assert_eq!(session.slips()[0].stats[0].label, "Net");
    assert_eq!(session.slips()[0].stats[0].value, CellValue::Number(4800.0));
}
