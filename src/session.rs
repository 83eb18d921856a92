//! アプリケーション状態（UIシェル）
//!
//! 取り込んだレコード・生成済み明細・アクティビティログを保持する。
//! 照合と明細生成は `omvetan_common` の純粋関数に委ね、結果で状態を置き換える。
//! 失敗はすべてアクティビティログに記録し、状態は壊さない。

use crate::config::Config;
use crate::error::{PayrollError, Result};
use crate::export::{self, ExportReport};
use crate::importer;
use chrono::{DateTime, Local};
use omvetan_common::{build_slips, match_records, FieldSpec, Record, Slip, TargetSpec};
use std::fmt;
use std::future::Future;
use std::path::Path;

/// 初期化状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Uninitialized,
    Ready,
    Failed(String),
}

/// ログ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

/// アクティビティログの1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub time: String,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]  > {}", self.time, self.message)
    }
}

/// セッション
#[derive(Debug)]
pub struct Session {
    readiness: Readiness,
    config: Config,
    source_name: Option<String>,
    records: Vec<Record>,
    slips: Vec<Slip>,
    log: Vec<ActivityEntry>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let mut session = Self {
            readiness: Readiness::Uninitialized,
            config: Config::default(),
            source_name: None,
            records: Vec::new(),
            slips: Vec::new(),
            log: Vec::new(),
        };
        session.push(LogLevel::Success, "System ready.");
        session
    }

    // ============================================
    // 初期化
    // ============================================

    /// 設定を読み込んで Ready にする
    pub async fn initialize(&mut self) -> &Readiness {
        self.initialize_with(async {
            tokio::task::spawn_blocking(Config::load)
                .await
                .map_err(|e| PayrollError::ModuleLoad(e.to_string()))?
        })
        .await
    }

    /// 任意の読み込み処理で初期化（完了まで待つ）
    pub async fn initialize_with<F>(&mut self, loader: F) -> &Readiness
    where
        F: Future<Output = Result<Config>>,
    {
        self.begin_initialization();
        let result = loader.await;
        self.complete_initialization(result)
    }

    /// 初期化開始を記録
    pub fn begin_initialization(&mut self) {
        tracing::debug!("モジュール初期化開始");
        self.push(LogLevel::Info, "Connecting data modules...");
    }

    /// 初期化結果を反映（デスクトップのワーカースレッドからも使う）
    pub fn complete_initialization(&mut self, result: Result<Config>) -> &Readiness {
        match result {
            Ok(config) => {
                self.config = config;
                self.readiness = Readiness::Ready;
                self.push(LogLevel::Success, "Modules synchronized successfully.");
            }
            Err(e) => {
                tracing::error!(error = %e, "初期化失敗");
                self.readiness = Readiness::Failed(e.to_string());
                self.push(LogLevel::Error, "Failed to load modules.");
            }
        }
        &self.readiness
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    fn ensure_ready(&mut self) -> Result<()> {
        let reason = match &self.readiness {
            Readiness::Ready => return Ok(()),
            Readiness::Uninitialized => "modules not loaded yet".to_string(),
            Readiness::Failed(reason) => reason.clone(),
        };
        Err(self.fail(PayrollError::NotReady(reason)))
    }

    // ============================================
    // 取り込み
    // ============================================

    /// ファイルを取り込む。戻り値はレコード数。
    pub async fn import_file(&mut self, path: &Path) -> Result<usize> {
        let name = self.begin_import(path)?;
        let result = importer::read_spreadsheet(path).await;
        self.apply_import(&name, result)
    }

    /// 取り込み開始（Ready でなければ拒否）。戻り値は表示用のファイル名。
    pub fn begin_import(&mut self, path: &Path) -> Result<String> {
        self.ensure_ready()?;
        let name = display_name(path);
        self.push(LogLevel::Info, format!("Reading file: {}", name));
        Ok(name)
    }

    /// 取り込み結果を反映。成功時はレコードを置き換え、明細を破棄する。
    pub fn apply_import(&mut self, name: &str, result: Result<Vec<Record>>) -> Result<usize> {
        match result {
            Ok(records) => {
                let count = records.len();
                tracing::info!(file = %name, records = count, "取り込み完了");
                self.records = records;
                self.slips.clear();
                self.source_name = Some(name.to_string());
                self.push(LogLevel::Success, format!("Imported {} records.", count));
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "取り込み失敗");
                self.push(LogLevel::Error, "Error parsing file.");
                Err(e)
            }
        }
    }

    // ============================================
    // 照合・明細生成
    // ============================================

    /// 対象者・項目指定で明細を作り直す。戻り値は明細数。
    pub fn prepare(&mut self, targets: &str, fields: &str) -> Result<usize> {
        self.ensure_ready()?;

        let targets = TargetSpec::parse(targets);
        let fields = FieldSpec::parse(fields);

        let result = match_records(&self.records, &targets, &fields).map(|outcome| build_slips(&outcome));
        let slips = match result {
            Ok(slips) => slips,
            Err(omvetan_common::Error::NoMatch) => {
                self.slips.clear();
                return Err(self.fail(omvetan_common::Error::NoMatch.into()));
            }
            Err(e) => return Err(self.fail(e.into())),
        };

        let count = slips.len();
        tracing::info!(slips = count, "明細生成完了");
        self.slips = slips;
        self.push(LogLevel::Success, format!("Successfully prepared {} slips.", count));
        Ok(count)
    }

    // ============================================
    // 書き出し
    // ============================================

    /// 現在の明細をPDFに書き出す
    pub fn export(
        &mut self,
        output: &Path,
        header: Option<&str>,
        now: DateTime<Local>,
        show_progress: bool,
    ) -> Result<ExportReport> {
        self.ensure_ready()?;
        if self.slips.is_empty() {
            return Err(self.fail(PayrollError::NothingToExport));
        }

        let header = header.unwrap_or(&self.config.slip_header).to_string();
        match export::export_slips(&self.slips, output, &header, &self.config, now, show_progress) {
            Ok(report) => {
                self.push(LogLevel::Success, "Batch exported successfully.");
                Ok(report)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // ============================================
    // 参照
    // ============================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn slips(&self) -> &[Slip] {
        &self.slips
    }

    pub fn log(&self) -> &[ActivityEntry] {
        &self.log
    }

    /// 最後のログ
    pub fn last_entry(&self) -> Option<&ActivityEntry> {
        self.log.last()
    }

    fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log.push(ActivityEntry {
            time: Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        });
    }

    /// エラーをログに記録してそのまま返す
    fn fail(&mut self, error: PayrollError) -> PayrollError {
        tracing::warn!(error = %error, "操作失敗");
        self.push(LogLevel::Error, error.to_string());
        error
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use omvetan_common::CellValue;

    fn ready_session() -> Session {
        let mut session = Session::new();
        session.complete_initialization(Ok(Config::default()));
        session
    }

    fn employees() -> Vec<Record> {
        vec![
            [("Name", CellValue::from("Alice")), ("Basic", 5000.0.into()), ("Net", 4800.0.into())]
                .into_iter()
                .collect(),
            [("Name", CellValue::from("Bob")), ("Basic", 6000.0.into()), ("Net", 5700.0.into())]
                .into_iter()
                .collect(),
        ]
    }

    #[test]
    fn test_new_session_is_uninitialized() {
        let session = Session::new();
        assert_eq!(session.readiness(), &Readiness::Uninitialized);
        assert_eq!(session.log()[0].message, "System ready.");
    }

    #[tokio::test]
    async fn test_initialize_with_success() {
        let mut session = Session::new();
        let readiness = session.initialize_with(async { Ok(Config::default()) }).await;
        assert_eq!(readiness, &Readiness::Ready);
        assert_eq!(session.last_entry().unwrap().message, "Modules synchronized successfully.");
    }

    #[tokio::test]
    async fn test_initialize_with_failure() {
        let mut session = Session::new();
        let readiness = session
            .initialize_with(async { Err(PayrollError::Config("broken".into())) })
            .await
            .clone();
        assert!(matches!(readiness, Readiness::Failed(_)));
        assert_eq!(session.last_entry().unwrap().level, LogLevel::Error);

        // 初期化失敗後は照合できない
        let err = session.prepare("*", "").unwrap_err();
        assert!(matches!(err, PayrollError::NotReady(_)));
    }

    #[test]
    fn test_begin_import_requires_ready() {
        let mut session = Session::new();
        assert!(session.begin_import(Path::new("staff.xlsx")).is_err());

        session.complete_initialization(Ok(Config::default()));
        let name = session.begin_import(Path::new("/tmp/data/staff.xlsx")).unwrap();
        assert_eq!(name, "staff.xlsx");
        assert_eq!(session.last_entry().unwrap().message, "Reading file: staff.xlsx");
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let mut session = ready_session();
        let result = session.import_file(Path::new("/nonexistent/staff.xlsx")).await;
        assert!(matches!(result, Err(PayrollError::FileNotFound(_))));
        assert_eq!(session.last_entry().unwrap().message, "Error parsing file.");
        assert!(session.records().is_empty());
    }

    #[test]
    fn test_prepare_before_initialize_is_refused() {
        let mut session = Session::new();
        assert!(matches!(session.prepare("*", ""), Err(PayrollError::NotReady(_))));
    }

    #[test]
    fn test_prepare_without_records() {
        let mut session = ready_session();
        let err = session.prepare("alice", "").unwrap_err();
        assert!(matches!(err, PayrollError::Common(omvetan_common::Error::NoInputs)));
        assert_eq!(session.last_entry().unwrap().message, "Data source or targets missing.");
    }

    #[test]
    fn test_prepare_and_no_match_resets_slips() {
        let mut session = ready_session();
        session.apply_import("staff.xlsx", Ok(employees())).unwrap();

        assert_eq!(session.prepare("*", "Basic, Net").unwrap(), 2);
        assert_eq!(session.slips().len(), 2);
        assert_eq!(session.last_entry().unwrap().message, "Successfully prepared 2 slips.");

        let err = session.prepare("zzz", "").unwrap_err();
        assert!(matches!(err, PayrollError::Common(omvetan_common::Error::NoMatch)));
        assert!(session.slips().is_empty());
        assert_eq!(session.last_entry().unwrap().message, "No records found for specified targets.");
    }

    #[test]
    fn test_missing_targets_keep_previous_slips() {
        let mut session = ready_session();
        session.apply_import("staff.xlsx", Ok(employees())).unwrap();
        session.prepare("alice", "").unwrap();

        assert!(session.prepare("", "").is_err());
        assert_eq!(session.slips().len(), 1);
    }

    #[test]
    fn test_separator_only_targets_clear_slips() {
        let mut session = ready_session();
        session.apply_import("staff.xlsx", Ok(employees())).unwrap();
        session.prepare("alice", "").unwrap();

        let err = session.prepare(" , ", "").unwrap_err();
        assert!(matches!(err, PayrollError::Common(omvetan_common::Error::NoMatch)));
        assert!(session.slips().is_empty());
        assert_eq!(session.last_entry().unwrap().message, "No records found for specified targets.");
    }

    #[test]
    fn test_failed_import_keeps_records() {
        let mut session = ready_session();
        session.apply_import("staff.xlsx", Ok(employees())).unwrap();
        let result = session.apply_import("broken.xlsx", Err(PayrollError::Parse("bad zip".into())));

        assert!(result.is_err());
        assert_eq!(session.records().len(), 2);
        assert_eq!(session.source_name(), Some("staff.xlsx"));
        assert_eq!(session.last_entry().unwrap().message, "Error parsing file.");
    }

    #[test]
    fn test_new_import_replaces_records_and_clears_slips() {
        let mut session = ready_session();
        session.apply_import("a.xlsx", Ok(employees())).unwrap();
        session.prepare("*", "").unwrap();

        let count = session.apply_import("b.xlsx", Ok(employees()[..1].to_vec())).unwrap();
        assert_eq!(count, 1);
        assert_eq!(session.records().len(), 1);
        assert!(session.slips().is_empty());
        assert_eq!(session.last_entry().unwrap().message, "Imported 1 records.");
    }

    #[test]
    fn test_export_without_slips() {
        let mut session = ready_session();
        let err = session
            .export(Path::new("."), None, Local::now(), false)
            .unwrap_err();
        assert!(matches!(err, PayrollError::NothingToExport));
    }

    #[test]
    fn test_activity_entry_display() {
        let entry = ActivityEntry {
            time: "09:30:00".into(),
            level: LogLevel::Info,
            message: "Reading file: staff.xlsx".into(),
        };
        assert_eq!(entry.to_string(), "[09:30:00]  > Reading file: staff.xlsx");
    }
}
