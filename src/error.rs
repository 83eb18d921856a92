use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayrollError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("Failed to load modules: {0}")]
    ModuleLoad(String),

    #[error("Error parsing file: {0}")]
    Parse(String),

    #[error("Unsupported spreadsheet format: {0} (use .xlsx or .xls)")]
    UnsupportedFormat(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("System not ready: {0}")]
    NotReady(String),

    #[error(transparent)]
    Common(#[from] omvetan_common::Error),

    #[error("No slips to export. Prepare records first.")]
    NothingToExport,

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PayrollError>;
