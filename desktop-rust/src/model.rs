use omvetan_common::Record;
use omvetan_payroll::config::Config;
use omvetan_payroll::Result;

/// 入力フォーム
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub targets: String,
    pub fields: String,
    pub header: String,
}

/// ワーカースレッドからの通知
pub enum UiMessage {
    Initialized(Result<Config>),
    Imported { name: String, result: Result<Vec<Record>> },
}
