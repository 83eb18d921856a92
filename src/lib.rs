//! OmVetan Payroll
//!
//! スプレッドシートから給与明細PDFを一括生成する。
//! 照合・明細生成・ページ割りは `omvetan_common`、ファイル入出力とセッション管理はこちら。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod importer;
pub mod logging;
pub mod session;

pub use error::{PayrollError, Result};
pub use session::{ActivityEntry, LogLevel, Readiness, Session};
