//! OmVetan Payroll Common Library
//!
//! CLIとデスクトップで共有される型・照合・明細生成・ページレイアウト

pub mod types;
pub mod layout;
pub mod metrics;
pub mod error;
pub mod matcher;
pub mod slip;
pub mod export;

pub use types::{CellValue, FieldMapping, FieldSelection, FieldSpec, Record, Slip, SlipStat, TargetSpec};
pub use error::{Error, Result};
pub use matcher::{match_records, MatchOutcome, UNKNOWN_NAME};
pub use slip::{build_slip, build_slips};
pub use export::pdf_core::{render_slips, SlipCanvas, SlipLayoutOptions};
