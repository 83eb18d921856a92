//! ログ出力設定
//!
//! `tracing` + `tracing-subscriber`。`RUST_LOG` があればそちらを優先する。
//! アクティビティログ（画面表示用）とは別に、各処理の経過を構造化ログで出す。

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログ形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// ログ設定
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
}

impl LogConfig {
    /// `--verbose` の有無からレベルを決める
    pub fn from_verbose(verbose: bool, format: LogFormat) -> Self {
        Self {
            level: if verbose { Level::DEBUG } else { Level::WARN },
            format,
        }
    }
}

/// グローバルsubscriberを登録（2回目以降は何もしない）
pub fn init_logging(config: &LogConfig) {
    let filter = build_env_filter(config.level);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().without_time().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().without_time().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("ログ初期化をスキップ: {}", e);
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // 外部クレートは warn に抑える
        EnvFilter::new(format!(
            "warn,omvetan={level},omvetan_payroll={level},omvetan_common={level}",
            level = level_str
        ))
    })
}
