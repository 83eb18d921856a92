use crate::logging::LogFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "omvetan")]
#[command(about = "給与明細PDF一括生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ログ形式 (pretty/compact/json)
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スプレッドシートを読み込んで件数と列を表示
    Inspect {
        /// Excelファイル（.xlsx/.xls）
        #[arg(required = true)]
        file: PathBuf,
    },

    /// 対象者を照合して明細をプレビュー
    Prepare {
        /// Excelファイル（.xlsx/.xls）
        #[arg(required = true)]
        file: PathBuf,

        /// 対象者（カンマ区切り、`*` で全員）
        #[arg(short, long, required = true)]
        targets: String,

        /// 出力項目（カンマ区切り、省略時は全列）
        #[arg(short, long, default_value = "")]
        fields: String,

        /// 明細をJSONで保存
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// 照合からPDF出力まで一括実行
    Export {
        /// Excelファイル（.xlsx/.xls）
        #[arg(required = true)]
        file: PathBuf,

        /// 対象者（カンマ区切り、`*` で全員）
        #[arg(short, long, required = true)]
        targets: String,

        /// 出力項目（カンマ区切り、省略時は全列）
        #[arg(short, long, default_value = "")]
        fields: String,

        /// PDFタイトル（省略時は設定値）
        #[arg(long)]
        header: Option<String>,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定のPDFタイトルを設定
        #[arg(long)]
        set_header: Option<String>,

        /// 設定を初期値に戻す
        #[arg(long)]
        reset: bool,
    },
}
