use chrono::Local;
use clap::Parser;
use omvetan_payroll::{cli, config, error, logging, session};
use cli::{Cli, Commands};
use config::Config;
use error::{PayrollError, Result};
use session::{Readiness, Session};
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&logging::LogConfig::from_verbose(cli.verbose, cli.log_format));

    match cli.command {
        Commands::Inspect { file } => {
            println!("📊 omvetan - 読み込み確認\n");

            let session = open_session(&file, cli.verbose).await?;
            let records = session.records();
            println!("✔ {}件のレコード", records.len());
            if let Some(first) = records.first() {
                println!("列:");
                for key in first.keys() {
                    println!("  - {}", key);
                }
            }
        }

        Commands::Prepare { file, targets, fields, json } => {
            println!("🔍 omvetan - 明細プレビュー\n");

            println!("[1/2] ファイルを読み込み中...");
            let mut session = open_session(&file, cli.verbose).await?;
            println!("✔ {}件のレコード\n", session.records().len());

            println!("[2/2] 対象者を照合中...");
            if let Err(e) = session.prepare(&targets, &fields) {
                print_activity(&session);
                return Err(e);
            }
            print_preview(&session);

            if let Some(path) = json {
                let content = serde_json::to_string_pretty(session.slips())?;
                std::fs::write(&path, content)?;
                println!("\n✔ 明細を保存: {}", path.display());
            }

            if cli.verbose {
                print_activity(&session);
            }
        }

        Commands::Export { file, targets, fields, header, output } => {
            println!("🚀 omvetan - 一括出力\n");

            println!("[1/3] ファイルを読み込み中...");
            let mut session = open_session(&file, cli.verbose).await?;
            println!("✔ {}件のレコード\n", session.records().len());

            println!("[2/3] 対象者を照合中...");
            if let Err(e) = session.prepare(&targets, &fields) {
                print_activity(&session);
                return Err(e);
            }
            println!("✔ {}件の明細\n", session.slips().len());

            println!("[3/3] PDFを生成中...");
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            let report = match session.export(&output, header.as_deref(), Local::now(), !cli.verbose) {
                Ok(report) => report,
                Err(e) => {
                    print_activity(&session);
                    return Err(e);
                }
            };
            println!("✔ {}ページを出力: {}", report.pages, report.path.display());

            if cli.verbose {
                print_activity(&session);
            }
            println!("\n✅ 完了");
        }

        Commands::Config { show, set_header, reset } => {
            let mut config = if reset {
                let config = Config::default();
                config.save()?;
                println!("✔ 設定を初期化しました");
                config
            } else {
                Config::load()?
            };

            if let Some(header) = set_header {
                config.set_slip_header(header)?;
                println!("✔ PDFタイトルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!("  PDFタイトル: {}", config.slip_header);
                println!("  ファイル名接頭辞: {}", config.file_prefix);
                println!("  2段組の閾値: {}項目", config.two_column_threshold);
            }
        }
    }

    Ok(())
}

/// 初期化してファイルを取り込む。失敗時はアクティビティログを表示する。
async fn open_session(file: &Path, verbose: bool) -> Result<Session> {
    let mut session = Session::new();

    if let Readiness::Failed(reason) = session.initialize().await.clone() {
        print_activity(&session);
        return Err(PayrollError::ModuleLoad(reason));
    }

    if let Err(e) = session.import_file(file).await {
        print_activity(&session);
        return Err(e);
    }

    if verbose {
        print_activity(&session);
    }
    Ok(session)
}

fn print_preview(session: &Session) {
    println!("✔ {}件の明細", session.slips().len());
    for slip in session.slips() {
        println!("  {:<28} {} nodes mapped", slip.name, slip.stats.len());
    }
}

fn print_activity(session: &Session) {
    eprintln!("\nアクティビティ:");
    for entry in session.log() {
        eprintln!("  {}", entry);
    }
}
