//! Subcommand implementations.

use crate::args::{BatchArgs, InitArgs, PipelineArgs, RunArgs};
use crate::display;
use chrono::Utc;
use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::Result;
use colored::Colorize;
use sk_core::config::loader::{load_config_with_env, CONFIG_DIR};
use sk_core::config::models::AppConfig;
use sk_core::export::{export_filename, write_export, ExportFormat};
use sk_core::init::{generate_summary_kit_structure, InitOptions};
use sk_core::llm::ClientFactory;
use sk_core::session::Session;
use sk_protocol::document_models::DocumentKind;
use sk_protocol::ipc::Event;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::info;

const LOG_TAIL: usize = 5;

pub async fn init(root: &Path, args: InitArgs) -> Result<()> {
    let options = InitOptions {
        target_dir: root.to_path_buf(),
        force: args.force,
        minimal: args.minimal,
    };
    generate_summary_kit_structure(options).await?;

    println!(
        "{} {}",
        "Initialized".green().bold(),
        root.join(CONFIG_DIR).display()
    );
    Ok(())
}

pub async fn run(root: &Path, args: RunArgs) -> Result<()> {
    let config = load(root, &args.pipeline).await?;
    let (tx, rx) = mpsc::channel(256);
    let printer = tokio::spawn(display::follow_events(rx, false));
    let session = new_session(&config, tx)?;

    let (filename, kind, bytes) = read_document(&args.file).await?;
    let outcome = session
        .process_upload(filename, &bytes, kind, args.pipeline.format_template.clone())
        .await;

    drop(session);
    let _ = printer.await;
    let result = outcome?;

    display::print_template_issues(&result.template_issues);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.final_summary);
    }

    if let Some(out) = &args.out {
        let format = args
            .format
            .or_else(|| ExportFormat::from_path(out))
            .unwrap_or_default();
        let path = if out.is_dir() {
            out.join(export_filename(Utc::now(), format))
        } else {
            out.clone()
        };
        write_export(&path, &result.final_summary, format)?;
        eprintln!("{} {}", "Saved".green().bold(), path.display());
    }

    if args.show_logs {
        println!();
        display::print_log_tail(&result.interaction_log, LOG_TAIL);
    }

    Ok(())
}

pub async fn batch(root: &Path, args: BatchArgs) -> Result<()> {
    let config = load(root, &args.pipeline).await?;
    let (tx, rx) = mpsc::channel(1024);
    let printer = tokio::spawn(display::follow_events(rx, true));
    let session = Arc::new(new_session(&config, tx)?);

    let mut runs = JoinSet::new();
    for path in args.files {
        let session = Arc::clone(&session);
        let format_template = args.pipeline.format_template.clone();
        runs.spawn(async move {
            let (filename, kind, bytes) = read_document(&path).await?;
            session
                .process_upload(filename, &bytes, kind, format_template)
                .await
                .wrap_err_with(|| format!("Failed to summarize {}", path.display()))
        });
    }

    let total = runs.len();
    let mut failed = 0;
    while let Some(joined) = runs.join_next().await {
        match joined {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                failed += 1;
                eprintln!("{} {e:#}", "error:".red().bold());
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {e}", "error:".red().bold());
            }
        }
    }

    let history = session.recent_history(config.global.history.display_limit).await;
    drop(session);
    let _ = printer.await;

    println!();
    display::print_history(&history);

    if failed > 0 {
        bail!("{failed} of {total} documents failed");
    }
    Ok(())
}

async fn load(root: &Path, pipeline: &PipelineArgs) -> Result<AppConfig> {
    let mut config = load_config_with_env(root)
        .await
        .wrap_err("Failed to load .summary-kit configuration")?;
    if let Some(provider) = &pipeline.provider {
        config.global.llm.provider = provider.clone();
    }
    Ok(config)
}

fn new_session(config: &AppConfig, tx: mpsc::Sender<Event>) -> Result<Session> {
    let client = ClientFactory::create(config).map_err(|e| eyre!("{e:#}"))?;
    let session = Session::from_config(config, client, tx);
    info!(session_id = %session.id(), "Session started");
    Ok(session)
}

async fn read_document(path: &Path) -> Result<(String, DocumentKind, Vec<u8>)> {
    let kind = DocumentKind::from_path(path).ok_or_else(|| {
        eyre!(
            "Unsupported file type: {} (expected .txt, .md, .pdf or .docx)",
            path.display()
        )
    })?;
    let bytes = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok((filename, kind, bytes))
}
