//! `summarize`: turn client interaction documents into structured summaries.

mod args;
mod commands;
mod display;

use args::{Cli, Command};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // A missing .env is fine; real environment variables still apply
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "sk_core=info,summarize=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Init(args) => commands::init(&cli.root, args).await,
        Command::Run(args) => commands::run(&cli.root, args).await,
        Command::Batch(args) => commands::batch(&cli.root, args).await,
    }
}
