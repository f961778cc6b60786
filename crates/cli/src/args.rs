use clap::{Args, Parser, Subcommand};
use sk_core::export::ExportFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "summarize", version)]
#[command(about = "Summarize client interaction documents for Relationship Managers")]
pub struct Cli {
    /// Project root containing `.summary-kit/`
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a `.summary-kit/` directory with default configuration
    Init(InitArgs),

    /// Summarize one document
    Run(RunArgs),

    /// Summarize several documents concurrently and list the history
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing `.summary-kit/`
    #[arg(long)]
    pub force: bool,

    /// Write `config.toml` only and keep the built-in stage personas
    #[arg(long)]
    pub minimal: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Document to summarize (.txt, .md; .pdf and .docx need an extractor)
    pub file: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Write the rendered summary to this file, or into this directory
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Export format; defaults to the extension of `--out`, then markdown
    #[arg(long, value_parser = parse_format)]
    pub format: Option<ExportFormat>,

    /// Print the last interaction log entries after the summary
    #[arg(long)]
    pub show_logs: bool,

    /// Print the full result as JSON instead of the summary text
    #[arg(long, conflicts_with = "show_logs")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Documents to summarize
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Extra formatting preferences passed to the summary stages
    #[arg(long)]
    pub format_template: Option<String>,

    /// Override the configured provider (azure, openai, mock)
    #[arg(long)]
    pub provider: Option<String>,
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse()
}
