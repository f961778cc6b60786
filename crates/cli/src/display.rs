//! Terminal rendering of run progress, logs and history.
//!
//! Progress goes to stderr so stdout carries only the summary.

use colored::{ColoredString, Colorize};
use sk_protocol::ipc::Event;
use sk_protocol::log_models::InteractionLogEntry;
use sk_protocol::result_models::HistoryItem;
use sk_protocol::stage_models::StageStatus;
use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Fixed-width, colored status label.
pub fn status_label(status: StageStatus) -> ColoredString {
    let label = format!("{:<8}", status.as_str());
    match status {
        StageStatus::Waiting => label.dimmed(),
        StageStatus::Active => label.yellow().bold(),
        StageStatus::Complete => label.green().bold(),
        StageStatus::Error => label.red().bold(),
    }
}

/// Print events until every sender is dropped.
///
/// With `label_runs`, each line is prefixed with the run's file name so
/// concurrent runs can be told apart.
pub async fn follow_events(mut rx: mpsc::Receiver<Event>, label_runs: bool) {
    let mut filenames: HashMap<Uuid, String> = HashMap::new();

    while let Some(event) = rx.recv().await {
        let prefix = match event.run_id().and_then(|id| filenames.get(&id)) {
            Some(name) if label_runs => format!("[{name}] ").cyan().to_string(),
            _ => String::new(),
        };

        match event {
            Event::RunStarted { run_id, filename } => {
                eprintln!("{} {}", "▶".bold(), filename.bold());
                filenames.insert(run_id, filename);
            }
            Event::StageStatusUpdate { stage, status, task, .. } => {
                eprintln!(
                    "{prefix}  {:<10} {} {}",
                    stage.as_str(),
                    status_label(status),
                    task.dimmed()
                );
            }
            Event::InteractionLogged { .. } => {}
            Event::RunCompleted { .. } => {
                eprintln!("{prefix}{}", "✓ Summary ready".green());
            }
            Event::RunFailed { stage, error, .. } => {
                eprintln!("{prefix}{} {}", format!("✗ {stage} failed:").red().bold(), error);
            }
            Event::RunCancelled { stage, .. } => {
                eprintln!("{prefix}{}", format!("Cancelled during {stage}").yellow());
            }
            Event::HistoryUpdated { .. } => {}
        }
    }
}

/// Print the last `n` interaction log entries.
pub fn print_log_tail(entries: &[InteractionLogEntry], n: usize) {
    let start = entries.len().saturating_sub(n);
    println!("{}", "Interaction log".bold().underline());
    for entry in &entries[start..] {
        println!(
            "{} {:<16} {}",
            entry.time_label().dimmed(),
            entry.agent.agent_name().cyan(),
            entry.message
        );
    }
}

pub fn print_history(items: &[HistoryItem]) {
    println!("{}", "History".bold().underline());
    if items.is_empty() {
        println!("{}", "  (empty)".dimmed());
        return;
    }

    for item in items {
        println!(
            "{}  {:<24} {}",
            item.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            item.client_name.bold(),
            item.filename
        );
    }
}

pub fn print_template_issues(issues: &[String]) {
    if issues.is_empty() {
        return;
    }
    eprintln!("{}", "Summary does not fully follow the template:".yellow().bold());
    for issue in issues {
        eprintln!("  {} {issue}", "-".yellow());
    }
}
