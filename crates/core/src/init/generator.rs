//! Directory structure and file generation for `.summary-kit/`.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::loader::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Options for initializing a .summary-kit directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory in which `.summary-kit/` is created.
    pub target_dir: PathBuf,

    /// Overwrite an existing `.summary-kit/`.
    pub force: bool,

    /// Write `config.toml` only; stages use their built-in personas.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a `.summary-kit/` directory from the embedded templates.
///
/// ```text
/// .summary-kit/
/// ├── config.toml
/// └── agents/            (unless minimal)
///     ├── analysis.md
///     ├── generation.md
///     └── review.md
/// ```
///
/// # Errors
///
/// Returns an `InitError` if the directory already exists without `force`,
/// if a template is missing, or if writing fails.
pub async fn generate_summary_kit_structure(options: InitOptions) -> InitResult<()> {
    let sk_dir = options.target_dir.join(CONFIG_DIR);

    if sk_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(sk_dir));
    }

    create_dir(&sk_dir)?;
    write_template_file(&sk_dir, "config.toml")?;

    if !options.minimal {
        create_dir(&sk_dir.join("agents"))?;
        for agent_path in list_templates("agents/") {
            write_template_file(&sk_dir, &agent_path)?;
        }
    }

    info!(path = %sk_dir.display(), minimal = options.minimal, "Initialized summary-kit directory");
    Ok(())
}

fn create_dir(path: &Path) -> InitResult<()> {
    fs::create_dir_all(path).map_err(|source| InitError::DirectoryCreate {
        path: path.to_path_buf(),
        source,
    })
}

fn write_template_file(sk_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = sk_dir.join(template_path);
    if let Some(parent) = target_path.parent() {
        create_dir(parent)?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path,
        source,
    })
}
