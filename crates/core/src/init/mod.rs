//! Scaffolding a `.summary-kit/` directory.
//!
//! `summarize init` writes the embedded templates:
//! - Global configuration (`config.toml`)
//! - One persona per stage (`agents/analysis.md`, `agents/generation.md`,
//!   `agents/review.md`)
//!
//! # Example
//!
//! ```no_run
//! use sk_core::init::{generate_summary_kit_structure, InitOptions};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! generate_summary_kit_structure(options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_summary_kit_structure, InitOptions};
pub use templates::{get_template, list_templates};
