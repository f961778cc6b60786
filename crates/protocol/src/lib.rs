//! # sk-protocol
//!
//! Core protocol definitions and data models for summary-kit.
//!
//! This crate defines all shared data structures used for:
//! - Configuration file parsing (TOML config, Markdown stage profiles)
//! - Per-run stage status and interaction logs
//! - Processing results and history items
//! - Events streamed from a running pipeline to its host
//!
//! ## Modules
//!
//! - [`agent_models`]: Stage profile (agent persona) structures
//! - [`config_models`]: Global configuration from config.toml
//! - [`document_models`]: Uploaded document kinds
//! - [`stage_models`]: Pipeline stages and their status
//! - [`log_models`]: Interaction log entries
//! - [`result_models`]: Processing results and history items
//! - [`ipc`]: Events sent from the core to its host
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, chrono and uuid
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other summary-kit crates

pub mod agent_models;
pub mod config_models;
pub mod document_models;
pub mod ipc;
pub mod log_models;
pub mod result_models;
pub mod stage_models;

// Re-export all public types for convenience
pub use agent_models::*;
pub use config_models::*;
pub use document_models::*;
pub use ipc::*;
pub use log_models::*;
pub use result_models::*;
pub use stage_models::*;
