//! # sk-core
//!
//! Core pipeline engine and session management for summary-kit.
//!
//! This crate provides:
//! - Configuration loading from the `.summary-kit/` directory
//! - Language model client abstraction with Azure OpenAI, OpenAI and mock adapters
//! - The three-stage summary pipeline (analysis, generation, review)
//! - Per-session history of completed runs
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and environment overrides
//! - [`llm`]: Client trait, adapters, retries and factory
//! - [`engine`]: Pipeline orchestration, prompts and template checks
//! - [`state`]: Stage status tracking and interaction log
//! - [`history`]: Bounded history of completed runs
//! - [`session`]: Session context owning history and in-flight runs
//! - [`extract`]: Document text extraction
//! - [`export`]: Rendering summaries for download
//! - [`init`]: Scaffolding a `.summary-kit/` directory

pub mod config;
pub mod engine;
pub mod export;
pub mod extract;
pub mod history;
pub mod init;
pub mod llm;
pub mod session;
pub mod state;
