//! Configuration loading and management.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.summary-kit/` directory structure, layered with environment
//! overrides for connection settings.

pub mod error;
pub mod loader;
pub mod models;
