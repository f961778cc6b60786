//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines
//! global settings and stage profile overrides into a single configuration
//! object.

use crate::engine::stage::builtin_profile;
use crate::engine::PipelineOptions;
use crate::llm::RetryPolicy;
use sk_protocol::agent_models::StageProfile;
use sk_protocol::config_models::GlobalConfig;
use sk_protocol::stage_models::Stage;

/// Unified application configuration loaded from `.summary-kit/` directory.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Global settings
/// - `agents/*.md`: Stage profile overrides
/// - environment variables: connection settings and secrets
///
/// # Example
///
/// ```rust,no_run
/// use sk_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Using provider {} with {} profile overrides",
///          config.global.llm.provider,
///          config.profiles.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// Stage profiles loaded from `agents/*.md`, at most one per stage.
    pub profiles: Vec<StageProfile>,
}

impl AppConfig {
    /// The profile for `stage`: the loaded override, or the built-in persona.
    pub fn profile(&self, stage: Stage) -> StageProfile {
        self.profiles
            .iter()
            .find(|profile| profile.stage == stage)
            .cloned()
            .unwrap_or_else(|| builtin_profile(stage))
    }

    /// Profiles for all stages in execution order.
    pub fn stage_profiles(&self) -> [StageProfile; 3] {
        Stage::ALL.map(|stage| self.profile(stage))
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            template_policy: self.global.pipeline.template_policy,
            content_retries: self.global.pipeline.content_retries,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_settings(&self.global.retry, &self.global.llm)
    }
}
