//! Global configuration models for `.summary-kit/config.toml`.
//!
//! Every section is optional; missing sections and keys fall back to the
//! defaults documented on each field.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Represents global settings from `.summary-kit/config.toml`.
///
/// # Example
///
/// ```toml
/// # .summary-kit/config.toml
/// [llm]
/// provider = "azure"
/// endpoint = "https://my-resource.openai.azure.com"
/// model = "gpt-4"
///
/// [retry]
/// max_attempts = 3
///
/// [pipeline]
/// template_policy = "flag"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
pub struct GlobalConfig {
    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub pipeline: PipelineSettings,

    #[serde(default)]
    pub history: HistorySettings,
}

/// Language model connection settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(default)]
pub struct LlmSettings {
    /// Provider name: `azure`, `openai` or `mock`. Defaults to `azure`.
    pub provider: String,

    /// Service endpoint. For Azure this is the resource URL, for OpenAI the
    /// API base URL.
    pub endpoint: String,

    /// API key. Usually supplied through the environment instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Azure API version. Defaults to `2024-02-15-preview`.
    pub api_version: String,

    /// Model or deployment name. Defaults to `gpt-4`.
    pub model: String,

    /// Sampling temperature. Defaults to 0.7.
    pub temperature: f32,

    /// Completion length limit. Defaults to 2048.
    pub max_tokens: u32,

    /// Per-attempt timeout in seconds. Defaults to 120.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "azure".to_string(),
            endpoint: String::new(),
            api_key: None,
            api_version: "2024-02-15-preview".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            timeout_secs: 120,
        }
    }
}

/// Retry behaviour for transient transport failures.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts per call, including the first. Defaults to 3.
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds. Defaults to 500.
    pub initial_backoff_ms: u64,

    /// Upper bound for the doubling delay in milliseconds. Defaults to 8000.
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8000,
        }
    }
}

/// How stage output is checked against the summary template.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum TemplatePolicy {
    /// No checking.
    Ignore,

    /// Problems are logged and attached to the result.
    #[default]
    Flag,

    /// Non-conformant output is regenerated, then fails the run.
    Enforce,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct PipelineSettings {
    pub template_policy: TemplatePolicy,

    /// Extra attempts a stage gets under [`TemplatePolicy::Enforce`].
    /// Defaults to 1.
    pub content_retries: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            template_policy: TemplatePolicy::Flag,
            content_retries: 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of history items kept per session. Defaults to 50.
    pub capacity: usize,

    /// Number of items listed by default. Defaults to 10.
    pub display_limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: 50,
            display_limit: 10,
        }
    }
}
