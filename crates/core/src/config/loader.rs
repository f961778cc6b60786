//! Configuration file loader for `.summary-kit/` directory structure.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.summary-kit/` directory, including:
//! - `config.toml`: Global settings
//! - `agents/*.md`: Stage profiles with YAML front matter
//!
//! Connection settings can then be overridden from the environment with
//! [`apply_env_overrides`].

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use sk_protocol::agent_models::StageProfile;
use sk_protocol::config_models::GlobalConfig;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Name of the configuration directory under the project root.
pub const CONFIG_DIR: &str = ".summary-kit";

/// Loads all configuration from the `.summary-kit/` directory.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.summary-kit/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. If directories or files
/// are missing (but the root exists), returns the default configuration
/// rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML or Markdown front matter)
/// - Two profile files claim the same stage
///
/// # Example
///
/// ```rust,no_run
/// use sk_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Model: {}", config.global.llm.model);
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let sk_dir = root.join(CONFIG_DIR);

    // If .summary-kit doesn't exist, return default config
    if !sk_dir.exists() {
        debug!(root = %root.display(), "No .summary-kit directory, using defaults");
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&sk_dir)?;
    let profiles = load_profiles(&sk_dir)?;

    Ok(AppConfig { global, profiles })
}

/// Loads configuration from `root` and applies overrides from the process
/// environment.
pub async fn load_config_with_env(root: &Path) -> ConfigResult<AppConfig> {
    let mut config = load_config(root).await?;
    apply_env_overrides(&mut config.global, |key| std::env::var(key).ok());
    Ok(config)
}

/// Overrides connection settings with environment values.
///
/// `SUMMARY_KIT_PROVIDER` selects the provider first; the remaining variables
/// are read for that provider only:
/// - azure: `AZURE_OPENAI_API_KEY`, `AZURE_OPENAI_ENDPOINT`,
///   `AZURE_OPENAI_API_VERSION`, `AZURE_OPENAI_MODEL`
/// - openai: `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL`
///
/// Empty values are ignored.
pub fn apply_env_overrides<F>(global: &mut GlobalConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    let llm = &mut global.llm;

    if let Some(provider) = get("SUMMARY_KIT_PROVIDER") {
        llm.provider = provider.trim().to_lowercase();
    }

    match llm.provider.as_str() {
        "azure" => {
            if let Some(key) = get("AZURE_OPENAI_API_KEY") {
                llm.api_key = Some(key);
            }
            if let Some(endpoint) = get("AZURE_OPENAI_ENDPOINT") {
                llm.endpoint = endpoint;
            }
            if let Some(version) = get("AZURE_OPENAI_API_VERSION") {
                llm.api_version = version;
            }
            if let Some(model) = get("AZURE_OPENAI_MODEL") {
                llm.model = model;
            }
        }
        "openai" => {
            if let Some(key) = get("OPENAI_API_KEY") {
                llm.api_key = Some(key);
            }
            if let Some(base_url) = get("OPENAI_BASE_URL") {
                llm.endpoint = base_url;
            }
            if let Some(model) = get("OPENAI_MODEL") {
                llm.model = model;
            }
        }
        _ => {}
    }
}

/// Loads global configuration from `config.toml`.
fn load_global_config(sk_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = sk_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    if config.retry.max_attempts == 0 {
        return Err(ConfigError::InvalidConfig {
            path: config_path,
            reason: "retry.max_attempts must be at least 1".to_string(),
        });
    }

    Ok(config)
}

/// Loads all stage profiles from `agents/*.md`.
fn load_profiles(sk_dir: &Path) -> ConfigResult<Vec<StageProfile>> {
    let agents_dir = sk_dir.join("agents");

    if !agents_dir.exists() {
        return Ok(Vec::new());
    }

    let mut profiles: Vec<StageProfile> = Vec::new();

    let mut entries = Vec::new();
    for entry in WalkDir::new(&agents_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: agents_dir.clone(),
            source,
        })?;
        entries.push(entry.into_path());
    }
    // Directory order is platform dependent
    entries.sort();

    for path in entries {
        // Only process .md files
        if path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::FileRead {
            path: path.clone(),
            source,
        })?;

        let profile = parse_profile(&path, &content)?;

        if profiles.iter().any(|existing| existing.stage == profile.stage) {
            return Err(ConfigError::InvalidConfig {
                path,
                reason: format!("Duplicate profile for stage {}", profile.stage),
            });
        }

        debug!(stage = %profile.stage, name = %profile.name, "Loaded stage profile");
        profiles.push(profile);
    }

    Ok(profiles)
}

/// Parses one stage profile from Markdown with YAML front matter.
pub fn parse_profile(path: &Path, content: &str) -> ConfigResult<StageProfile> {
    let matter = Matter::<YAML>::new();
    let result = matter.parse(content);

    let mut profile: StageProfile = result
        .data
        .ok_or_else(|| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: "Missing YAML front matter".to_string(),
        })?
        .deserialize()
        .map_err(|e| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: format!("Failed to deserialize front matter: {e}"),
        })?;

    profile.system_prompt = result.content.trim().to_string();

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_protocol::config_models::TemplatePolicy;
    use sk_protocol::stage_models::Stage;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_config_acceptance() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let sk_dir = root.join(CONFIG_DIR);

        fs::create_dir_all(sk_dir.join("agents")).expect("Failed to create agents dir");

        let config_toml = r#"
[llm]
provider = "openai"
endpoint = "https://api.openai.com/v1"
model = "gpt-4o"

[pipeline]
template_policy = "enforce"
content_retries = 2
"#;
        fs::write(sk_dir.join("config.toml"), config_toml).expect("Failed to write config.toml");

        let profile_md = r#"---
stage: review
name: StrictReviewer
description: Reviews summaries for RM standards
---

You are a strict reviewer. Reject vague action items."#;
        fs::write(sk_dir.join("agents/review.md"), profile_md)
            .expect("Failed to write profile file");

        let config = load_config(root).await.expect("Failed to load config");

        assert_eq!(config.global.llm.provider, "openai");
        assert_eq!(config.global.llm.model, "gpt-4o");
        assert_eq!(config.global.pipeline.template_policy, TemplatePolicy::Enforce);
        assert_eq!(config.global.pipeline.content_retries, 2);

        assert_eq!(config.profiles.len(), 1, "Should load 1 profile");
        let profile = &config.profiles[0];
        assert_eq!(profile.stage, Stage::Review);
        assert_eq!(profile.name, "StrictReviewer");
        assert_eq!(profile.description, "Reviews summaries for RM standards");
        assert_eq!(
            profile.system_prompt,
            "You are a strict reviewer. Reject vague action items."
        );

        // Stages without a file keep the built-in persona
        assert_eq!(config.profile(Stage::Analysis).name, "DocumentAnalyzer");
    }

    #[tokio::test]
    async fn test_load_config_empty_directory() {
        let dir = tempdir().expect("Failed to create temp dir");

        let config = load_config(dir.path())
            .await
            .expect("Should handle missing .summary-kit");

        assert_eq!(config.global, GlobalConfig::default());
        assert!(config.profiles.is_empty(), "Should have no profiles");
    }

    #[tokio::test]
    async fn test_load_config_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let sk_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&sk_dir).expect("Failed to create .summary-kit");

        fs::write(sk_dir.join("config.toml"), "[llm\nmodel = ")
            .expect("Failed to write config.toml");

        let result = load_config(dir.path()).await;

        if let Err(ConfigError::TomlParse { path, .. }) = result {
            assert!(path.ends_with("config.toml"));
        } else {
            panic!("Expected TomlParse error");
        }
    }

    #[tokio::test]
    async fn test_load_config_rejects_zero_attempts() {
        let dir = tempdir().expect("Failed to create temp dir");
        let sk_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&sk_dir).expect("Failed to create .summary-kit");

        fs::write(sk_dir.join("config.toml"), "[retry]\nmax_attempts = 0")
            .expect("Failed to write config.toml");

        let result = load_config(dir.path()).await;
        assert!(matches!(result, Err(ConfigError::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn test_load_config_profile_no_frontmatter() {
        let dir = tempdir().expect("Failed to create temp dir");
        let sk_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(sk_dir.join("agents")).expect("Failed to create agents dir");

        fs::write(sk_dir.join("agents/analysis.md"), "Just plain markdown content")
            .expect("Failed to write profile file");

        let result = load_config(dir.path()).await;

        if let Err(ConfigError::MarkdownParse { path, reason }) = result {
            assert!(path.ends_with("analysis.md"));
            assert!(reason.contains("Missing YAML front matter"));
        } else {
            panic!("Expected MarkdownParse error");
        }
    }

    #[tokio::test]
    async fn test_load_config_profile_unknown_stage() {
        let dir = tempdir().expect("Failed to create temp dir");
        let sk_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(sk_dir.join("agents")).expect("Failed to create agents dir");

        let invalid = "---\nstage: publishing\nname: Publisher\n---\n\nPublish it.";
        fs::write(sk_dir.join("agents/publisher.md"), invalid)
            .expect("Failed to write profile file");

        let result = load_config(dir.path()).await;

        if let Err(ConfigError::MarkdownParse { reason, .. }) = result {
            assert!(reason.contains("Failed to deserialize"));
        } else {
            panic!("Expected MarkdownParse error");
        }
    }

    #[tokio::test]
    async fn test_load_config_duplicate_stage() {
        let dir = tempdir().expect("Failed to create temp dir");
        let sk_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(sk_dir.join("agents")).expect("Failed to create agents dir");

        for name in ["a", "b"] {
            let md = format!("---\nstage: analysis\nname: Analyzer-{name}\n---\n\nAnalyze.");
            fs::write(sk_dir.join(format!("agents/{name}.md")), md)
                .expect("Failed to write profile file");
        }

        let result = load_config(dir.path()).await;
        assert!(matches!(result, Err(ConfigError::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn test_load_config_ignores_non_matching_files() {
        let dir = tempdir().expect("Failed to create temp dir");
        let sk_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(sk_dir.join("agents")).expect("Failed to create agents dir");

        fs::write(sk_dir.join("agents/readme.txt"), "Not a markdown file")
            .expect("Failed to write txt file");

        let config = load_config(dir.path()).await.expect("Should ignore non-md files");
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_env_overrides_for_azure() {
        let env: HashMap<&str, &str> = [
            ("AZURE_OPENAI_API_KEY", "secret"),
            ("AZURE_OPENAI_ENDPOINT", "https://acme.openai.azure.com"),
            ("AZURE_OPENAI_MODEL", "gpt-4-32k"),
            ("AZURE_OPENAI_API_VERSION", ""),
            ("OPENAI_API_KEY", "ignored"),
        ]
        .into_iter()
        .collect();

        let mut global = GlobalConfig::default();
        apply_env_overrides(&mut global, |key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(global.llm.api_key.as_deref(), Some("secret"));
        assert_eq!(global.llm.endpoint, "https://acme.openai.azure.com");
        assert_eq!(global.llm.model, "gpt-4-32k");
        // Empty values do not clobber defaults
        assert_eq!(global.llm.api_version, "2024-02-15-preview");
    }

    #[test]
    fn test_env_overrides_switch_provider() {
        let env: HashMap<&str, &str> = [
            ("SUMMARY_KIT_PROVIDER", " OpenAI "),
            ("OPENAI_API_KEY", "sk-test"),
            ("AZURE_OPENAI_API_KEY", "ignored"),
        ]
        .into_iter()
        .collect();

        let mut global = GlobalConfig::default();
        apply_env_overrides(&mut global, |key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(global.llm.provider, "openai");
        assert_eq!(global.llm.api_key.as_deref(), Some("sk-test"));
    }
}
