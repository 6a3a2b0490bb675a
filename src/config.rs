// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{KovaError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub github: GitHubConfig,
    pub sync: SyncConfig,
    pub ai: AiConfig,
    pub organizer: OrganizerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    /// Location of the tracked repository document (`kova_repos_config.json`).
    pub registry_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    pub parallel_workers: usize,
    pub commits_per_repo: u32,
    pub discovery_page_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrganizerConfig {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub extra_rules: Vec<CategoryRule>,
    pub skip_patterns: Vec<String>,
    pub standardize_names: bool,
    pub output_dir: PathBuf,
}

/// Extra classification rule evaluated after the built-in chain.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CategoryRule {
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| KovaError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix("KOVA")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| KovaError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| KovaError::Config(e.to_string()))?;

        config.apply_env_secrets();
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            github: GitHubConfig {
                api_url: "https://api.github.com".to_string(),
                token: None,
                timeout_secs: 30,
                registry_path: PathBuf::from("kova_repos_config.json"),
            },
            sync: SyncConfig {
                parallel_workers: 4,
                commits_per_repo: 5,
                discovery_page_size: 100,
            },
            ai: AiConfig {
                api_url: "https://api.anthropic.com/v1".to_string(),
                api_key: None,
                model: "claude-3-5-sonnet-20241022".to_string(),
                max_tokens: 4000,
                temperature: 0.3,
                system_prompt: "You are a software architecture assistant reviewing \
                                repositories of the Kova AI system. Summarize activity, \
                                risks and suggested next steps."
                    .to_string(),
                timeout_secs: 60,
            },
            organizer: OrganizerConfig {
                keywords: [
                    "kova",
                    "kova-ai",
                    "kova ai",
                    "kovaai",
                    "purgatory",
                    "claude",
                    "multi-repo",
                    "appsheet",
                    "webhook",
                ]
                .iter()
                .map(|k| k.to_string())
                .collect(),
                extra_rules: vec![],
                skip_patterns: vec![".git/*".to_string(), "*.pyc".to_string()],
                standardize_names: false,
                output_dir: PathBuf::from("./kova_file_inventory"),
            },
        }
    }

    /// Falls back to the conventional provider variables when the config
    /// file leaves the secrets empty.
    fn apply_env_secrets(&mut self) {
        if self.github.token.as_deref().is_none_or(str::is_empty) {
            self.github.token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        }
        if self.ai.api_key.as_deref().is_none_or(str::is_empty) {
            self.ai.api_key = std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.is_empty());
        }
    }

    fn validate(&self) -> Result<()> {
        if self.sync.parallel_workers == 0 {
            return Err(KovaError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.github.timeout_secs == 0 || self.ai.timeout_secs == 0 {
            return Err(KovaError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.ai.temperature) {
            return Err(KovaError::Config(format!(
                "ai.temperature must be within 0.0..=1.0, got {}",
                self.ai.temperature
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.sync.commits_per_repo, 5);
        assert_eq!(config.github.api_url, "https://api.github.com");
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = Config::default_config();
        config.sync.parallel_workers = 0;
        assert!(matches!(config.validate(), Err(KovaError::Config(_))));
    }

    #[test]
    fn test_load_overrides_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kova.toml");
        fs::write(
            &path,
            r#"
[sync]
parallel_workers = 8

[[organizer.extra_rules]]
category = "integration"
keywords = ["webhook", "oauth"]
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.sync.parallel_workers, 8);
        assert_eq!(config.sync.commits_per_repo, 5);
        assert_eq!(config.organizer.extra_rules.len(), 1);
        assert_eq!(config.organizer.extra_rules[0].category, "integration");
    }
}
