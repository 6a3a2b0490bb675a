// file: src/models/repository.rs
// description: tracked repository entries and the repository configuration document
// reference: kova_repos_config.json layout

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const DEFAULT_OWNER: &str = "Kathrynhiggs21";
pub const DEFAULT_SYNC_PRIORITY: u8 = 3;

const DEFAULT_REPOSITORIES: &[(&str, RepoType, &str)] = &[
    ("Kova-ai-SYSTEM", RepoType::Core, "Main orchestration hub"),
    ("kova-ai", RepoType::Service, "Backend API service"),
    ("kova-ai-site", RepoType::Frontend, "Website and docs"),
    ("kova-ai-mem0", RepoType::Service, "Memory system"),
    ("kova-ai-docengine", RepoType::Service, "Document engine"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoType {
    Core,
    #[default]
    Service,
    Frontend,
    Experimental,
    #[serde(untagged)]
    Other(String),
}

impl RepoType {
    pub fn as_str(&self) -> &str {
        match self {
            RepoType::Core => "core",
            RepoType::Service => "service",
            RepoType::Frontend => "frontend",
            RepoType::Experimental => "experimental",
            RepoType::Other(other) => other,
        }
    }

    pub fn is_standard(&self) -> bool {
        !matches!(self, RepoType::Other(_))
    }

    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "core" => RepoType::Core,
            "service" => RepoType::Service,
            "frontend" => RepoType::Frontend,
            "experimental" => RepoType::Experimental,
            _ => RepoType::Other(value.to_string()),
        }
    }
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedRepository {
    #[serde(default)]
    pub name: String,
    pub full_name: String,
    #[serde(rename = "type", default)]
    pub repo_type: RepoType,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_priority")]
    pub sync_priority: u8,
    #[serde(default)]
    pub features: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_priority() -> u8 {
    DEFAULT_SYNC_PRIORITY
}

impl TrackedRepository {
    pub fn new(full_name: &str, repo_type: RepoType) -> Self {
        Self {
            name: short_name(full_name).to_string(),
            full_name: full_name.to_string(),
            repo_type,
            enabled: true,
            description: None,
            sync_priority: DEFAULT_SYNC_PRIORITY,
            features: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn owner(&self) -> &str {
        self.full_name
            .split_once('/')
            .map(|(owner, _)| owner)
            .unwrap_or("")
    }
}

/// Returns the part after the owner for an `owner/name` identifier.
pub fn short_name(full_name: &str) -> &str {
    full_name.rsplit('/').next().unwrap_or(full_name)
}

/// `owner/name` with both halves non-empty and free of whitespace.
pub fn is_valid_identifier(full_name: &str) -> bool {
    match full_name.split_once('/') {
        Some((owner, name)) => {
            !owner.is_empty()
                && !name.is_empty()
                && !name.contains('/')
                && !full_name.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDocument {
    pub github_owner: String,
    #[serde(default)]
    pub repositories: Vec<TrackedRepository>,
    #[serde(default)]
    pub sync_settings: Map<String, Value>,
    #[serde(default)]
    pub discovery_settings: Map<String, Value>,
    #[serde(default)]
    pub integration_settings: Map<String, Value>,
}

impl RepositoryDocument {
    pub fn default_document() -> Self {
        let repositories = DEFAULT_REPOSITORIES
            .iter()
            .map(|(name, repo_type, description)| {
                TrackedRepository::new(&format!("{}/{}", DEFAULT_OWNER, name), repo_type.clone())
                    .with_description(*description)
            })
            .collect();

        Self {
            github_owner: DEFAULT_OWNER.to_string(),
            repositories,
            sync_settings: Map::new(),
            discovery_settings: Map::new(),
            integration_settings: Map::new(),
        }
    }

    /// GitHub owner and repository names are case-insensitive.
    pub fn contains(&self, full_name: &str) -> bool {
        self.repositories
            .iter()
            .any(|r| r.full_name.eq_ignore_ascii_case(full_name))
    }

    pub fn enabled(&self) -> impl Iterator<Item = &TrackedRepository> {
        self.repositories.iter().filter(|r| r.enabled)
    }

    /// Substring used to recognise Kova repositories during discovery.
    pub fn discovery_pattern(&self) -> String {
        self.discovery_settings
            .get("repo_name_pattern")
            .and_then(Value::as_str)
            .unwrap_or("kova")
            .to_string()
    }
}
