// file: src/models/sync_result.rs
// description: per-repository outcome of a sync pass
// reference: GitHub REST repository payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Success,
    Error,
    NotFound,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Success => "success",
            SyncStatus::Error => "error",
            SyncStatus::NotFound => "not_found",
        }
    }
}

/// Metadata fetched for a repository that exists on the remote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub default_branch: Option<String>,
    pub updated_at: Option<String>,
    pub branches: Vec<String>,
    pub recent_commits: usize,
    pub stars: u64,
    pub forks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResult {
    pub repository: String,
    pub status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RepoSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub synced_at: DateTime<Utc>,
}

impl SyncResult {
    pub fn success(repository: &str, snapshot: RepoSnapshot) -> Self {
        Self {
            repository: repository.to_string(),
            status: SyncStatus::Success,
            data: Some(snapshot),
            error: None,
            synced_at: Utc::now(),
        }
    }

    pub fn not_found(repository: &str) -> Self {
        Self {
            repository: repository.to_string(),
            status: SyncStatus::NotFound,
            data: None,
            error: Some(format!(
                "Repository {} not found - may need to be created",
                repository
            )),
            synced_at: Utc::now(),
        }
    }

    pub fn error(repository: &str, message: impl Into<String>) -> Self {
        Self {
            repository: repository.to_string(),
            status: SyncStatus::Error,
            data: None,
            error: Some(message.into()),
            synced_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Success
    }
}

/// Sync results keyed by repository identifier.
pub type SyncReport = BTreeMap<String, SyncResult>;

/// Metadata-only view used by the cross-repository status pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoStatus {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub open_issues: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
