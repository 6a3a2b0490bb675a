// file: src/repository/github.rs
// description: GitHub REST client behind the hosting api trait
// reference: https://docs.github.com/en/rest

use crate::config::GitHubConfig;
use crate::error::{KovaError, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteRepository {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub default_branch: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCommit {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteBranch {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEventRepo {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEvent {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub repo: Option<RemoteEventRepo>,
    pub created_at: Option<String>,
}

/// Read-only view of the remote hosting service.
///
/// `get_repository` reports a missing repository as [`KovaError::NotFound`];
/// every other non-success status surfaces as [`KovaError::Remote`].
#[async_trait]
pub trait HostingApi: Send + Sync {
    async fn get_repository(&self, full_name: &str) -> Result<RemoteRepository>;

    async fn list_commits(&self, full_name: &str, per_page: u32) -> Result<Vec<RemoteCommit>>;

    async fn list_branches(&self, full_name: &str) -> Result<Vec<RemoteBranch>>;

    async fn list_user_repositories(
        &self,
        owner: &str,
        per_page: u32,
    ) -> Result<Vec<RemoteRepository>>;

    async fn list_user_events(&self, owner: &str, per_page: u32) -> Result<Vec<RemoteEvent>>;
}

pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static("kova-sync"));

        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("token {}", token))
                .map_err(|e| KovaError::Config(format!("Invalid GitHub token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if let Some(err) = error_for_status(status, path, &error_text) {
                return Err(err);
            }
            unreachable!("error_for_status returns Some for every non-success status");
        }

        Ok(response.json().await?)
    }
}

/// Maps a response status onto the error `get_json` reports, if any.
fn error_for_status(status: StatusCode, path: &str, body: &str) -> Option<KovaError> {
    if status.is_success() {
        None
    } else if status == StatusCode::NOT_FOUND {
        Some(KovaError::NotFound(path.to_string()))
    } else {
        Some(KovaError::Remote(format!(
            "GET {} failed with status {}: {}",
            path, status, body
        )))
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn get_repository(&self, full_name: &str) -> Result<RemoteRepository> {
        self.get_json(&format!("/repos/{}", full_name)).await
    }

    async fn list_commits(&self, full_name: &str, per_page: u32) -> Result<Vec<RemoteCommit>> {
        self.get_json(&format!("/repos/{}/commits?per_page={}", full_name, per_page))
            .await
    }

    async fn list_branches(&self, full_name: &str) -> Result<Vec<RemoteBranch>> {
        self.get_json(&format!("/repos/{}/branches", full_name)).await
    }

    async fn list_user_repositories(
        &self,
        owner: &str,
        per_page: u32,
    ) -> Result<Vec<RemoteRepository>> {
        self.get_json(&format!("/users/{}/repos?per_page={}", owner, per_page))
            .await
    }

    async fn list_user_events(&self, owner: &str, per_page: u32) -> Result<Vec<RemoteEvent>> {
        self.get_json(&format!("/users/{}/events?per_page={}", owner, per_page))
            .await
    }
}
