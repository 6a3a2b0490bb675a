// file: src/repository/discovery.rs
// description: discovery of untracked repositories and recent owner activity
// reference: GitHub users/{owner}/repos and users/{owner}/events

use super::github::HostingApi;
use crate::error::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub event_type: String,
    pub repository: String,
    pub created_at: Option<String>,
}

pub struct RepositoryDiscovery {
    api: Arc<dyn HostingApi>,
    page_size: u32,
}

impl RepositoryDiscovery {
    pub fn new(api: Arc<dyn HostingApi>, page_size: u32) -> Self {
        Self {
            api,
            page_size: page_size.max(1),
        }
    }

    /// Owner repositories whose name contains `pattern` (case-insensitive)
    /// and which are not in `known`. Full names compare case-insensitively.
    pub async fn discover(&self, owner: &str, pattern: &str, known: &[String]) -> Result<Vec<String>> {
        info!("Discovering repositories for {} matching '{}'", owner, pattern);

        let pattern = pattern.to_lowercase();
        let known: HashSet<String> = known.iter().map(|name| name.to_lowercase()).collect();

        let repos = self
            .api
            .list_user_repositories(owner, self.page_size)
            .await?;

        let discovered: Vec<String> = repos
            .into_iter()
            .filter(|repo| {
                repo.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&pattern))
            })
            .filter_map(|repo| repo.full_name)
            .filter(|full_name| !known.contains(&full_name.to_lowercase()))
            .collect();

        if discovered.is_empty() {
            info!("No new repos discovered");
        } else {
            info!("Discovered {} new repos: {:?}", discovered.len(), discovered);
        }

        Ok(discovered)
    }

    pub async fn recent_activity(&self, owner: &str, limit: u32) -> Result<Vec<ActivityEntry>> {
        let events = self.api.list_user_events(owner, limit.max(1)).await?;

        Ok(events
            .into_iter()
            .map(|event| ActivityEntry {
                event_type: event.event_type.unwrap_or_else(|| "Unknown".to_string()),
                repository: event.repo.map(|r| r.name).unwrap_or_default(),
                created_at: event.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fake::FakeHostingApi;

    #[tokio::test]
    async fn test_discover_filters_pattern_and_known() {
        let api = FakeHostingApi::new()
            .with_user_repo("acme/kova-ai")
            .with_user_repo("acme/Kova-AI-Scribbles")
            .with_user_repo("acme/dotfiles");
        let discovery = RepositoryDiscovery::new(Arc::new(api), 100);

        let known = vec!["acme/kova-ai".to_string()];
        let found = discovery.discover("acme", "KOVA", &known).await.unwrap();

        assert_eq!(found, vec!["acme/Kova-AI-Scribbles"]);
    }

    #[tokio::test]
    async fn test_discover_known_names_ignore_case() {
        let api = FakeHostingApi::new().with_user_repo("Acme/Kova-AI");
        let discovery = RepositoryDiscovery::new(Arc::new(api), 100);

        let known = vec!["acme/kova-ai".to_string()];
        let found = discovery.discover("acme", "kova", &known).await.unwrap();

        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_recent_activity_respects_limit() {
        let api = FakeHostingApi::new()
            .with_event("PushEvent", "acme/kova-ai")
            .with_event("IssuesEvent", "acme/kova-ai-site")
            .with_event("CreateEvent", "acme/kova-ai-mem0");
        let discovery = RepositoryDiscovery::new(Arc::new(api), 100);

        let activity = discovery.recent_activity("acme", 2).await.unwrap();
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[0].event_type, "PushEvent");
        assert_eq!(activity[1].repository, "acme/kova-ai-site");
    }
}
