// file: src/repository/fake.rs
// description: in-memory hosting api used by unit tests
// reference: tests for registry, sync and discovery

use super::github::{
    HostingApi, RemoteBranch, RemoteCommit, RemoteEvent, RemoteEventRepo, RemoteRepository,
};
use crate::error::{KovaError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeHostingApi {
    repos: HashMap<String, (RemoteRepository, Vec<String>, usize)>,
    failures: HashMap<String, String>,
    user_repos: Vec<RemoteRepository>,
    events: Vec<RemoteEvent>,
    calls: Mutex<Vec<String>>,
}

impl FakeHostingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, full_name: &str, branches: &[&str], commits: usize) -> Self {
        let remote = RemoteRepository {
            name: Some(full_name.rsplit('/').next().unwrap_or(full_name).to_string()),
            full_name: Some(full_name.to_string()),
            description: Some(format!("{} description", full_name)),
            default_branch: branches.first().map(|b| b.to_string()),
            updated_at: Some("2024-06-01T12:00:00Z".to_string()),
            stargazers_count: 3,
            forks_count: 1,
            open_issues_count: 2,
        };
        self.repos.insert(
            full_name.to_string(),
            (remote, branches.iter().map(|b| b.to_string()).collect(), commits),
        );
        self
    }

    pub fn with_failure(mut self, full_name: &str, message: &str) -> Self {
        self.failures
            .insert(full_name.to_string(), message.to_string());
        self
    }

    pub fn with_user_repo(mut self, full_name: &str) -> Self {
        self.user_repos.push(RemoteRepository {
            name: Some(full_name.rsplit('/').next().unwrap_or(full_name).to_string()),
            full_name: Some(full_name.to_string()),
            ..RemoteRepository::default()
        });
        self
    }

    pub fn with_event(mut self, event_type: &str, repo: &str) -> Self {
        self.events.push(RemoteEvent {
            event_type: Some(event_type.to_string()),
            repo: Some(RemoteEventRepo {
                name: repo.to_string(),
            }),
            created_at: Some("2024-06-01T12:00:00Z".to_string()),
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn lookup(&self, full_name: &str) -> Result<&(RemoteRepository, Vec<String>, usize)> {
        if let Some(message) = self.failures.get(full_name) {
            return Err(KovaError::Remote(message.clone()));
        }
        self.repos
            .get(full_name)
            .ok_or_else(|| KovaError::NotFound(format!("/repos/{}", full_name)))
    }
}

#[async_trait]
impl HostingApi for FakeHostingApi {
    async fn get_repository(&self, full_name: &str) -> Result<RemoteRepository> {
        self.record(format!("repo:{}", full_name));
        self.lookup(full_name).map(|(repo, _, _)| repo.clone())
    }

    async fn list_commits(&self, full_name: &str, per_page: u32) -> Result<Vec<RemoteCommit>> {
        self.record(format!("commits:{}", full_name));
        let (_, _, commits) = self.lookup(full_name)?;
        Ok((0..(*commits).min(per_page as usize))
            .map(|i| RemoteCommit {
                sha: format!("{:040x}", i),
            })
            .collect())
    }

    async fn list_branches(&self, full_name: &str) -> Result<Vec<RemoteBranch>> {
        self.record(format!("branches:{}", full_name));
        let (_, branches, _) = self.lookup(full_name)?;
        Ok(branches
            .iter()
            .map(|name| RemoteBranch { name: name.clone() })
            .collect())
    }

    async fn list_user_repositories(
        &self,
        owner: &str,
        _per_page: u32,
    ) -> Result<Vec<RemoteRepository>> {
        self.record(format!("user_repos:{}", owner));
        Ok(self.user_repos.clone())
    }

    async fn list_user_events(&self, owner: &str, per_page: u32) -> Result<Vec<RemoteEvent>> {
        self.record(format!("events:{}", owner));
        Ok(self.events.iter().take(per_page as usize).cloned().collect())
    }
}
