// file: src/repository/sync.rs
// description: multi-repository synchronization against the hosting api
// reference: bounded fan-out with per-repository error isolation

use super::github::HostingApi;
use crate::config::SyncConfig;
use crate::error::KovaError;
use crate::models::sync_result::{RepoSnapshot, RepoStatus, SyncReport, SyncResult};
use crate::pipeline::SyncProgress;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct RemoteSyncCoordinator {
    api: Arc<dyn HostingApi>,
    parallel_workers: usize,
    commits_per_repo: u32,
}

impl RemoteSyncCoordinator {
    pub fn new(api: Arc<dyn HostingApi>, config: &SyncConfig) -> Self {
        Self {
            api,
            parallel_workers: config.parallel_workers.max(1),
            commits_per_repo: config.commits_per_repo,
        }
    }

    /// Attempts every repository and returns once all have finished. A
    /// failure is recorded in that repository's entry only.
    pub async fn sync_all(&self, repos: &[String]) -> SyncReport {
        self.sync_all_with_progress(repos, None).await
    }

    pub async fn sync_all_with_progress(
        &self,
        repos: &[String],
        progress: Option<&SyncProgress>,
    ) -> SyncReport {
        info!(
            "Starting multi-repo sync of {} repositories ({} concurrent)",
            repos.len(),
            self.parallel_workers
        );

        let results: Vec<SyncResult> = stream::iter(repos.iter().map(|repo| async move {
            let result = self.sync_one(repo).await;
            if let Some(progress) = progress {
                progress.record(&result);
            }
            result
        }))
        .buffer_unordered(self.parallel_workers)
        .collect()
        .await;

        let report: SyncReport = results
            .into_iter()
            .map(|result| (result.repository.clone(), result))
            .collect();

        info!("Multi-repo sync completed");
        report
    }

    pub async fn sync_one(&self, full_name: &str) -> SyncResult {
        debug!("Syncing {}", full_name);

        let remote = match self.api.get_repository(full_name).await {
            Ok(remote) => remote,
            Err(KovaError::NotFound(_)) => {
                warn!("Repository {} not found - may need to be created", full_name);
                return SyncResult::not_found(full_name);
            }
            Err(e) => {
                warn!("Failed to sync {}: {}", full_name, e);
                return SyncResult::error(full_name, e.to_string());
            }
        };

        let (commits, branches) = tokio::join!(
            self.api.list_commits(full_name, self.commits_per_repo),
            self.api.list_branches(full_name)
        );

        let recent_commits = commits
            .map(|c| c.len())
            .unwrap_or_else(|e| {
                debug!("Commit listing failed for {}: {}", full_name, e);
                0
            });
        let branches = branches
            .map(|b| b.into_iter().map(|branch| branch.name).collect())
            .unwrap_or_else(|e| {
                debug!("Branch listing failed for {}: {}", full_name, e);
                Vec::new()
            });

        SyncResult::success(
            full_name,
            RepoSnapshot {
                name: remote.name,
                full_name: remote.full_name,
                description: remote.description,
                default_branch: remote.default_branch,
                updated_at: remote.updated_at,
                branches,
                recent_commits,
                stars: remote.stargazers_count,
                forks: remote.forks_count,
            },
        )
    }

    /// Metadata-only pass over the given repositories.
    pub async fn status(&self, repos: &[String]) -> BTreeMap<String, RepoStatus> {
        stream::iter(repos.iter().map(|repo| async move {
            let status = match self.api.get_repository(repo).await {
                Ok(remote) => RepoStatus {
                    exists: true,
                    default_branch: remote.default_branch,
                    updated_at: remote.updated_at,
                    open_issues: remote.open_issues_count,
                    error: None,
                },
                Err(KovaError::NotFound(_)) => RepoStatus {
                    exists: false,
                    default_branch: None,
                    updated_at: None,
                    open_issues: 0,
                    error: None,
                },
                Err(e) => RepoStatus {
                    exists: false,
                    default_branch: None,
                    updated_at: None,
                    open_issues: 0,
                    error: Some(e.to_string()),
                },
            };
            (repo.clone(), status)
        }))
        .buffer_unordered(self.parallel_workers)
        .collect()
        .await
    }
}
