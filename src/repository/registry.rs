// file: src/repository/registry.rs
// description: tracked repository registry backed by the json configuration document
// reference: kova_repos_config.json persistence

use super::github::HostingApi;
use crate::error::{KovaError, Result};
use crate::models::repository::{RepoType, RepositoryDocument, TrackedRepository};
use crate::models::repository::is_valid_identifier;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const PLANNED_DESCRIPTION: &str = "Planned repository";
const FALLBACK_DESCRIPTION: &str = "Kova AI repository";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    File,
    Defaults,
}

/// Owns the configuration document. Writes go through the internal mutex
/// and replace the file atomically.
pub struct RepositoryRegistry {
    path: PathBuf,
    source: DocumentSource,
    document: Mutex<RepositoryDocument>,
}

impl RepositoryRegistry {
    /// Never fails: a missing or malformed document falls back to the
    /// built-in default repository list.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let (document, source) = match Self::read_document(&path).await {
            Ok(document) => {
                info!(
                    "Loaded {} tracked repositories from {}",
                    document.repositories.len(),
                    path.display()
                );
                (document, DocumentSource::File)
            }
            Err(e) => {
                warn!(
                    "Failed to load repository config {}: {}; using defaults",
                    path.display(),
                    e
                );
                (RepositoryDocument::default_document(), DocumentSource::Defaults)
            }
        };

        Self {
            path,
            source,
            document: Mutex::new(document),
        }
    }

    async fn read_document(path: &Path) -> Result<RepositoryDocument> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|e| KovaError::file(path, e))?;
        let document = serde_json::from_str(&contents)?;
        Ok(document)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> DocumentSource {
        self.source
    }

    pub async fn document(&self) -> RepositoryDocument {
        self.document.lock().await.clone()
    }

    pub async fn repositories(&self) -> Vec<TrackedRepository> {
        self.document.lock().await.repositories.clone()
    }

    pub async fn list_enabled(&self) -> Vec<String> {
        self.document
            .lock()
            .await
            .enabled()
            .map(|r| r.full_name.clone())
            .collect()
    }

    /// Adds a repository after checking the remote. A remote 404 still adds
    /// the entry, described as planned.
    pub async fn add(
        &self,
        api: &dyn HostingApi,
        full_name: &str,
        repo_type: RepoType,
    ) -> Result<TrackedRepository> {
        if !is_valid_identifier(full_name) {
            return Err(KovaError::InvalidIdentifier(full_name.to_string()));
        }

        if self.document.lock().await.contains(full_name) {
            return Err(KovaError::AlreadyTracked(full_name.to_string()));
        }

        let mut entry = TrackedRepository::new(full_name, repo_type);
        match api.get_repository(full_name).await {
            Ok(remote) => {
                if let Some(name) = remote.name {
                    entry.name = name;
                }
                entry.description = Some(
                    remote
                        .description
                        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
                );
            }
            Err(KovaError::NotFound(_)) => {
                warn!(
                    "Repository {} not found on remote, adding as planned",
                    full_name
                );
                entry.description = Some(PLANNED_DESCRIPTION.to_string());
            }
            Err(e) => return Err(e),
        }

        let mut document = self.document.lock().await;
        // Another add may have landed while the remote call was in flight.
        if document.contains(full_name) {
            return Err(KovaError::AlreadyTracked(full_name.to_string()));
        }

        let mut updated = document.clone();
        updated.repositories.push(entry.clone());
        self.persist(&updated).await?;
        *document = updated;

        info!("Added {} to {}", full_name, self.path.display());
        Ok(entry)
    }

    async fn persist(&self, document: &RepositoryDocument) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| KovaError::file(parent, e))?;
        }

        let contents = serde_json::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, contents)
            .await
            .map_err(|e| KovaError::file(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| KovaError::file(&self.path, e))?;

        debug!(
            "Saved {} repositories to {}",
            document.repositories.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fake::FakeHostingApi;
    use std::sync::Arc;
    use tempfile::TempDir;

    const DOCUMENT: &str = r#"{
        "github_owner": "acme",
        "repositories": [
            {"name": "alpha", "full_name": "acme/alpha", "type": "core", "enabled": true},
            {"name": "beta", "full_name": "acme/beta", "type": "service", "enabled": false}
        ],
        "sync_settings": {"auto_sync_enabled": true, "sync_interval_minutes": 15},
        "discovery_settings": {},
        "integration_settings": {}
    }"#;

    async fn registry_with_document(temp: &TempDir) -> RepositoryRegistry {
        let path = temp.path().join("kova_repos_config.json");
        std::fs::write(&path, DOCUMENT).unwrap();
        RepositoryRegistry::load(path).await
    }

    #[tokio::test]
    async fn test_load_and_list_enabled() {
        let temp = TempDir::new().unwrap();
        let registry = registry_with_document(&temp).await;

        assert_eq!(registry.source(), DocumentSource::File);
        assert_eq!(registry.repositories().await.len(), 2);
        assert_eq!(registry.list_enabled().await, vec!["acme/alpha"]);
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let registry = RepositoryRegistry::load(temp.path().join("missing.json")).await;

        assert_eq!(registry.source(), DocumentSource::Defaults);
        assert_eq!(registry.list_enabled().await.len(), 5);
    }

    #[tokio::test]
    async fn test_malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let registry = RepositoryRegistry::load(&path).await;
        assert_eq!(registry.source(), DocumentSource::Defaults);
        assert_eq!(registry.repositories().await.len(), 5);
    }

    #[tokio::test]
    async fn test_add_existing_remote_persists() {
        let temp = TempDir::new().unwrap();
        let registry = registry_with_document(&temp).await;
        let api = FakeHostingApi::new().with_repo("acme/gamma", &["main"], 2);

        let added = registry
            .add(&api, "acme/gamma", RepoType::Frontend)
            .await
            .unwrap();
        assert_eq!(added.description.as_deref(), Some("acme/gamma description"));
        assert_eq!(added.sync_priority, 3);

        let reloaded = RepositoryRegistry::load(registry.path()).await;
        let doc = reloaded.document().await;
        assert!(doc.contains("acme/gamma"));
        // untouched settings survive the rewrite
        assert_eq!(doc.sync_settings["sync_interval_minutes"], 15);
        assert!(!registry.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_add_not_found_is_planned() {
        let temp = TempDir::new().unwrap();
        let registry = registry_with_document(&temp).await;
        let api = FakeHostingApi::new();

        let added = registry
            .add(&api, "acme/future", RepoType::Experimental)
            .await
            .unwrap();
        assert_eq!(added.description.as_deref(), Some("Planned repository"));
        assert_eq!(added.name, "future");
        assert!(registry.list_enabled().await.contains(&"acme/future".to_string()));
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_and_invalid() {
        let temp = TempDir::new().unwrap();
        let registry = registry_with_document(&temp).await;
        let api = FakeHostingApi::new();

        let duplicate = registry.add(&api, "acme/alpha", RepoType::Core).await;
        assert!(matches!(duplicate, Err(KovaError::AlreadyTracked(_))));
        // duplicate check happens before the remote is consulted
        assert!(api.calls().is_empty());

        let differently_cased = registry.add(&api, "ACME/Alpha", RepoType::Core).await;
        assert!(matches!(differently_cased, Err(KovaError::AlreadyTracked(_))));
        assert!(api.calls().is_empty());

        let invalid = registry.add(&api, "no-slash", RepoType::Core).await;
        assert!(matches!(invalid, Err(KovaError::InvalidIdentifier(_))));
    }

    #[tokio::test]
    async fn test_add_surfaces_remote_failure() {
        let temp = TempDir::new().unwrap();
        let registry = registry_with_document(&temp).await;
        let api = FakeHostingApi::new().with_failure("acme/flaky", "502 bad gateway");

        let result = registry.add(&api, "acme/flaky", RepoType::Service).await;
        assert!(matches!(result, Err(KovaError::Remote(_))));
        assert_eq!(registry.repositories().await.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_adds_of_same_repo() {
        let temp = TempDir::new().unwrap();
        let registry = Arc::new(registry_with_document(&temp).await);
        let api = Arc::new(FakeHostingApi::new().with_repo("acme/delta", &["main"], 1));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let api = Arc::clone(&api);
                tokio::spawn(async move {
                    registry
                        .add(api.as_ref(), "acme/delta", RepoType::Service)
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut successes = 0;
        for task in tasks {
            if task.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        let doc = RepositoryRegistry::load(registry.path()).await.document().await;
        assert_eq!(
            doc.repositories
                .iter()
                .filter(|r| r.full_name == "acme/delta")
                .count(),
            1
        );
    }
}
