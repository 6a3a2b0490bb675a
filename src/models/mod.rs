// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod file_record;
pub mod migration;
pub mod repository;
pub mod sync_result;

pub use file_record::{Category, FileRecord, ManifestEntry, MAX_RELEVANCE};
pub use migration::{ActionKind, DuplicateGroup, MatchType, MigrationAction, MigrationPlan};
pub use repository::{RepoType, RepositoryDocument, TrackedRepository};
pub use sync_result::{RepoSnapshot, RepoStatus, SyncReport, SyncResult, SyncStatus};
