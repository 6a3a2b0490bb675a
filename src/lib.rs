// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod ai;
pub mod config;
pub mod error;
pub mod exporter;
pub mod models;
pub mod organizer;
pub mod pipeline;
pub mod repository;
pub mod utils;

pub use ai::{RepoAnalysis, RepoAnalyzer};
pub use config::{AiConfig, CategoryRule, Config, GitHubConfig, OrganizerConfig, SyncConfig};
pub use error::{KovaError, Result};
pub use exporter::ReportExporter;
pub use models::{
    ActionKind, Category, DuplicateGroup, FileRecord, MigrationAction, MigrationPlan, RepoType,
    SyncReport, SyncResult, SyncStatus, TrackedRepository,
};
pub use organizer::{
    DuplicateDetector, FileClassifier, LocalScanner, ManifestAnalysis, ManifestAnalyzer,
    ManifestLoader, MigrationPlanner, ObsolescenceDetector, RelevanceScorer,
};
pub use pipeline::{SyncProgress, SyncStats};
pub use repository::{
    GitHubClient, HostingApi, RemoteSyncCoordinator, RepositoryDiscovery, RepositoryRegistry,
};
pub use utils::{ConfigValidator, ValidationReport};
