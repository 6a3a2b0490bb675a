// file: src/repository/mod.rs
// description: Repository operations module exports
// reference: Internal module structure

pub mod discovery;
pub mod github;
pub mod registry;
pub mod sync;

#[cfg(test)]
pub(crate) mod fake;

pub use discovery::{ActivityEntry, RepositoryDiscovery};
pub use github::{GitHubClient, HostingApi};
pub use registry::{DocumentSource, RepositoryRegistry};
pub use sync::RemoteSyncCoordinator;
