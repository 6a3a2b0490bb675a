// file: src/ai/mod.rs
// description: optional AI analysis of synced repositories

pub mod claude;

pub use claude::{RepoAnalysis, RepoAnalyzer};
