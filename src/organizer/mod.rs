// file: src/organizer/mod.rs
// description: file organization analysis over a manifest of file records
// reference: classify, score, detect duplicates and obsolete files, then plan

pub mod classifier;
pub mod duplicates;
pub mod manifest;
pub mod obsolete;
pub mod patterns;
pub mod planner;
pub mod relevance;
pub mod scanner;

pub use classifier::FileClassifier;
pub use duplicates::DuplicateDetector;
pub use manifest::ManifestLoader;
pub use obsolete::ObsolescenceDetector;
pub use planner::MigrationPlanner;
pub use relevance::RelevanceScorer;
pub use scanner::LocalScanner;

use crate::config::{Config, OrganizerConfig};
use crate::models::file_record::{Category, FileRecord};
use crate::models::migration::DuplicateGroup;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Enriched manifest with the detector outputs the planner consumes.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestAnalysis {
    pub generated_at: DateTime<Utc>,
    pub files: Vec<FileRecord>,
    pub duplicates: Vec<DuplicateGroup>,
    pub obsolete: Vec<FileRecord>,
}

impl ManifestAnalysis {
    pub fn categories(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for file in &self.files {
            *counts.entry(file.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn high_relevance(&self, min_score: u8) -> impl Iterator<Item = &FileRecord> {
        self.files
            .iter()
            .filter(move |f| f.relevance_score >= min_score)
    }
}

pub struct ManifestAnalyzer {
    classifier: FileClassifier,
    scorer: RelevanceScorer,
    duplicates: DuplicateDetector,
    obsolete: ObsolescenceDetector,
}

impl ManifestAnalyzer {
    pub fn new(config: &OrganizerConfig) -> Self {
        Self {
            classifier: FileClassifier::new(&config.extra_rules),
            scorer: RelevanceScorer::new(&config.keywords),
            duplicates: DuplicateDetector::default(),
            obsolete: ObsolescenceDetector::new(),
        }
    }

    pub fn analyze(&self, records: Vec<FileRecord>) -> ManifestAnalysis {
        self.analyze_at(records, Utc::now())
    }

    pub fn analyze_at(&self, mut records: Vec<FileRecord>, now: DateTime<Utc>) -> ManifestAnalysis {
        info!("Analyzing {} file records", records.len());

        for record in records.iter_mut() {
            record.category = self.classifier.categorize(record);
            self.scorer.apply(record, now);
        }

        let duplicates = self.duplicates.find_duplicates(&records);
        let obsolete = self.obsolete.find_obsolete(&records);

        ManifestAnalysis {
            generated_at: now,
            files: records,
            duplicates,
            obsolete,
        }
    }
}

impl Default for ManifestAnalyzer {
    fn default() -> Self {
        Self::new(&Config::default_config().organizer)
    }
}
