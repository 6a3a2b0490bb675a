// file: src/organizer/duplicates.rs
// description: exact and similar-name duplicate detection over a manifest
// reference: normalized name + size signatures, Jaccard similarity over word tokens

use super::patterns::{COPY_MARKER, NAME_SEPARATOR, WORD_TOKEN};
use crate::models::file_record::FileRecord;
use crate::models::migration::{DuplicateGroup, MatchType};
use std::collections::{HashMap, HashSet};
use tracing::info;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Lowercases, drops whole-token copy markers from the stem and strips
/// spaces, hyphens and underscores. The extension is kept.
pub fn normalize_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let (stem, extension) = match lower.rfind('.') {
        Some(idx) if idx > 0 => (&lower[..idx], Some(&lower[idx..])),
        _ => (lower.as_str(), None),
    };

    let tokens: Vec<&str> = NAME_SEPARATOR
        .split(stem)
        .filter(|t| !t.is_empty())
        .collect();
    let kept: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| !COPY_MARKER.is_match(t))
        .collect();

    // a name made only of markers ("backup.zip") keeps its tokens
    let mut normalized = if kept.is_empty() {
        tokens.concat()
    } else {
        kept.concat()
    };
    if let Some(extension) = extension {
        normalized.push_str(extension);
    }
    normalized
}

pub fn word_tokens(name: &str) -> HashSet<String> {
    WORD_TOKEN
        .find_iter(&name.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Jaccard index of the word-token sets; 0.0 when either side is empty.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let left = word_tokens(a);
    let right = word_tokens(b);

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    intersection as f64 / union as f64
}

pub struct DuplicateDetector {
    threshold: f64,
}

impl DuplicateDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn find_duplicates(&self, records: &[FileRecord]) -> Vec<DuplicateGroup> {
        let exact = self.exact_groups(records);
        let similar = self.similar_groups(records);

        info!(
            "Found {} exact name duplicates, {} similar name duplicates",
            exact.len(),
            similar.len()
        );

        exact.into_iter().chain(similar).collect()
    }

    /// Groups by normalized name + size, in first-seen order.
    pub fn exact_groups(&self, records: &[FileRecord]) -> Vec<DuplicateGroup> {
        let mut order: Vec<(String, u64)> = Vec::new();
        let mut buckets: HashMap<(String, u64), Vec<&FileRecord>> = HashMap::new();

        for record in records {
            let signature = (normalize_name(&record.name), record.size);
            buckets
                .entry(signature.clone())
                .or_insert_with(|| {
                    order.push(signature);
                    Vec::new()
                })
                .push(record);
        }

        order
            .into_iter()
            .filter_map(|signature| buckets.remove(&signature))
            .filter(|members| members.len() > 1)
            .map(|members| DuplicateGroup {
                match_type: MatchType::ExactName,
                similarity: 1.0,
                files: members.into_iter().cloned().collect(),
            })
            .collect()
    }

    /// Pairwise comparison of distinct lowercased names. Quadratic in the
    /// number of distinct names.
    pub fn similar_groups(&self, records: &[FileRecord]) -> Vec<DuplicateGroup> {
        let mut names: Vec<String> = Vec::new();
        let mut by_name: HashMap<String, Vec<&FileRecord>> = HashMap::new();

        for record in records {
            let name = record.lowercase_name();
            by_name
                .entry(name.clone())
                .or_insert_with(|| {
                    names.push(name);
                    Vec::new()
                })
                .push(record);
        }

        let mut groups = Vec::new();
        for (i, first) in names.iter().enumerate() {
            for second in &names[i + 1..] {
                let similarity = jaccard_similarity(first, second);
                if similarity > self.threshold {
                    let files = by_name[first]
                        .iter()
                        .chain(by_name[second].iter())
                        .map(|r| (*r).clone())
                        .collect();
                    groups.push(DuplicateGroup {
                        match_type: MatchType::SimilarName,
                        similarity,
                        files,
                    });
                }
            }
        }
        groups
    }
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}
