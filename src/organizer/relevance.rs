// file: src/organizer/relevance.rs
// description: heuristic relevance scoring for file records
// reference: keyword, recency, type and size signals clamped to 0..=10

use crate::models::file_record::{FileRecord, MAX_RELEVANCE};
use chrono::{DateTime, Utc};

const KEYWORD_POINTS: u8 = 2;
const KEYWORD_CAP: u8 = 4;
const MIN_USEFUL_SIZE: u64 = 1024;
const MAX_USEFUL_SIZE: u64 = 10 * 1024 * 1024;

pub struct RelevanceScorer {
    keywords: Vec<String>,
}

impl RelevanceScorer {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn matched_keywords(&self, name: &str) -> Vec<String> {
        let name = name.to_lowercase();
        self.keywords
            .iter()
            .filter(|kw| name.contains(kw.as_str()))
            .cloned()
            .collect()
    }

    pub fn score(&self, record: &FileRecord, now: DateTime<Utc>) -> u8 {
        let matches = self.matched_keywords(&record.name).len();
        let keyword_points = (matches.min(u8::MAX as usize) as u8)
            .saturating_mul(KEYWORD_POINTS)
            .min(KEYWORD_CAP);

        let total = keyword_points
            + recency_points(record.modified_time, now)
            + type_points(&record.mime_type)
            + size_points(record.size);

        total.min(MAX_RELEVANCE)
    }

    /// Stores the score and matched keywords on the record.
    pub fn apply(&self, record: &mut FileRecord, now: DateTime<Utc>) {
        let score = self.score(record, now);
        record.set_relevance(score);
        record.keywords_found = self.matched_keywords(&record.name);
    }
}

fn recency_points(modified: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u8 {
    let Some(modified) = modified else {
        return 0;
    };

    match (now - modified).num_days() {
        days if days < 30 => 3,
        days if days < 90 => 2,
        days if days < 180 => 1,
        _ => 0,
    }
}

fn type_points(mime_type: &str) -> u8 {
    if ["document", "text", "spreadsheet", "json"]
        .iter()
        .any(|t| mime_type.contains(t))
    {
        2
    } else if mime_type.contains("folder") {
        1
    } else {
        0
    }
}

fn size_points(size: u64) -> u8 {
    u8::from(size > MIN_USEFUL_SIZE && size < MAX_USEFUL_SIZE)
}
