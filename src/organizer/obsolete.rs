// file: src/organizer/obsolete.rs
// description: obsolescence detection by filename keywords and version markers

use super::patterns::VERSION_MARKER;
use crate::models::file_record::FileRecord;
use tracing::info;

pub const OBSOLESCENCE_KEYWORDS: &[&str] = &[
    "old",
    "backup",
    "copy",
    "temp",
    "tmp",
    "draft",
    "test",
    "deprecated",
    "archive",
    "unused",
];

#[derive(Default)]
pub struct ObsolescenceDetector;

impl ObsolescenceDetector {
    pub fn new() -> Self {
        Self
    }

    /// Plain substring checks, so "golden" and "contest" match too.
    pub fn is_obsolete(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        OBSOLESCENCE_KEYWORDS.iter().any(|kw| name.contains(kw)) || VERSION_MARKER.is_match(&name)
    }

    pub fn find_obsolete(&self, records: &[FileRecord]) -> Vec<FileRecord> {
        let obsolete: Vec<FileRecord> = records
            .iter()
            .filter(|record| self.is_obsolete(&record.name))
            .cloned()
            .collect();

        info!("Found {} potentially obsolete files", obsolete.len());
        obsolete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        let detector = ObsolescenceDetector::new();

        assert!(detector.is_obsolete("Budget OLD.xlsx"));
        assert!(detector.is_obsolete("kova_config_copy.json"));
        assert!(detector.is_obsolete("tmp-export.csv"));
        assert!(detector.is_obsolete("Deprecated API notes"));
        assert!(!detector.is_obsolete("kova_config.json"));
        assert!(!detector.is_obsolete("README.md"));
    }

    #[test]
    fn test_version_markers() {
        let detector = ObsolescenceDetector::new();

        assert!(detector.is_obsolete("engine_v2.py"));
        assert!(detector.is_obsolete("Roadmap V9.docx"));
        assert!(!detector.is_obsolete("engine_v0.py"));
    }

    #[test]
    fn test_find_obsolete_preserves_order() {
        let records = vec![
            FileRecord::new("1", "draft plan.md", 1),
            FileRecord::new("2", "plan.md", 1),
            FileRecord::new("3", "archive.zip", 1),
        ];

        let ids: Vec<String> = ObsolescenceDetector::new()
            .find_obsolete(&records)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
