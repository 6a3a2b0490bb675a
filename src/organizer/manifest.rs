// file: src/organizer/manifest.rs
// description: cloud-storage listing loader producing file records
// reference: Google Drive v3 files.list export

use crate::error::{KovaError, Result};
use crate::models::file_record::{FileRecord, ManifestEntry};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Either a bare array of entries or a listing response with a `files` key.
#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestDocument {
    Entries(Vec<ManifestEntry>),
    Listing { files: Vec<ManifestEntry> },
}

pub struct ManifestLoader;

impl ManifestLoader {
    pub async fn from_json(path: &Path) -> Result<Vec<FileRecord>> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| KovaError::file(path, e))?;

        let records = Self::parse(&content)?;
        info!("Loaded {} file records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Entries without an `id` receive `manifest-<index>`.
    pub fn parse(content: &str) -> Result<Vec<FileRecord>> {
        let document: ManifestDocument = serde_json::from_str(content)
            .map_err(|e| KovaError::Validation(format!("invalid manifest: {}", e)))?;

        let entries = match document {
            ManifestDocument::Entries(entries) => entries,
            ManifestDocument::Listing { files } => files,
        };

        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.into_record(format!("manifest-{}", i)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_array_manifest() {
        let records = ManifestLoader::parse(
            r#"[
                {"id": "a1", "name": "kova_config.json", "size": "512"},
                {"name": "README.md", "size": 2048, "mimeType": "text/markdown"}
            ]"#,
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a1");
        assert_eq!(records[0].size, 512);
        assert_eq!(records[1].id, "manifest-1");
        assert_eq!(records[1].mime_type, "text/markdown");
    }

    #[test]
    fn test_listing_manifest() {
        let records =
            ManifestLoader::parse(r#"{"files": [{"id": "x", "name": "Notes"}]}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size, 0);
    }

    #[test]
    fn test_invalid_manifest() {
        let err = ManifestLoader::parse(r#"{"name": "no list"}"#).unwrap_err();
        assert!(matches!(err, KovaError::Validation(_)));
    }

    #[tokio::test]
    async fn test_from_json_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");
        tokio::fs::write(&path, r#"[{"id": "1", "name": "guide.pdf"}]"#)
            .await
            .unwrap();

        let records = ManifestLoader::from_json(&path).await.unwrap();
        assert_eq!(records[0].name, "guide.pdf");

        let missing = ManifestLoader::from_json(&temp.path().join("absent.json")).await;
        assert!(matches!(missing, Err(KovaError::FileOperation { .. })));
    }
}
