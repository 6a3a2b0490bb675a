// file: src/organizer/scanner.rs
// description: local directory walking into file records
// reference: https://docs.rs/walkdir

use crate::error::{KovaError, Result};
use crate::models::file_record::FileRecord;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct LocalScanner {
    skip_patterns: Vec<String>,
}

impl LocalScanner {
    pub fn new(skip_patterns: Vec<String>) -> Self {
        Self { skip_patterns }
    }

    pub fn scan_directory(&self, root: &Path) -> Result<Vec<FileRecord>> {
        if !root.is_dir() {
            return Err(KovaError::NotFound(format!(
                "scan root {} is not a directory",
                root.display()
            )));
        }

        info!("Scanning directory: {}", root.display());
        let mut records = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative_path = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            if self.should_skip(&relative_path) {
                debug!("Skipping file: {}", relative_path);
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("Failed to read metadata for {}: {}", path.display(), e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            let mut record = FileRecord::new(path_digest(&relative_path), name, metadata.len())
                .with_mime_type(guess_mime_type(path));
            record.modified_time = metadata.modified().ok().map(DateTime::<Utc>::from);
            record.created_time = metadata.created().ok().map(DateTime::<Utc>::from);
            record.path = Some(relative_path);

            records.push(record);
        }

        info!("Found {} files", records.len());
        Ok(records)
    }

    /// `*.ext` matches by suffix, `dir/*` matches anything under `dir/`,
    /// other patterns match as substrings of the relative path.
    fn should_skip(&self, relative_path: &str) -> bool {
        self.skip_patterns.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                relative_path.ends_with(suffix)
            } else if let Some(dir) = pattern.strip_suffix('*') {
                relative_path.starts_with(dir) || relative_path.contains(&format!("/{}", dir))
            } else {
                relative_path.contains(pattern.as_str())
            }
        })
    }
}

fn path_digest(relative_path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(relative_path.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "md" => "text/markdown",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "yaml" | "yml" => "application/yaml",
        "toml" => "application/toml",
        "pdf" => "application/pdf",
        "doc" | "docx" => "application/msword",
        "xls" | "xlsx" => "application/vnd.ms-excel",
        "py" => "text/x-python",
        "js" => "text/javascript",
        "ts" => "text/typescript",
        "rs" => "text/x-rust",
        "go" => "text/x-go",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
