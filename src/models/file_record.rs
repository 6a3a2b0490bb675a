// file: src/models/file_record.rs
// description: file records collected from cloud storage listings or local scans
// reference: Google Drive v3 files.list field layout

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

pub const MAX_RELEVANCE: u8 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Core,
    Documentation,
    Configuration,
    Code,
    #[default]
    Unknown,
    /// Source-specific tag contributed by a configured rule.
    #[serde(untagged)]
    Tag(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Core => "core",
            Category::Documentation => "documentation",
            Category::Configuration => "configuration",
            Category::Code => "code",
            Category::Unknown => "unknown",
            Category::Tag(tag) => tag,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "core" => Category::Core,
            "documentation" => Category::Documentation,
            "configuration" => Category::Configuration,
            "code" => Category::Code,
            "unknown" => Category::Unknown,
            other => Category::Tag(other.to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub modified_time: Option<DateTime<Utc>>,
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub parents: Vec<String>,
    pub web_link: Option<String>,
    /// Source location for records produced by a local scan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub relevance_score: u8,
    #[serde(default)]
    pub keywords_found: Vec<String>,
}

impl FileRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: String::new(),
            size,
            modified_time: None,
            created_time: None,
            owners: Vec::new(),
            parents: Vec::new(),
            web_link: None,
            path: None,
            category: Category::Unknown,
            relevance_score: 0,
            keywords_found: Vec::new(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified_time = Some(modified);
        self
    }

    pub fn lowercase_name(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn set_relevance(&mut self, score: u8) {
        self.relevance_score = score.min(MAX_RELEVANCE);
    }
}

/// Owner entry as returned by the listing API: either a bare string or a
/// user profile object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ManifestOwner {
    Name(String),
    Profile {
        #[serde(rename = "displayName")]
        display_name: Option<String>,
        #[serde(rename = "emailAddress")]
        email_address: Option<String>,
    },
}

impl ManifestOwner {
    fn label(self) -> Option<String> {
        match self {
            ManifestOwner::Name(name) => Some(name),
            ManifestOwner::Profile {
                display_name,
                email_address,
            } => email_address.or(display_name),
        }
    }
}

/// One object of a cloud-storage file listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: u64,
    #[serde(default)]
    pub modified_time: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub owners: Vec<ManifestOwner>,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub web_view_link: Option<String>,
}

impl ManifestEntry {
    /// `fallback_id` is used when the listing carries no identifier.
    pub fn into_record(self, fallback_id: String) -> FileRecord {
        let modified_time = parse_timestamp(&self.name, self.modified_time.as_deref());
        let created_time = parse_timestamp(&self.name, self.created_time.as_deref());

        FileRecord {
            id: self.id.unwrap_or(fallback_id),
            name: self.name,
            mime_type: self.mime_type.unwrap_or_default(),
            size: self.size,
            modified_time,
            created_time,
            owners: self
                .owners
                .into_iter()
                .filter_map(ManifestOwner::label)
                .collect(),
            parents: self.parents,
            web_link: self.web_view_link,
            path: None,
            category: Category::Unknown,
            relevance_score: 0,
            keywords_found: Vec::new(),
        }
    }
}

fn parse_timestamp(name: &str, value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            warn!("Ignoring unparseable timestamp '{}' on {}: {}", value, name, e);
            None
        }
    }
}

/// Listings report `size` as a decimal string; local exports use numbers.
fn deserialize_size<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSize {
        Number(u64),
        Text(String),
        Missing(Option<()>),
    }

    match RawSize::deserialize(deserializer)? {
        RawSize::Number(n) => Ok(n),
        RawSize::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
        RawSize::Missing(_) => Ok(0),
    }
}
