// file: src/utils/validation.rs
// description: structural validation of the tracked repository document
// reference: input validation patterns

use crate::models::repository::RepoType;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const REQUIRED_REPO_FIELDS: &[&str] = &["name", "full_name", "type", "enabled"];
const RECOMMENDED_REPO_FIELDS: &[&str] = &["description", "sync_priority", "features"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum JsonKind {
    String,
    Array,
    Object,
    Bool,
    Integer,
}

impl JsonKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            JsonKind::String => value.is_string(),
            JsonKind::Array => value.is_array(),
            JsonKind::Object => value.is_object(),
            JsonKind::Bool => value.is_boolean(),
            JsonKind::Integer => value.is_i64() || value.is_u64(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
            JsonKind::Bool => "bool",
            JsonKind::Integer => "integer",
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

const REQUIRED_FIELDS: &[(&str, JsonKind)] = &[
    ("github_owner", JsonKind::String),
    ("repositories", JsonKind::Array),
    ("sync_settings", JsonKind::Object),
    ("discovery_settings", JsonKind::Object),
    ("integration_settings", JsonKind::Object),
];

const RECOMMENDED_SETTINGS: &[(&str, &[(&str, JsonKind)])] = &[
    (
        "sync_settings",
        &[
            ("auto_sync_enabled", JsonKind::Bool),
            ("sync_interval_minutes", JsonKind::Integer),
            ("sync_on_push", JsonKind::Bool),
            ("sync_on_pr", JsonKind::Bool),
            ("cross_repo_notifications", JsonKind::Bool),
        ],
    ),
    (
        "discovery_settings",
        &[
            ("auto_discover_new_repos", JsonKind::Bool),
            ("repo_name_pattern", JsonKind::String),
            ("watch_for_new_repos", JsonKind::Bool),
        ],
    ),
    (
        "integration_settings",
        &[
            ("claude_api_enabled", JsonKind::Bool),
            ("github_webhooks_enabled", JsonKind::Bool),
            ("cross_repo_prs", JsonKind::Bool),
            ("unified_changelog", JsonKind::Bool),
        ],
    ),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    /// Unreadable or malformed files are reported as errors, never raised.
    pub fn validate_file(path: &Path) -> ValidationReport {
        let mut report = ValidationReport::default();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                report.error(format!("Cannot read {}: {}", path.display(), e));
                return report;
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(document) => Self::validate_value(&document),
            Err(e) => {
                report.error(format!("Invalid JSON: {}", e));
                report
            }
        }
    }

    pub fn validate_value(document: &Value) -> ValidationReport {
        let mut report = ValidationReport::default();

        let Some(root) = document.as_object() else {
            report.error(format!(
                "Document should be an object, got {}",
                kind_of(document)
            ));
            return report;
        };

        Self::check_required_fields(root, &mut report);
        Self::check_owner(root, &mut report);
        Self::check_repositories(root, &mut report);
        Self::check_settings(root, &mut report);
        Self::check_duplicates(root, &mut report);

        report
    }

    fn check_required_fields(root: &Map<String, Value>, report: &mut ValidationReport) {
        for (field, kind) in REQUIRED_FIELDS {
            match root.get(*field) {
                None => report.error(format!("Missing required field: {}", field)),
                Some(value) if !kind.matches(value) => report.error(format!(
                    "Field '{}' should be {}, got {}",
                    field,
                    kind.name(),
                    kind_of(value)
                )),
                Some(_) => {}
            }
        }
    }

    fn check_owner(root: &Map<String, Value>, report: &mut ValidationReport) {
        match root.get("github_owner").and_then(Value::as_str) {
            Some(owner) if owner.contains(' ') => {
                report.error("github_owner should not contain spaces")
            }
            Some(owner) if !owner.is_empty() => {}
            _ => report.error("github_owner must be a non-empty string"),
        }
    }

    fn check_repositories(root: &Map<String, Value>, report: &mut ValidationReport) {
        let Some(repos) = root.get("repositories").and_then(Value::as_array) else {
            return;
        };

        if repos.is_empty() {
            report.warning("No repositories configured");
            return;
        }

        let owner = root.get("github_owner").and_then(Value::as_str);

        for repo in repos {
            let Some(repo) = repo.as_object() else {
                report.error(format!("Repository entry should be an object, got {}", kind_of(repo)));
                continue;
            };
            let label = repo.get("name").and_then(Value::as_str).unwrap_or("unknown");

            for field in REQUIRED_REPO_FIELDS {
                if !repo.contains_key(*field) {
                    report.error(format!("Repo '{}' missing required field: {}", label, field));
                }
            }
            for field in RECOMMENDED_REPO_FIELDS {
                if !repo.contains_key(*field) {
                    report.warning(format!(
                        "Repo '{}' missing recommended field: {}",
                        label, field
                    ));
                }
            }

            if let Some(repo_type) = repo.get("type") {
                let standard = repo_type
                    .as_str()
                    .map(|t| RepoType::parse(t).is_standard())
                    .unwrap_or(false);
                if !standard {
                    report.warning(format!(
                        "Repo type {} not in standard types: core, service, frontend, experimental",
                        repo_type
                    ));
                }
            }

            if let Some(full_name) = repo.get("full_name") {
                match full_name.as_str().and_then(|f| f.split_once('/')) {
                    Some((repo_owner, _)) => {
                        if owner.is_some_and(|o| o != repo_owner) {
                            report.warning(format!(
                                "Repo owner '{}' doesn't match github_owner '{}'",
                                repo_owner,
                                owner.unwrap_or_default()
                            ));
                        }
                    }
                    None => report.error(format!(
                        "Invalid full_name format: {} (should be 'owner/repo')",
                        full_name
                    )),
                }
            }

            if let Some(priority) = repo.get("sync_priority") {
                let in_range = priority.as_i64().is_some_and(|p| (1..=5).contains(&p));
                if !in_range {
                    report.warning(format!(
                        "sync_priority should be between 1-5, got: {}",
                        priority
                    ));
                }
            }

            if repo.get("features").is_some_and(|f| !f.is_array()) {
                report.error(format!("Repo '{}': 'features' should be a list", label));
            }
        }
    }

    fn check_settings(root: &Map<String, Value>, report: &mut ValidationReport) {
        for (section, fields) in RECOMMENDED_SETTINGS {
            let Some(settings) = root.get(*section).and_then(Value::as_object) else {
                continue;
            };
            for (field, kind) in *fields {
                match settings.get(*field) {
                    None => report.warning(format!(
                        "Missing recommended {} field: {}",
                        section, field
                    )),
                    Some(value) if !kind.matches(value) => report.error(format!(
                        "{}.{} should be {}",
                        section,
                        field,
                        kind.name()
                    )),
                    Some(_) => {}
                }
            }
        }
    }

    fn check_duplicates(root: &Map<String, Value>, report: &mut ValidationReport) {
        let Some(repos) = root.get("repositories").and_then(Value::as_array) else {
            return;
        };

        for key in ["name", "full_name"] {
            let mut seen = HashSet::new();
            for value in repos.iter().filter_map(|r| r.get(key)).filter_map(Value::as_str) {
                if !seen.insert(value.to_lowercase()) {
                    report.error(format!("Duplicate {}: {}", key, value));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::repository::RepositoryDocument;
    use serde_json::json;
    use tempfile::TempDir;

    fn full_settings() -> Value {
        json!({
            "github_owner": "Kathrynhiggs21",
            "repositories": [{
                "name": "kova-ai",
                "full_name": "Kathrynhiggs21/kova-ai",
                "type": "service",
                "enabled": true,
                "description": "Backend",
                "sync_priority": 1,
                "features": ["api"]
            }],
            "sync_settings": {
                "auto_sync_enabled": true,
                "sync_interval_minutes": 30,
                "sync_on_push": true,
                "sync_on_pr": false,
                "cross_repo_notifications": true
            },
            "discovery_settings": {
                "auto_discover_new_repos": true,
                "repo_name_pattern": "kova",
                "watch_for_new_repos": true
            },
            "integration_settings": {
                "claude_api_enabled": true,
                "github_webhooks_enabled": false,
                "cross_repo_prs": false,
                "unified_changelog": true
            }
        })
    }

    #[test]
    fn test_complete_document_is_clean() {
        let report = ConfigValidator::validate_value(&full_settings());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_missing_and_mistyped_fields() {
        let report = ConfigValidator::validate_value(&json!({
            "github_owner": "has space",
            "repositories": {},
        }));

        assert!(report.errors.contains(&"Missing required field: sync_settings".to_string()));
        assert!(report
            .errors
            .contains(&"Field 'repositories' should be array, got object".to_string()));
        assert!(report
            .errors
            .contains(&"github_owner should not contain spaces".to_string()));
    }

    #[test]
    fn test_repository_rules() {
        let mut document = full_settings();
        document["repositories"] = json!([
            {"name": "a", "full_name": "other/a", "type": "library", "enabled": true,
             "sync_priority": 9, "features": "api"},
            {"name": "a", "full_name": "no-slash", "enabled": true}
        ]);

        let report = ConfigValidator::validate_value(&document);

        assert!(report.errors.contains(&"Repo 'a': 'features' should be a list".to_string()));
        assert!(report.errors.contains(&"Repo 'a' missing required field: type".to_string()));
        assert!(report
            .errors
            .contains(&"Invalid full_name format: \"no-slash\" (should be 'owner/repo')".to_string()));
        assert!(report.errors.contains(&"Duplicate name: a".to_string()));

        document["repositories"] = json!([
            {"name": "alpha", "full_name": "acme/alpha", "type": "core"},
            {"name": "Alpha", "full_name": "ACME/Alpha", "type": "core"}
        ]);
        let report = ConfigValidator::validate_value(&document);
        assert!(report.errors.contains(&"Duplicate full_name: ACME/Alpha".to_string()));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.starts_with("Repo owner 'other'")));
        assert!(report
            .warnings
            .contains(&"sync_priority should be between 1-5, got: 9".to_string()));
        assert!(report.warnings.iter().any(|w| w.contains("\"library\"")));
    }

    #[test]
    fn test_settings_warnings_and_type_errors() {
        let mut document = full_settings();
        document["sync_settings"] = json!({"sync_interval_minutes": "often"});

        let report = ConfigValidator::validate_value(&document);
        assert!(report
            .errors
            .contains(&"sync_settings.sync_interval_minutes should be integer".to_string()));
        assert!(report
            .warnings
            .contains(&"Missing recommended sync_settings field: sync_on_push".to_string()));
    }

    #[test]
    fn test_default_document_passes() {
        let document = serde_json::to_value(RepositoryDocument::default_document()).unwrap();
        let report = ConfigValidator::validate_value(&document);
        assert!(report.is_valid(), "{:?}", report.errors);
    }

    #[test]
    fn test_validate_file_errors() {
        let temp = TempDir::new().unwrap();

        let missing = ConfigValidator::validate_file(&temp.path().join("absent.json"));
        assert_eq!(missing.errors.len(), 1);

        let broken = temp.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        let report = ConfigValidator::validate_file(&broken);
        assert!(report.errors[0].starts_with("Invalid JSON"));
    }
}
