// file: src/organizer/planner.rs
// description: migration planning onto the KOVA master hub folder taxonomy
// reference: declarative move/archive/rename actions, no filesystem mutation

use super::ManifestAnalysis;
use super::patterns::{DASH_RUN, DOTTED_VERSION, NON_NAME_CHAR};
use crate::models::file_record::{Category, FileRecord};
use crate::models::migration::{ActionKind, MigrationAction, MigrationPlan};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info};

/// Top-level folders and their subfolders, in creation order.
pub const TAXONOMY: &[(&str, &[&str])] = &[
    ("01_CORE_SYSTEM", &["repositories", "config", "secrets"]),
    (
        "02_DOCUMENTATION",
        &["architecture", "api", "guides", "specifications"],
    ),
    (
        "03_INTEGRATIONS",
        &["google_drive", "github", "claude", "external_apis"],
    ),
    ("04_WORKFLOWS", &["automation", "ci_cd", "deployment", "monitoring"]),
    ("05_DATA", &["databases", "storage", "cache", "logs"]),
    ("06_DEVELOPMENT", &["active", "testing", "prototypes", "archive"]),
    (
        "07_OPERATIONS",
        &["runbooks", "incidents", "maintenance", "backups"],
    ),
    ("08_ANALYTICS", &["metrics", "reports", "dashboards"]),
];

pub const ARCHIVE_FOLDER: &str = "06_DEVELOPMENT/archive";
const DEFAULT_FOLDER: &str = "06_DEVELOPMENT/active";
const MAX_DESCRIPTION_LEN: usize = 50;

pub const REASON_OBSOLETE: &str = "obsolete";
pub const REASON_DUPLICATE: &str = "duplicate";

/// Every top-level folder followed by its subfolders.
pub fn folder_creation_list() -> Vec<String> {
    let mut folders = Vec::new();
    for (main, subs) in TAXONOMY {
        folders.push(main.to_string());
        folders.extend(subs.iter().map(|sub| format!("{}/{}", main, sub)));
    }
    folders
}

pub fn target_folder(category: &Category) -> &'static str {
    match category {
        Category::Core => "01_CORE_SYSTEM",
        Category::Documentation => "02_DOCUMENTATION",
        Category::Configuration => "01_CORE_SYSTEM/config",
        _ => DEFAULT_FOLDER,
    }
}

fn project_for(lower_name: &str) -> &'static str {
    if lower_name.contains("mem0") {
        "Kova-Mem0"
    } else if lower_name.contains("site") {
        "Kova-Site"
    } else if lower_name.contains("docengine") {
        "Kova-DocEngine"
    } else if lower_name.contains("multi-repo") || lower_name.contains("multirepo") {
        "Multi-Repo"
    } else {
        "Kova-AI"
    }
}

fn version_for(name: &str) -> String {
    let lower = name.to_lowercase();
    if lower.contains("draft") {
        return "draft".to_string();
    }
    if lower.contains("final") {
        return "final".to_string();
    }
    DOTTED_VERSION
        .captures(name)
        .map(|caps| format!("v{}.{}", &caps[1], &caps[2]))
        .unwrap_or_else(|| "v1.0".to_string())
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

/// `<date>_<CATEGORY>_<project>_<description>_<version><ext>`.
///
/// The date is the record's modification day, or `today` when unknown.
pub fn standardized_name(record: &FileRecord, today: DateTime<Utc>) -> String {
    let date = record
        .modified_time
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string();
    let category = record.category.as_str().to_uppercase();
    let project = project_for(&record.lowercase_name());

    let (stem, extension) = split_extension(&record.name);
    let cleaned = NON_NAME_CHAR.replace_all(stem, "-");
    let collapsed = DASH_RUN.replace_all(&cleaned, "-");
    let description: String = collapsed
        .trim_matches('-')
        .chars()
        .take(MAX_DESCRIPTION_LEN)
        .collect();

    format!(
        "{}_{}_{}_{}_{}{}",
        date,
        category,
        project,
        description,
        version_for(&record.name),
        extension
    )
}

pub struct MigrationPlanner {
    standardize_names: bool,
}

impl MigrationPlanner {
    pub fn new(standardize_names: bool) -> Self {
        Self { standardize_names }
    }

    pub fn plan(&self, analysis: &ManifestAnalysis) -> MigrationPlan {
        self.plan_at(analysis, Utc::now())
    }

    /// Walks the manifest in order. Each file gets one archive action or
    /// one move action; rename actions follow moves when enabled.
    pub fn plan_at(&self, analysis: &ManifestAnalysis, now: DateTime<Utc>) -> MigrationPlan {
        let obsolete: HashSet<&str> = analysis.obsolete.iter().map(|f| f.id.as_str()).collect();
        let redundant: HashSet<&str> = analysis
            .duplicates
            .iter()
            .flat_map(|group| group.redundant())
            .map(|f| f.id.as_str())
            .collect();

        let mut actions = Vec::new();
        for record in &analysis.files {
            let id = record.id.as_str();

            let archive_reason = if redundant.contains(id) {
                Some(REASON_DUPLICATE)
            } else if obsolete.contains(id) {
                Some(REASON_OBSOLETE)
            } else {
                None
            };

            if let Some(reason) = archive_reason {
                debug!("Archiving {} ({})", record.name, reason);
                actions.push(action(ActionKind::Archive, record, ARCHIVE_FOLDER, reason));
                continue;
            }

            let folder = target_folder(&record.category);
            actions.push(action(
                ActionKind::Move,
                record,
                folder,
                &format!("category: {}", record.category),
            ));

            if self.standardize_names {
                let renamed = standardized_name(record, now);
                if renamed != record.name {
                    actions.push(action(
                        ActionKind::Rename,
                        record,
                        &format!("{}/{}", folder, renamed),
                        "standardized name",
                    ));
                }
            }
        }

        let plan = MigrationPlan::new(folder_creation_list(), actions);
        info!(
            "Planned {} actions and {} folders for {} files",
            plan.total_actions(),
            plan.folder_creation.len(),
            analysis.files.len()
        );
        plan
    }
}

impl Default for MigrationPlanner {
    fn default() -> Self {
        Self::new(false)
    }
}

fn action(kind: ActionKind, record: &FileRecord, target: &str, reason: &str) -> MigrationAction {
    MigrationAction {
        kind,
        file_id: record.id.clone(),
        file_name: record.name.clone(),
        target: target.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organizer::ManifestAnalyzer;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn analyze(records: Vec<FileRecord>) -> ManifestAnalysis {
        ManifestAnalyzer::default().analyze(records)
    }

    #[test]
    fn test_folder_creation_covers_taxonomy() {
        let folders = folder_creation_list();
        assert_eq!(folders.len(), 38);
        assert_eq!(folders[0], "01_CORE_SYSTEM");
        assert_eq!(folders[1], "01_CORE_SYSTEM/repositories");
        assert!(folders.contains(&ARCHIVE_FOLDER.to_string()));
        assert_eq!(folders.last().map(String::as_str), Some("08_ANALYTICS/dashboards"));
    }

    #[test]
    fn test_folder_creation_is_input_independent() {
        let planner = MigrationPlanner::default();
        let empty = planner.plan(&analyze(vec![]));
        let busy = planner.plan(&analyze(vec![
            FileRecord::new("1", "main.rs", 10),
            FileRecord::new("2", "notes old.txt", 10),
        ]));

        assert_eq!(empty.folder_creation, busy.folder_creation);
        assert_eq!(empty.total_actions(), 0);
    }

    #[test]
    fn test_three_file_scenario() {
        let analysis = analyze(vec![
            FileRecord::new("cfg", "kova_config.json", 1024),
            FileRecord::new("cfg-copy", "kova_config_copy.json", 1024),
            FileRecord::new("readme", "README.md", 2048),
        ]);

        assert_eq!(analysis.duplicates.len(), 1);
        let ids: Vec<&str> = analysis.duplicates[0]
            .files
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(ids, vec!["cfg", "cfg-copy"]);
        assert_eq!(analysis.files[0].category, Category::Configuration);
        assert_eq!(analysis.files[1].category, Category::Configuration);
        assert_eq!(analysis.files[2].category, Category::Documentation);

        let plan = MigrationPlanner::default().plan(&analysis);
        assert_eq!(plan.totals()[&ActionKind::Archive], 1);
        assert_eq!(plan.totals()[&ActionKind::Move], 2);

        let archived: Vec<(&str, &str)> = plan
            .actions_of(ActionKind::Archive)
            .map(|a| (a.file_id.as_str(), a.reason.as_str()))
            .collect();
        assert_eq!(archived, vec![("cfg-copy", REASON_DUPLICATE)]);

        let moves: Vec<(&str, &str)> = plan
            .actions_of(ActionKind::Move)
            .map(|a| (a.file_id.as_str(), a.target.as_str()))
            .collect();
        assert_eq!(
            moves,
            vec![("cfg", "01_CORE_SYSTEM/config"), ("readme", "02_DOCUMENTATION")]
        );
    }

    #[test]
    fn test_duplicate_archive_reason() {
        let analysis = analyze(vec![
            FileRecord::new("a", "Kova Plan.md", 100),
            FileRecord::new("b", "kova-plan.md", 100),
        ]);

        let plan = MigrationPlanner::default().plan(&analysis);
        let archive: Vec<&MigrationAction> = plan.actions_of(ActionKind::Archive).collect();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].file_id, "b");
        assert_eq!(archive[0].reason, REASON_DUPLICATE);
        assert_eq!(archive[0].target, ARCHIVE_FOLDER);
    }

    #[test]
    fn test_obsolete_reason_without_duplicate() {
        let analysis = analyze(vec![FileRecord::new("t", "scratch_temp.txt", 10)]);

        let plan = MigrationPlanner::default().plan(&analysis);
        let archive: Vec<&MigrationAction> = plan.actions_of(ActionKind::Archive).collect();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].reason, REASON_OBSOLETE);
    }

    #[test]
    fn test_non_ascii_names_are_moved_not_archived() {
        let analysis = analyze(vec![
            FileRecord::new("1", "Отчёт.docx", 1024),
            FileRecord::new("2", "Бюджет.docx", 1024),
        ]);

        assert!(analysis.duplicates.is_empty());
        let plan = MigrationPlanner::default().plan(&analysis);
        assert_eq!(plan.actions_of(ActionKind::Archive).count(), 0);
        assert_eq!(plan.actions_of(ActionKind::Move).count(), 2);
    }

    #[test]
    fn test_unknown_and_code_go_to_active() {
        assert_eq!(target_folder(&Category::Code), "06_DEVELOPMENT/active");
        assert_eq!(target_folder(&Category::Unknown), "06_DEVELOPMENT/active");
        assert_eq!(
            target_folder(&Category::Tag("integration".to_string())),
            "06_DEVELOPMENT/active"
        );
    }

    #[test]
    fn test_standardized_name() {
        let modified = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let mut record = FileRecord::new("1", "Kova Mem0 -- Setup Guide v2.1.md", 10)
            .with_modified(modified);
        record.category = Category::Documentation;

        assert_eq!(
            standardized_name(&record, Utc::now()),
            "2024-03-09_DOCUMENTATION_Kova-Mem0_Kova-Mem0-Setup-Guide-v2-1_v2.1.md"
        );

        let today = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        let plain = FileRecord::new("2", "notes", 0);
        assert_eq!(
            standardized_name(&plain, today),
            "2025-01-02_UNKNOWN_Kova-AI_notes_v1.0"
        );
    }

    #[test]
    fn test_rename_actions_follow_moves() {
        let analysis = analyze(vec![
            FileRecord::new("1", "site launch plan.md", 10),
            FileRecord::new("2", "old site.md", 10),
        ]);

        let plan = MigrationPlanner::new(true).plan(&analysis);
        let kinds: Vec<ActionKind> = plan.actions.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![ActionKind::Move, ActionKind::Rename, ActionKind::Archive]
        );

        let rename = &plan.actions[1];
        assert!(rename.target.starts_with("02_DOCUMENTATION/"));
        assert!(rename.target.contains("_DOCUMENTATION_Kova-Site_site-launch-plan_v1.0.md"));
    }
}
