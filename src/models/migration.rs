// file: src/models/migration.rs
// description: duplicate groups and declarative migration actions
// reference: KOVA master hub reorganization report

use super::file_record::FileRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    ExactName,
    SimilarName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub match_type: MatchType,
    /// 1.0 for exact groups, Jaccard index for similar-name groups.
    pub similarity: f64,
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn canonical(&self) -> Option<&FileRecord> {
        self.files.first()
    }

    pub fn redundant(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter().skip(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Move,
    Archive,
    Delete,
    Merge,
    Rename,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Move => "move",
            ActionKind::Archive => "archive",
            ActionKind::Delete => "delete",
            ActionKind::Merge => "merge",
            ActionKind::Rename => "rename",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationAction {
    pub kind: ActionKind,
    pub file_id: String,
    pub file_name: String,
    pub target: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationPlan {
    pub plan_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub folder_creation: Vec<String>,
    pub actions: Vec<MigrationAction>,
}

impl MigrationPlan {
    pub fn new(folder_creation: Vec<String>, actions: Vec<MigrationAction>) -> Self {
        Self {
            plan_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            folder_creation,
            actions,
        }
    }

    pub fn total_actions(&self) -> usize {
        self.actions.len()
    }

    pub fn actions_of(&self, kind: ActionKind) -> impl Iterator<Item = &MigrationAction> {
        self.actions.iter().filter(move |a| a.kind == kind)
    }

    pub fn totals(&self) -> BTreeMap<ActionKind, usize> {
        let mut totals = BTreeMap::new();
        for action in &self.actions {
            *totals.entry(action.kind).or_insert(0) += 1;
        }
        totals
    }
}
