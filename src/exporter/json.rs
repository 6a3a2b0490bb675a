// file: src/exporter/json.rs
// description: json export of sync reports, manifest analyses and migration plans

use crate::error::{KovaError, Result};
use crate::models::migration::MigrationPlan;
use crate::models::sync_result::{SyncReport, SyncStatus};
use crate::organizer::ManifestAnalysis;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ReportExporter {
    output_dir: PathBuf,
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct SyncExport<'a> {
    exported_at: DateTime<Utc>,
    total_repositories: usize,
    by_status: BTreeMap<&'static str, usize>,
    results: &'a SyncReport,
}

#[derive(Debug, Serialize)]
struct PlanExport<'a> {
    exported_at: DateTime<Utc>,
    totals: BTreeMap<&'static str, usize>,
    #[serde(flatten)]
    plan: &'a MigrationPlan,
}

impl ReportExporter {
    pub fn new(output_dir: impl Into<PathBuf>, pretty: bool) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|e| KovaError::file(&output_dir, e))?;
        Ok(Self { output_dir, pretty })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn export_sync_report(&self, report: &SyncReport) -> Result<PathBuf> {
        let mut by_status = BTreeMap::new();
        for result in report.values() {
            *by_status.entry(result.status.as_str()).or_insert(0) += 1;
        }
        for status in [SyncStatus::Success, SyncStatus::Error, SyncStatus::NotFound] {
            by_status.entry(status.as_str()).or_insert(0);
        }

        let export = SyncExport {
            exported_at: Utc::now(),
            total_repositories: report.len(),
            by_status,
            results: report,
        };
        self.write("sync_report", &export).await
    }

    pub async fn export_analysis(&self, analysis: &ManifestAnalysis) -> Result<PathBuf> {
        self.write("file_analysis", analysis).await
    }

    pub async fn export_plan(&self, plan: &MigrationPlan) -> Result<PathBuf> {
        let export = PlanExport {
            exported_at: Utc::now(),
            totals: plan
                .totals()
                .into_iter()
                .map(|(kind, count)| (kind.as_str(), count))
                .collect(),
            plan,
        };
        self.write("migration_plan", &export).await
    }

    /// Writes `<prefix>_<timestamp>.json` and returns its path.
    async fn write<T: Serialize + ?Sized>(&self, prefix: &str, value: &T) -> Result<PathBuf> {
        let content = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        let file_name = format!(
            "{}_{}.json",
            prefix,
            Utc::now().format("%Y%m%d_%H%M%S%3f")
        );
        let path = self.output_dir.join(file_name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| KovaError::file(&path, e))?;

        info!("Exported {} to {}", prefix, path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::file_record::FileRecord;
    use crate::models::sync_result::{RepoSnapshot, SyncResult};
    use crate::organizer::{ManifestAnalyzer, MigrationPlanner};
    use tempfile::tempdir;

    #[test]
    fn test_exporter_creates_output_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("reports/2024");
        let exporter = ReportExporter::new(&nested, true).unwrap();
        assert!(exporter.output_dir().is_dir());
    }

    #[tokio::test]
    async fn test_export_sync_report() {
        let dir = tempdir().unwrap();
        let exporter = ReportExporter::new(dir.path(), false).unwrap();

        let mut report = SyncReport::new();
        report.insert(
            "o/a".to_string(),
            SyncResult::success("o/a", RepoSnapshot::default()),
        );
        report.insert("o/b".to_string(), SyncResult::not_found("o/b"));

        let path = exporter.export_sync_report(&report).await.unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("sync_report_"));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["total_repositories"], 2);
        assert_eq!(written["by_status"]["success"], 1);
        assert_eq!(written["by_status"]["not_found"], 1);
        assert_eq!(written["by_status"]["error"], 0);
        assert_eq!(written["results"]["o/b"]["status"], "not_found");
    }

    #[tokio::test]
    async fn test_export_analysis_and_plan() {
        let dir = tempdir().unwrap();
        let exporter = ReportExporter::new(dir.path(), true).unwrap();

        let analysis = ManifestAnalyzer::default().analyze(vec![
            FileRecord::new("1", "README.md", 10),
            FileRecord::new("2", "old notes.txt", 10),
        ]);
        let plan = MigrationPlanner::default().plan(&analysis);

        let analysis_path = exporter.export_analysis(&analysis).await.unwrap();
        let plan_path = exporter.export_plan(&plan).await.unwrap();

        let analysis_json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(analysis_path).unwrap()).unwrap();
        assert_eq!(analysis_json["files"].as_array().unwrap().len(), 2);
        assert_eq!(analysis_json["obsolete"][0]["id"], "2");

        let plan_json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(plan_path).unwrap()).unwrap();
        assert_eq!(plan_json["totals"]["move"], 1);
        assert_eq!(plan_json["totals"]["archive"], 1);
        assert_eq!(plan_json["folder_creation"].as_array().unwrap().len(), 38);
    }
}
