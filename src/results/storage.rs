//! Run report persistence
//!
//! Serializes a finished run to JSON or YAML, chosen by file extension.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

use super::report::{Report, SuiteSummary, Summary};
use crate::models::ResultRecord;
use crate::utils::timer::PhaseDurations;

/// Serializable snapshot of a finished run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// Run ID derived from the start time
    pub id: String,

    /// Timestamp when the run started
    pub started_at: DateTime<Utc>,

    /// Timestamp when the summary was computed
    pub finished_at: DateTime<Utc>,

    /// Totals over all records
    pub summary: Summary,

    /// Time spent in the unit and HTTP phases
    pub phases: PhaseDurations,

    /// Per-suite totals
    pub suites: Vec<SuiteSummary>,

    /// Every record in execution order
    pub records: Vec<ResultRecord>,
}

impl RunReport {
    pub fn new(
        report: &Report,
        phases: PhaseDurations,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: started_at.format("%Y%m%d_%H%M%S").to_string(),
            started_at,
            finished_at,
            summary: report.summarize(),
            phases,
            suites: report.by_suite(),
            records: report.records().to_vec(),
        }
    }

    /// Rebuild the append-only log from the stored records
    pub fn to_report(&self) -> Report {
        let mut report = Report::new();
        for record in &self.records {
            report.append(record.clone());
        }
        report
    }

    /// Write the report, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        let writer = BufWriter::new(file);

        if is_yaml_file(path) {
            serde_yaml::to_writer(writer, self).context("Failed to write YAML report")?;
        } else {
            serde_json::to_writer_pretty(writer, self).context("Failed to write JSON report")?;
        }

        info!("Saved run report to {}", path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open report file: {}", path.display()))?;
        let reader = BufReader::new(file);

        let run = if is_yaml_file(path) {
            serde_yaml::from_reader(reader).context("Failed to parse YAML report")?
        } else {
            serde_json::from_reader(reader).context("Failed to parse JSON report")?
        };

        Ok(run)
    }
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseError, Outcome, TestType};
    use tempfile::tempdir;

    fn sample_report() -> Report {
        let mut report = Report::new();
        report.append(ResultRecord::new(
            TestType::Unit,
            "lib",
            "returns 1",
            Outcome::Passed,
            1,
        ));
        report.append(ResultRecord::new(
            TestType::Http,
            "web_app",
            "GET /",
            Outcome::failed(CaseError::Raised("expected 200, got 404".to_string())),
            4,
        ));
        report
    }

    #[test]
    fn test_run_report_snapshot() {
        let started = Utc::now();
        let run = RunReport::new(&sample_report(), PhaseDurations::default(), started, started);

        assert_eq!(run.records.len(), 2);
        assert_eq!(run.summary.total_failed, 1);
        assert_eq!(run.suites.len(), 2);
        assert_eq!(run.to_report().summarize(), run.summary);
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        let started = Utc::now();
        let run = RunReport::new(&sample_report(), PhaseDurations::default(), started, started);

        run.save(&path).unwrap();
        let loaded = RunReport::load(&path).unwrap();

        assert_eq!(loaded.id, run.id);
        assert_eq!(loaded.summary, run.summary);
        assert_eq!(loaded.records[1].outcome, run.records[1].outcome);
    }

    #[test]
    fn test_save_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.yaml");
        let started = Utc::now();
        RunReport::new(&sample_report(), PhaseDurations::default(), started, started)
            .save(&path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("suite_name: web_app"));

        let loaded = RunReport::load(&path).unwrap();
        assert_eq!(loaded.summary.total_passed, 1);
    }
}
