use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsReport;
use crate::data::records::{KpiSummary, StoreStatistics};
use crate::error::SimResult;
use crate::profile::validate_label;
use crate::snapshot::Snapshot;

pub const SCHEMA_VERSION: u32 = 1;
pub const REPORT_FILE: &str = "snapshot.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunContext {
    pub schema_version: u32,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub fingerprint: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotReport {
    pub schema_version: u32,
    pub context: RunContext,
    pub store_statistics: Vec<StoreStatistics>,
    pub kpi_summary: KpiSummary,
    pub analytics: AnalyticsReport,
    pub snapshot: Snapshot,
}

impl SnapshotReport {
    /// Derived views all come from `snapshot`, never from a fresh draw.
    pub fn new(context: RunContext, snapshot: Snapshot, analytics: AnalyticsReport) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            store_statistics: snapshot.store_statistics(),
            kpi_summary: snapshot.kpi_summary(),
            context,
            analytics,
            snapshot,
        }
    }
}

/// Writes `<results_dir>/<label>/snapshot.json` and returns its path.
pub fn write_report(results_dir: &Path, report: &SnapshotReport) -> SimResult<PathBuf> {
    validate_label(&report.context.label)?;
    let out_dir = results_dir.join(&report.context.label);
    fs::create_dir_all(&out_dir)?;
    let out_file = out_dir.join(REPORT_FILE);
    fs::write(&out_file, serde_json::to_vec_pretty(report)?)?;
    Ok(out_file)
}

pub fn load_report(path: impl AsRef<Path>) -> SimResult<SnapshotReport> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn host_name() -> String {
    if let Ok(output) = Command::new("uname").arg("-n").output() {
        let v = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !v.is_empty() {
            return v;
        }
    }
    "unknown-host".to_string()
}
