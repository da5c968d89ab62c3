use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::analytics::montecarlo::MonteCarloConfig;
use crate::analytics::regression::DEFAULT_FORECAST_HORIZON;
use crate::analytics::AnalyticsOptions;
use crate::data::financial::default_start_date;
use crate::error::{SimError, SimResult};
use crate::snapshot::SnapshotRequest;

pub const DEFAULT_TRANSACTIONS: usize = 100;
const MAX_TRANSACTIONS: usize = 1_000_000;

/// Every knob of one generation run; any field may be omitted from YAML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunProfile {
    pub label: String,
    pub seed: Option<u64>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Pins "now" for transaction timestamps; wall clock when absent.
    pub anchor: Option<NaiveDateTime>,
    pub transactions: usize,
    pub forecast_horizon: usize,
    pub monte_carlo: MonteCarloConfig,
}

impl Default for RunProfile {
    fn default() -> Self {
        Self {
            label: "local".to_string(),
            seed: None,
            start_date: default_start_date(),
            end_date: None,
            anchor: None,
            transactions: DEFAULT_TRANSACTIONS,
            forecast_horizon: DEFAULT_FORECAST_HORIZON,
            monte_carlo: MonteCarloConfig::default(),
        }
    }
}

impl RunProfile {
    pub fn validate(&self) -> SimResult<()> {
        validate_label(&self.label)?;
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(SimError::InvalidArgument(format!(
                    "invalid date range: end {end} precedes start {}",
                    self.start_date
                )));
            }
        }
        if self.transactions > MAX_TRANSACTIONS {
            return Err(SimError::InvalidArgument(format!(
                "transactions must be at most {MAX_TRANSACTIONS}, got {}",
                self.transactions
            )));
        }
        if !(1..=365).contains(&self.forecast_horizon) {
            return Err(SimError::InvalidArgument(format!(
                "forecast_horizon must be within 1..=365, got {}",
                self.forecast_horizon
            )));
        }
        self.monte_carlo.validate()
    }

    pub fn snapshot_request(&self, now: NaiveDateTime) -> SnapshotRequest {
        SnapshotRequest {
            start: self.start_date,
            end: self.end_date,
            transactions: self.transactions,
            now: self.anchor.unwrap_or(now),
        }
    }

    pub fn analytics_options(&self) -> AnalyticsOptions {
        AnalyticsOptions {
            forecast_horizon: self.forecast_horizon,
            monte_carlo: self.monte_carlo.clone(),
        }
    }
}

pub fn load_profile(path: impl AsRef<Path>) -> SimResult<RunProfile> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let profile = serde_yaml::from_slice::<RunProfile>(&bytes).map_err(|error| {
        SimError::InvalidArgument(format!("invalid profile '{}': {error}", path.display()))
    })?;
    profile.validate()?;
    Ok(profile)
}

/// Labels name output directories: `[A-Za-z0-9._-]`, not `.` or `..`.
pub fn validate_label(label: &str) -> SimResult<()> {
    if label.is_empty() {
        return Err(SimError::InvalidArgument(
            "label must not be empty".to_string(),
        ));
    }
    if matches!(label, "." | "..") {
        return Err(SimError::InvalidArgument(format!(
            "label '{label}' is not allowed"
        )));
    }
    if !label
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
    {
        return Err(SimError::InvalidArgument(
            "label contains invalid characters; allowed: [A-Za-z0-9._-]".to_string(),
        ));
    }
    Ok(())
}
