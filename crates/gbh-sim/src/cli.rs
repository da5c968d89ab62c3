use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::analytics::montecarlo::Scenario;
use crate::error::SimResult;
use crate::profile::{load_profile, validate_label, RunProfile};
use crate::registry::TerritoryCategory;

#[derive(Debug, Parser)]
#[command(name = "gbh-sim", about = "synthetic retail dataset generator")]
pub struct Args {
    /// Fixed seed; omit for a fresh draw on every run.
    #[arg(long, env = "GBH_SIM_SEED")]
    pub seed: Option<u64>,
    #[arg(long, env = "GBH_SIM_PROFILE")]
    pub profile: Option<PathBuf>,
    #[arg(long, env = "GBH_SIM_RESULTS", default_value = "results")]
    pub results_dir: PathBuf,
    #[arg(long, env = "GBH_SIM_LABEL")]
    pub label: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Territory and store catalog.
    Registry,
    Financial {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    Territories {
        /// DROM, COM or Métropole.
        #[arg(long)]
        category: Option<String>,
    },
    Stores,
    Kpi,
    Transactions {
        #[arg(long)]
        count: Option<usize>,
    },
    /// Analytics report over one snapshot.
    Analyze {
        /// Monte Carlo scenario: optimistic, realistic or prudent.
        #[arg(long)]
        scenario: Option<String>,
    },
    /// Write the full snapshot report under the results directory.
    Snapshot {
        #[arg(long)]
        scenario: Option<String>,
    },
}

impl Args {
    /// Profile file (or defaults) with command-line overrides applied.
    pub fn resolve_profile(&self) -> SimResult<RunProfile> {
        let mut profile = match &self.profile {
            Some(path) => load_profile(path)?,
            None => RunProfile::default(),
        };
        if let Some(seed) = self.seed {
            profile.seed = Some(seed);
        }
        if let Some(label) = &self.label {
            validate_label(label)?;
            profile.label = label.clone();
        }
        match &self.command {
            Command::Financial { start, end } => {
                if let Some(start) = start {
                    profile.start_date = *start;
                }
                if end.is_some() {
                    profile.end_date = *end;
                }
            }
            Command::Transactions { count } => {
                if let Some(count) = count {
                    profile.transactions = *count;
                }
            }
            Command::Analyze {
                scenario: Some(scenario),
            }
            | Command::Snapshot {
                scenario: Some(scenario),
            } => {
                profile.monte_carlo.scenario = Scenario::parse(scenario)?;
            }
            _ => {}
        }
        profile.validate()?;
        Ok(profile)
    }

    /// Category filter of the `territories` command, if any.
    pub fn category_filter(&self) -> SimResult<Option<TerritoryCategory>> {
        match &self.command {
            Command::Territories {
                category: Some(category),
            } => TerritoryCategory::parse(category).map(Some),
            _ => Ok(None),
        }
    }
}
