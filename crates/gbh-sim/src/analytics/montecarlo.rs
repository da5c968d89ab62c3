use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::random::normal;
use crate::stats::{percentile, summarize};

pub const DEFAULT_SIMULATION_SEED: u64 = 42;
const TRADING_DAYS: f64 = 252.0;
/// Fall-backs when the series is too short to estimate growth or volatility.
const FALLBACK_DAILY_GROWTH_PCT: f64 = 0.1;
const FALLBACK_VOLATILITY_PCT: f64 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Optimistic,
    #[default]
    Realistic,
    Prudent,
}

impl Scenario {
    pub fn parse(value: &str) -> SimResult<Self> {
        match value {
            "optimistic" => Ok(Self::Optimistic),
            "realistic" => Ok(Self::Realistic),
            "prudent" => Ok(Self::Prudent),
            other => Err(SimError::InvalidArgument(format!(
                "unknown scenario '{other}' (expected one of: optimistic, realistic, prudent)"
            ))),
        }
    }

    pub const fn growth_multiplier(self) -> f64 {
        match self {
            Self::Optimistic => 1.2,
            Self::Realistic => 1.0,
            Self::Prudent => 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub simulations: usize,
    pub horizon: usize,
    /// Two-sided confidence level in percent.
    pub confidence: f64,
    pub scenario: Scenario,
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            simulations: 1_000,
            horizon: 30,
            confidence: 95.0,
            scenario: Scenario::Realistic,
            seed: DEFAULT_SIMULATION_SEED,
        }
    }
}

impl MonteCarloConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.simulations == 0 {
            return Err(SimError::InvalidArgument(
                "monte carlo simulations must be positive".to_string(),
            ));
        }
        if !(7..=90).contains(&self.horizon) {
            return Err(SimError::InvalidArgument(format!(
                "monte carlo horizon must be within 7..=90 days, got {}",
                self.horizon
            )));
        }
        if !(80.0..=99.0).contains(&self.confidence) {
            return Err(SimError::InvalidArgument(format!(
                "monte carlo confidence must be within 80..=99, got {}",
                self.confidence
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloProjection {
    pub start_value: f64,
    pub scenario: Scenario,
    pub daily_growth_mean: f64,
    pub daily_growth_std: f64,
    pub mean: f64,
    pub median: f64,
    pub lower: f64,
    pub upper: f64,
    pub lower_percentile: f64,
    pub upper_percentile: f64,
    pub final_values: Vec<f64>,
}

/// Compounds `start_value` over `horizon` days of normal daily returns for
/// each simulated path.
pub fn project_revenue(
    config: &MonteCarloConfig,
    start_value: f64,
    daily_growth_pct: Option<f64>,
    volatility_pct: Option<f64>,
) -> SimResult<MonteCarloProjection> {
    config.validate()?;

    let daily_growth_mean = daily_growth_pct.unwrap_or(FALLBACK_DAILY_GROWTH_PCT) / 100.0
        * config.scenario.growth_multiplier();
    let daily_growth_std =
        volatility_pct.unwrap_or(FALLBACK_VOLATILITY_PCT) / 100.0 / TRADING_DAYS.sqrt();

    let daily_return = normal(daily_growth_mean, daily_growth_std)?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let final_values = (0..config.simulations)
        .map(|_| {
            (0..config.horizon).fold(start_value, |value, _| {
                value * (1.0 + daily_return.sample(&mut rng))
            })
        })
        .collect::<Vec<_>>();

    let tail = (100.0 - config.confidence) / 2.0;
    let lower_percentile = tail;
    let upper_percentile = 100.0 - tail;
    let summary = summarize(&final_values)
        .ok_or_else(|| SimError::InvalidArgument("no simulated paths".to_string()))?;
    let lower = percentile(&final_values, lower_percentile).unwrap_or(summary.min);
    let upper = percentile(&final_values, upper_percentile).unwrap_or(summary.max);

    debug!(
        simulations = config.simulations,
        horizon = config.horizon,
        mean = summary.mean,
        "monte carlo projection"
    );

    Ok(MonteCarloProjection {
        start_value,
        scenario: config.scenario,
        daily_growth_mean,
        daily_growth_std,
        mean: summary.mean,
        median: summary.median,
        lower,
        upper,
        lower_percentile,
        upper_percentile,
        final_values,
    })
}
