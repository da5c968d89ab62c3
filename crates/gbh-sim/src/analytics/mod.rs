//! Analyses layered on top of a generated snapshot. Nothing here draws new
//! data; randomised routines take their own seed.

pub mod clustering;
pub mod decomposition;
pub mod metrics;
pub mod montecarlo;
pub mod ratios;
pub mod regression;

use serde::{Deserialize, Serialize};
use tracing::debug;

use self::clustering::{cluster_territories, TerritoryClusters};
use self::decomposition::{analyze_daily_revenue, TimeSeriesAnalysis};
use self::metrics::{advanced_metrics, AdvancedMetrics};
use self::montecarlo::{project_revenue, MonteCarloConfig, MonteCarloProjection};
use self::ratios::{financial_ratios, FinancialRatios};
use self::regression::{revenue_trend, TrendRegression, DEFAULT_FORECAST_HORIZON};
use crate::error::{SimError, SimResult};
use crate::snapshot::Snapshot;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsOptions {
    pub forecast_horizon: usize,
    pub monte_carlo: MonteCarloConfig,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            forecast_horizon: DEFAULT_FORECAST_HORIZON,
            monte_carlo: MonteCarloConfig::default(),
        }
    }
}

/// Sections that need more rows than the snapshot holds are left empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub metrics: AdvancedMetrics,
    pub trend: Option<TrendRegression>,
    pub clusters: Option<TerritoryClusters>,
    pub time_series: Option<TimeSeriesAnalysis>,
    pub ratios: Option<FinancialRatios>,
    pub projection: Option<MonteCarloProjection>,
}

fn skip_if_short<T>(result: SimResult<T>) -> SimResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(SimError::InsufficientData {
            analysis,
            required,
            actual,
        }) => {
            debug!(analysis, required, actual, "skipping analysis");
            Ok(None)
        }
        Err(other) => Err(other),
    }
}

pub fn analyze(snapshot: &Snapshot, options: &AnalyticsOptions) -> SimResult<AnalyticsReport> {
    let financial = &snapshot.financial;
    let territories = &snapshot.territory.territories;

    let metrics = advanced_metrics(financial, territories);
    let projection = match financial.last() {
        Some(last) => Some(project_revenue(
            &options.monte_carlo,
            last.cumulative_revenue,
            metrics.daily_growth_rate_pct,
            metrics.revenue_volatility_pct,
        )?),
        None => None,
    };

    Ok(AnalyticsReport {
        trend: skip_if_short(revenue_trend(financial, options.forecast_horizon))?,
        clusters: skip_if_short(cluster_territories(territories))?,
        time_series: skip_if_short(analyze_daily_revenue(financial))?,
        ratios: skip_if_short(financial_ratios(financial))?,
        metrics,
        projection,
    })
}
