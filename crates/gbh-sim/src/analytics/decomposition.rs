//! Weekly decomposition, stationarity and autocorrelation of daily revenue.

use serde::{Deserialize, Serialize};

use super::regression::fit_ols;
use crate::data::records::DailyFinancialRecord;
use crate::error::{require_rows, SimError, SimResult};
use crate::stats::{mean, sample_variance};

pub const MIN_SERIES_ROWS: usize = 30;
pub const WEEKLY_PERIOD: usize = 7;
pub const ACF_LAGS: usize = 20;

/// MacKinnon asymptotic critical values, constant-only regression.
const ADF_CRITICAL_1: f64 = -3.43;
const ADF_CRITICAL_5: f64 = -2.86;
const ADF_CRITICAL_10: f64 = -2.57;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub period: usize,
    /// Centred moving average; `None` for the half-window at each edge.
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

impl Decomposition {
    /// `max(0, 1 - var(residual) / var(seasonal))`.
    pub fn seasonal_strength(&self) -> f64 {
        let residual = self.residual.iter().flatten().copied().collect::<Vec<_>>();
        match (sample_variance(&residual), sample_variance(&self.seasonal)) {
            (Some(r), Some(s)) if s > 0.0 => (1.0 - r / s).max(0.0),
            _ => 0.0,
        }
    }
}

pub fn decompose_additive(values: &[f64], period: usize) -> SimResult<Decomposition> {
    if period < 2 {
        return Err(SimError::InvalidArgument(format!(
            "decomposition period must be at least 2, got {period}"
        )));
    }
    require_rows("seasonal decomposition", 2 * period, values.len())?;

    let n = values.len();
    let half = period / 2;
    // Even periods use a 2 x m moving average with half weights at both ends.
    let weights = if period % 2 == 0 {
        let mut w = vec![1.0 / period as f64; period + 1];
        w[0] /= 2.0;
        w[period] /= 2.0;
        w
    } else {
        vec![1.0 / period as f64; period]
    };

    let trend = (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            Some(
                weights
                    .iter()
                    .enumerate()
                    .map(|(j, w)| w * values[i - half + j])
                    .sum::<f64>(),
            )
        })
        .collect::<Vec<Option<f64>>>();

    let mut phase_means = (0..period)
        .map(|phase| {
            let detrended = (phase..n)
                .step_by(period)
                .filter_map(|i| trend[i].map(|t| values[i] - t))
                .collect::<Vec<_>>();
            mean(&detrended).unwrap_or(0.0)
        })
        .collect::<Vec<_>>();
    let offset = mean(&phase_means).unwrap_or(0.0);
    for m in &mut phase_means {
        *m -= offset;
    }

    let seasonal = (0..n).map(|i| phase_means[i % period]).collect::<Vec<_>>();
    let residual = (0..n)
        .map(|i| trend[i].map(|t| values[i] - t - seasonal[i]))
        .collect();

    Ok(Decomposition {
        period,
        trend,
        seasonal,
        residual,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdfTest {
    pub statistic: f64,
    pub lags: usize,
    pub observations: usize,
    pub critical_1pct: f64,
    pub critical_5pct: f64,
    pub critical_10pct: f64,
    /// Unit root rejected at 5 %.
    pub is_stationary: bool,
}

/// Augmented Dickey-Fuller test with constant. The lag order is chosen by AIC
/// up to the Schwert bound `12 * (n / 100)^(1/4)`.
pub fn adf_test(values: &[f64]) -> SimResult<AdfTest> {
    require_rows("ADF test", MIN_SERIES_ROWS, values.len())?;
    let n = values.len();
    let max_lag = ((12.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize).min(n / 2 - 2);
    let diff = |t: usize| values[t] - values[t - 1];

    let build = |lags: usize, first: usize| {
        let rows = (first..n)
            .map(|t| {
                let mut row = Vec::with_capacity(lags + 2);
                row.push(1.0);
                row.push(values[t - 1]);
                row.extend((1..=lags).map(|j| diff(t - j)));
                row
            })
            .collect::<Vec<_>>();
        let targets = (first..n).map(diff).collect::<Vec<_>>();
        (rows, targets)
    };

    // Lag selection on a common sample so AIC values are comparable.
    let common_start = max_lag + 1;
    let mut best = (0usize, f64::INFINITY);
    for lags in 0..=max_lag {
        let (rows, targets) = build(lags, common_start);
        if let Some(fit) = fit_ols(&rows, &targets) {
            let obs = fit.observations as f64;
            if fit.residual_sum_of_squares <= 0.0 {
                continue;
            }
            let aic = obs * (fit.residual_sum_of_squares / obs).ln() + 2.0 * (lags + 2) as f64;
            if aic < best.1 {
                best = (lags, aic);
            }
        }
    }

    let lags = best.0;
    let (rows, targets) = build(lags, lags + 1);
    let fit = fit_ols(&rows, &targets)
        .ok_or_else(|| SimError::InvalidArgument("ADF regression is singular".to_string()))?;
    let se = fit.std_errors[1];
    let statistic = if se > 0.0 {
        fit.coefficients[1] / se
    } else {
        0.0
    };

    Ok(AdfTest {
        statistic,
        lags,
        observations: fit.observations,
        critical_1pct: ADF_CRITICAL_1,
        critical_5pct: ADF_CRITICAL_5,
        critical_10pct: ADF_CRITICAL_10,
        is_stationary: statistic < ADF_CRITICAL_5,
    })
}

/// Sample autocorrelation for lags `0..=max_lag` (lag 0 is always 1).
pub fn autocorrelation(values: &[f64], max_lag: usize) -> Vec<f64> {
    let Some(m) = mean(values) else {
        return Vec::new();
    };
    let denom: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    if denom == 0.0 {
        return Vec::new();
    }
    (0..=max_lag.min(values.len().saturating_sub(1)))
        .map(|k| {
            let num: f64 = (k..values.len())
                .map(|t| (values[t] - m) * (values[t - k] - m))
                .sum();
            num / denom
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesAnalysis {
    pub decomposition: Decomposition,
    pub seasonal_strength: f64,
    pub adf: AdfTest,
    pub autocorrelation: Vec<f64>,
}

pub fn analyze_daily_revenue(financial: &[DailyFinancialRecord]) -> SimResult<TimeSeriesAnalysis> {
    require_rows("time-series analysis", MIN_SERIES_ROWS, financial.len())?;
    let values = financial.iter().map(|r| r.daily_revenue).collect::<Vec<_>>();
    let decomposition = decompose_additive(&values, WEEKLY_PERIOD)?;
    Ok(TimeSeriesAnalysis {
        seasonal_strength: decomposition.seasonal_strength(),
        decomposition,
        adf: adf_test(&values)?,
        autocorrelation: autocorrelation(&values, ACF_LAGS),
    })
}
