use std::collections::BTreeMap;

use chrono::Datelike;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::data::records::{DailyFinancialRecord, TerritoryPerformance};
use crate::registry::TerritoryCategory;
use crate::stats::{mean, pearson, sample_variance};

const TRADING_DAYS: f64 = 252.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub category: TerritoryCategory,
    pub mean_revenue: f64,
    pub mean_growth_pct: f64,
    pub mean_profitability_pct: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major; `None` where a column has zero variance.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedMetrics {
    /// Compound daily growth of cumulative revenue, in percent.
    pub daily_growth_rate_pct: Option<f64>,
    /// Coefficient of variation of daily revenue, in percent.
    pub revenue_volatility_pct: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    /// Spread of monthly mean daily revenue relative to their mean, in percent.
    pub seasonality_strength_pct: Option<f64>,
    /// Herfindahl-Hirschman index of territory revenue (0..=10 000).
    pub hhi_index: Option<f64>,
    pub category_performance: Vec<CategoryPerformance>,
    pub correlation: Option<CorrelationMatrix>,
}

pub fn advanced_metrics(
    financial: &[DailyFinancialRecord],
    territories: &[TerritoryPerformance],
) -> AdvancedMetrics {
    let mut metrics = AdvancedMetrics::default();

    if financial.len() > 1 {
        let daily = financial.iter().map(|r| r.daily_revenue).collect::<Vec<_>>();
        metrics.daily_growth_rate_pct = daily_growth_rate_pct(financial);
        metrics.revenue_volatility_pct = coefficient_of_variation_pct(&daily);
        metrics.sharpe_ratio = Some(sharpe_ratio(&daily));
        metrics.seasonality_strength_pct = seasonality_strength_pct(financial);
    }

    if !territories.is_empty() {
        metrics.hhi_index = hhi_index(territories);
        metrics.category_performance = category_performance(territories);
        metrics.correlation = Some(correlation_matrix(territories));
    }

    metrics
}

pub fn daily_growth_rate_pct(financial: &[DailyFinancialRecord]) -> Option<f64> {
    let first = financial.first()?.cumulative_revenue;
    let last = financial.last()?.cumulative_revenue;
    if first <= 0.0 {
        return None;
    }
    let n = financial.len() as f64;
    Some(((last / first).powf(1.0 / n) - 1.0) * 100.0)
}

pub fn coefficient_of_variation_pct(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let std = sample_variance(values)?.sqrt();
    (m != 0.0).then(|| std / m * 100.0)
}

/// Annualised mean/std of day-over-day returns; zero when returns are flat.
pub fn sharpe_ratio(values: &[f64]) -> f64 {
    let returns = values
        .iter()
        .tuple_windows()
        .filter(|(prev, _)| **prev != 0.0)
        .map(|(prev, next)| next / prev - 1.0)
        .collect::<Vec<_>>();
    let (Some(m), Some(var)) = (mean(&returns), sample_variance(&returns)) else {
        return 0.0;
    };
    let std = var.sqrt();
    if std > 0.0 {
        m / std * TRADING_DAYS.sqrt()
    } else {
        0.0
    }
}

pub fn seasonality_strength_pct(financial: &[DailyFinancialRecord]) -> Option<f64> {
    let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for record in financial {
        by_month
            .entry(record.date.month())
            .or_default()
            .push(record.daily_revenue);
    }
    let monthly = by_month
        .values()
        .filter_map(|values| mean(values))
        .collect::<Vec<_>>();
    let overall = mean(&monthly)?;
    let (min, max) = monthly.iter().copied().minmax().into_option()?;
    (overall != 0.0).then(|| (max - min) / overall * 100.0)
}

pub fn hhi_index(territories: &[TerritoryPerformance]) -> Option<f64> {
    let total: f64 = territories.iter().map(|t| t.revenue).sum();
    if total <= 0.0 {
        return None;
    }
    let concentration: f64 = territories
        .iter()
        .map(|t| (t.revenue / total).powi(2))
        .sum();
    Some(concentration * 10_000.0)
}

pub fn category_performance(territories: &[TerritoryPerformance]) -> Vec<CategoryPerformance> {
    TerritoryCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let rows = territories
                .iter()
                .filter(|t| t.category == category)
                .collect::<Vec<_>>();
            let field_mean = |f: fn(&TerritoryPerformance) -> f64| {
                mean(&rows.iter().map(|r| f(r)).collect::<Vec<_>>())
            };
            Some(CategoryPerformance {
                category,
                mean_revenue: field_mean(|r| r.revenue)?,
                mean_growth_pct: field_mean(|r| r.growth_pct)?,
                mean_profitability_pct: field_mean(|r| r.profitability_pct)?,
            })
        })
        .collect()
}

type Column = (&'static str, fn(&TerritoryPerformance) -> f64);

const NUMERIC_COLUMNS: [Column; 8] = [
    ("revenue", |t: &TerritoryPerformance| t.revenue),
    ("growth_pct", |t: &TerritoryPerformance| t.growth_pct),
    ("store_count", |t: &TerritoryPerformance| f64::from(t.store_count)),
    ("satisfaction", |t: &TerritoryPerformance| t.satisfaction),
    ("market_share_pct", |t: &TerritoryPerformance| t.market_share_pct),
    ("profitability_pct", |t: &TerritoryPerformance| t.profitability_pct),
    ("new_customers_per_month", |t: &TerritoryPerformance| f64::from(t.new_customers_per_month)),
    ("basket_size", |t: &TerritoryPerformance| t.basket_size),
];

pub fn correlation_matrix(territories: &[TerritoryPerformance]) -> CorrelationMatrix {
    let series = NUMERIC_COLUMNS
        .iter()
        .map(|(_, f)| territories.iter().map(f).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let values = series
        .iter()
        .map(|a| series.iter().map(|b| pearson(a, b)).collect())
        .collect();
    CorrelationMatrix {
        columns: NUMERIC_COLUMNS
            .iter()
            .map(|(name, _)| name.to_string())
            .collect(),
        values,
    }
}
