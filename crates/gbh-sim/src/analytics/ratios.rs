use serde::{Deserialize, Serialize};

use crate::data::records::DailyFinancialRecord;
use crate::error::{require_rows, SimResult};

/// Balance-sheet placeholders; the generator has no balance sheet.
const CURRENT_RATIO: f64 = 1.8;
const QUICK_RATIO: f64 = 1.2;
const ASSETS_TO_REVENUE: f64 = 1.5;
const DEBT_TO_ASSETS: f64 = 0.4;
const OPERATING_TO_NET: f64 = 0.85;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialRatios {
    pub net_margin_pct: Option<f64>,
    pub operating_margin_pct: Option<f64>,
    pub revenue_per_employee: Option<f64>,
    pub current_ratio: f64,
    pub quick_ratio: f64,
    pub debt_to_equity: f64,
    pub debt_to_assets: f64,
    /// Cumulative profit over total investment, `None` without investment.
    pub roi_pct: Option<f64>,
}

/// Ratios for the latest day, using the day-over-day deltas of the
/// cumulative columns.
pub fn financial_ratios(financial: &[DailyFinancialRecord]) -> SimResult<FinancialRatios> {
    require_rows("financial ratios", 2, financial.len())?;
    let latest = &financial[financial.len() - 1];
    let previous = &financial[financial.len() - 2];

    let revenue_delta = latest.cumulative_revenue - previous.cumulative_revenue;
    let profit_delta = latest.cumulative_net_profit - previous.cumulative_net_profit;
    let net_margin_pct = (revenue_delta > 0.0).then(|| profit_delta / revenue_delta * 100.0);

    let total_assets = latest.cumulative_revenue * ASSETS_TO_REVENUE;
    let total_debt = total_assets * DEBT_TO_ASSETS;
    let total_investment: f64 = financial.iter().map(|r| r.investment).sum();

    Ok(FinancialRatios {
        net_margin_pct,
        operating_margin_pct: net_margin_pct.map(|m| m * OPERATING_TO_NET),
        revenue_per_employee: (latest.employees > 0)
            .then(|| revenue_delta / f64::from(latest.employees)),
        current_ratio: CURRENT_RATIO,
        quick_ratio: QUICK_RATIO,
        debt_to_equity: if total_assets > total_debt {
            total_debt / (total_assets - total_debt)
        } else {
            0.0
        },
        debt_to_assets: if total_assets > 0.0 {
            total_debt / total_assets
        } else {
            0.0
        },
        roi_pct: (total_investment > 0.0)
            .then(|| latest.cumulative_net_profit / total_investment * 100.0),
    })
}
