//! Generate once, derive many.
//!
//! Every generator call redraws its randomness, so views that must agree
//! (charts, headline KPIs, per-category statistics) are all reduced from the
//! same snapshot instead of regenerating territory data on their own.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::data::financial::generate_financial_series;
use crate::data::records::{
    DailyFinancialRecord, KpiSummary, StoreStatistics, TerritoryPerformance, Transaction,
};
use crate::data::territory::{draw, generate_territory_performance};
use crate::data::transactions::generate_transactions;
use crate::error::SimResult;
use crate::registry::{TerritoryCategory, TERRITORIES};

const RELATIVE_PERFORMANCE_SPAN: (f64, f64) = (0.8, 1.2);

/// Territory table plus the per-category scalars drawn alongside it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerritorySnapshot {
    pub territories: Vec<TerritoryPerformance>,
    pub relative_performance: BTreeMap<TerritoryCategory, f64>,
}

impl TerritorySnapshot {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let territories = generate_territory_performance(rng);
        let relative_performance = TerritoryCategory::ALL
            .into_iter()
            .map(|category| (category, draw(rng, RELATIVE_PERFORMANCE_SPAN)))
            .collect();
        Self {
            territories,
            relative_performance,
        }
    }

    pub fn in_category(
        &self,
        category: TerritoryCategory,
    ) -> impl Iterator<Item = &TerritoryPerformance> {
        self.territories
            .iter()
            .filter(move |row| row.category == category)
    }

    pub fn category_revenue(&self, category: TerritoryCategory) -> f64 {
        self.in_category(category).map(|row| row.revenue).sum()
    }

    /// One row per category, reduced from this snapshot only.
    pub fn store_statistics(&self) -> Vec<StoreStatistics> {
        TerritoryCategory::ALL
            .into_iter()
            .map(|category| {
                let territory_count = category.territories().count() as u32;
                let store_count: u32 = self.in_category(category).map(|row| row.store_count).sum();
                let total_revenue = self.category_revenue(category);
                StoreStatistics {
                    category,
                    territory_count,
                    store_count,
                    total_revenue,
                    revenue_per_store: ratio(total_revenue, f64::from(store_count)),
                    stores_per_territory: ratio(
                        f64::from(store_count),
                        f64::from(territory_count),
                    ),
                    relative_performance: self
                        .relative_performance
                        .get(&category)
                        .copied()
                        .unwrap_or(1.0),
                }
            })
            .collect()
    }

    pub fn kpi_summary(&self) -> KpiSummary {
        let rows = self.territories.len() as f64;
        let mean = |total: f64| if rows > 0.0 { total / rows } else { 0.0 };
        KpiSummary {
            total_territories: TERRITORIES.len() as u32,
            total_stores: self.territories.iter().map(|row| row.store_count).sum(),
            revenue_overseas_departments: self
                .category_revenue(TerritoryCategory::OverseasDepartment),
            revenue_overseas_collectivities: self
                .category_revenue(TerritoryCategory::OverseasCollectivity),
            revenue_mainland: self.category_revenue(TerritoryCategory::MainlandRegion),
            average_satisfaction: mean(self.territories.iter().map(|r| r.satisfaction).sum()),
            average_growth_pct: mean(self.territories.iter().map(|r| r.growth_pct).sum()),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotRequest {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub transactions: usize,
    /// Anchor for transaction timestamps, and the series end when `end` is unset.
    pub now: NaiveDateTime,
}

/// Every table of one generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub generated_at: NaiveDateTime,
    pub financial: Vec<DailyFinancialRecord>,
    pub territory: TerritorySnapshot,
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, request: &SnapshotRequest) -> SimResult<Self> {
        // An open-ended series stops at the anchor, not the wall clock.
        let end = request.end.unwrap_or_else(|| request.now.date());
        let financial = generate_financial_series(rng, request.start, Some(end))?;
        let territory = TerritorySnapshot::generate(rng);
        let transactions = generate_transactions(rng, request.transactions, request.now)?;
        debug!(
            days = financial.len(),
            territories = territory.territories.len(),
            transactions = transactions.len(),
            "generated snapshot"
        );
        Ok(Self {
            generated_at: request.now,
            financial,
            territory,
            transactions,
        })
    }

    pub fn store_statistics(&self) -> Vec<StoreStatistics> {
        self.territory.store_statistics()
    }

    pub fn kpi_summary(&self) -> KpiSummary {
        self.territory.kpi_summary()
    }

    pub fn transactions_in(&self, category: TerritoryCategory) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.territory_category == category)
            .collect()
    }

    /// SHA-256 of the canonical JSON encoding.
    pub fn fingerprint(&self) -> SimResult<String> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(bytes);
        Ok(format!("{digest:x}"))
    }
}
