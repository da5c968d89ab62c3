use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::registry::TerritoryCategory;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyFinancialRecord {
    pub date: NaiveDate,
    pub cumulative_revenue: f64,
    pub daily_revenue: f64,
    pub cumulative_expenses: f64,
    pub cumulative_net_profit: f64,
    pub investment: f64,
    pub employees: u32,
    pub satisfaction: f64,
    pub basket_size: f64,
    pub new_customers: u32,
    pub store_count: u32,
    pub productivity_pct: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerritoryPerformance {
    pub territory: String,
    pub category: TerritoryCategory,
    pub revenue: f64,
    pub growth_pct: f64,
    pub store_count: u32,
    pub satisfaction: f64,
    pub market_share_pct: f64,
    pub profitability_pct: f64,
    pub new_customers_per_month: u32,
    pub basket_size: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreStatistics {
    pub category: TerritoryCategory,
    pub territory_count: u32,
    pub store_count: u32,
    pub total_revenue: f64,
    pub revenue_per_store: f64,
    pub stores_per_territory: f64,
    pub relative_performance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_territories: u32,
    pub total_stores: u32,
    pub revenue_overseas_departments: f64,
    pub revenue_overseas_collectivities: f64,
    pub revenue_mainland: f64,
    pub average_satisfaction: f64,
    pub average_growth_pct: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Purchase,
    Service,
    Fee,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 4] = [
        TransactionKind::Sale,
        TransactionKind::Purchase,
        TransactionKind::Service,
        TransactionKind::Fee,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sale => "Sale",
            Self::Purchase => "Purchase",
            Self::Service => "Service",
            Self::Fee => "Fee",
        }
    }

    pub const fn subcategories(self) -> &'static [&'static str] {
        match self {
            Self::Sale => &crate::registry::DEPARTMENTS,
            Self::Purchase => &["Food stock", "DIY stock", "Textile stock", "Equipment"],
            Self::Service => &["Delivery", "Installation", "Maintenance", "After-sales"],
            Self::Fee => &["Rent", "Energy", "Staff", "Marketing"],
        }
    }

    /// Purchases and fees leave the business; sales and services bring money in.
    pub const fn is_outflow(self) -> bool {
        matches!(self, Self::Purchase | Self::Fee)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp: NaiveDateTime,
    pub kind: TransactionKind,
    pub subcategory: String,
    pub store: String,
    pub amount: f64,
    pub territory: String,
    pub territory_category: TerritoryCategory,
    pub id: String,
}
