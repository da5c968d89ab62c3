use rand::Rng;
use tracing::debug;

use super::records::TerritoryPerformance;
use crate::registry::{TerritoryCategory, TERRITORIES};

/// Closed interval `(low, high)` sampled uniformly.
pub type Span = (f64, f64);

/// Per-category value ranges. Fixed policy, not derived from any input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryProfile {
    pub revenue: Span,
    pub growth_pct: Span,
    pub satisfaction: Span,
    pub market_share_pct: Span,
    pub profitability_pct: Span,
    pub new_customers_per_month: (u32, u32),
    pub basket_size: Span,
    /// Logistics surcharge applied to sale amounts.
    pub sale_multiplier: Span,
    /// Logistics surcharge applied to purchase amounts.
    pub purchase_multiplier: Span,
}

const OVERSEAS_DEPARTMENT: CategoryProfile = CategoryProfile {
    revenue: (1_800_000.0, 4_500_000.0),
    growth_pct: (4.0, 20.0),
    satisfaction: (4.2, 4.8),
    market_share_pct: (28.0, 48.0),
    profitability_pct: (10.0, 18.0),
    new_customers_per_month: (800, 2_000),
    basket_size: (55.0, 85.0),
    sale_multiplier: (1.15, 1.35),
    purchase_multiplier: (1.2, 1.45),
};

const OVERSEAS_COLLECTIVITY: CategoryProfile = CategoryProfile {
    revenue: (600_000.0, 2_200_000.0),
    growth_pct: (3.0, 16.0),
    satisfaction: (4.1, 4.7),
    market_share_pct: (18.0, 38.0),
    profitability_pct: (8.0, 15.0),
    new_customers_per_month: (300, 1_200),
    basket_size: (60.0, 95.0),
    sale_multiplier: (1.25, 1.5),
    purchase_multiplier: (1.3, 1.6),
};

const MAINLAND_REGION: CategoryProfile = CategoryProfile {
    revenue: (3_500_000.0, 12_000_000.0),
    growth_pct: (2.0, 12.0),
    satisfaction: (4.0, 4.5),
    market_share_pct: (6.0, 22.0),
    profitability_pct: (12.0, 20.0),
    new_customers_per_month: (1_500, 4_000),
    basket_size: (50.0, 80.0),
    sale_multiplier: (1.0, 1.0),
    purchase_multiplier: (1.0, 1.0),
};

impl TerritoryCategory {
    pub fn profile(self) -> &'static CategoryProfile {
        match self {
            Self::OverseasDepartment => &OVERSEAS_DEPARTMENT,
            Self::OverseasCollectivity => &OVERSEAS_COLLECTIVITY,
            Self::MainlandRegion => &MAINLAND_REGION,
        }
    }
}

/// Uniform draw that tolerates degenerate spans such as `(1.0, 1.0)`.
pub fn draw<R: Rng + ?Sized>(rng: &mut R, (low, high): Span) -> f64 {
    if high <= low {
        return low;
    }
    rng.gen_range(low..high)
}

/// One independently drawn record per registered territory, in catalog order.
pub fn generate_territory_performance<R: Rng + ?Sized>(rng: &mut R) -> Vec<TerritoryPerformance> {
    let out = TERRITORIES
        .iter()
        .map(|territory| {
            let profile = territory.category.profile();
            let (min_customers, max_customers) = profile.new_customers_per_month;
            TerritoryPerformance {
                territory: territory.name.to_string(),
                category: territory.category,
                revenue: draw(rng, profile.revenue),
                growth_pct: draw(rng, profile.growth_pct),
                store_count: territory.stores.len() as u32,
                satisfaction: draw(rng, profile.satisfaction),
                market_share_pct: draw(rng, profile.market_share_pct),
                profitability_pct: draw(rng, profile.profitability_pct),
                new_customers_per_month: rng.gen_range(min_customers..=max_customers),
                basket_size: draw(rng, profile.basket_size),
            }
        })
        .collect::<Vec<_>>();
    debug!(territories = out.len(), "generated territory performance");
    out
}
