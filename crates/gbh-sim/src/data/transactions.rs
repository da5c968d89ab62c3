use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::records::{Transaction, TransactionKind};
use super::territory::draw;
use crate::error::{SimError, SimResult};
use crate::registry::{Territory, TERRITORIES};

/// Transactions are spread over this many days before `now`.
pub const LOOKBACK_DAYS: i64 = 45;
const ID_MIN: u32 = 10_000_000;
const ID_MAX: u32 = 100_000_000;
/// Distinct `GBH` + 8 digit identifiers.
pub const ID_CAPACITY: usize = (ID_MAX - ID_MIN) as usize;

fn sale_range(department: &str) -> (f64, f64) {
    match department {
        "Food" => (45.0, 280.0),
        "DIY" => (75.0, 750.0),
        "Textile" => (30.0, 220.0),
        "Electronics" => (150.0, 3_000.0),
        "Home" => (40.0, 450.0),
        "Auto" => (120.0, 1_500.0),
        _ => (70.0, 700.0),
    }
}

fn purchase_range(line: &str) -> (f64, f64) {
    match line {
        "Food stock" => (2_500.0, 35_000.0),
        "DIY stock" => (4_000.0, 50_000.0),
        "Textile stock" => (1_200.0, 25_000.0),
        "Equipment" => (10_000.0, 80_000.0),
        _ => (3_000.0, 40_000.0),
    }
}

/// Signed amount: inflows positive, outflows negative. Overseas sales and
/// purchases carry a logistics surcharge.
fn signed_amount<R: Rng + ?Sized>(
    rng: &mut R,
    kind: TransactionKind,
    subcategory: &str,
    territory: &Territory,
) -> f64 {
    let profile = territory.category.profile();
    match kind {
        TransactionKind::Sale => {
            let multiplier = draw(rng, profile.sale_multiplier);
            draw(rng, sale_range(subcategory)) * multiplier
        }
        TransactionKind::Purchase => {
            let multiplier = draw(rng, profile.purchase_multiplier);
            -(draw(rng, purchase_range(subcategory)) * multiplier)
        }
        TransactionKind::Service => draw(rng, (50.0, 2_000.0)),
        TransactionKind::Fee => -draw(rng, (1_000.0, 15_000.0)),
    }
}

/// `count` transactions, newest first, with identifiers unique within the batch.
pub fn generate_transactions<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    now: NaiveDateTime,
) -> SimResult<Vec<Transaction>> {
    if count > ID_CAPACITY {
        return Err(SimError::InvalidArgument(format!(
            "cannot issue {count} unique transaction ids; at most {ID_CAPACITY} fit the GBH format"
        )));
    }
    let mut ids = HashSet::with_capacity(count);
    let mut out = Vec::with_capacity(count);

    for _ in 0..count {
        let offset = Duration::days(rng.gen_range(0..=LOOKBACK_DAYS))
            + Duration::hours(rng.gen_range(0..=23))
            + Duration::minutes(rng.gen_range(0..=59));
        let territory = &TERRITORIES[rng.gen_range(0..TERRITORIES.len())];
        let store = territory.stores[rng.gen_range(0..territory.stores.len())];
        let kind = TransactionKind::ALL[rng.gen_range(0..TransactionKind::ALL.len())];
        let subcategory = kind.subcategories().choose(rng).copied().unwrap_or_default();
        let amount = signed_amount(rng, kind, subcategory, territory);

        let id = loop {
            let candidate = rng.gen_range(ID_MIN..ID_MAX);
            if ids.insert(candidate) {
                break format!("GBH{candidate}");
            }
        };

        out.push(Transaction {
            timestamp: now - offset,
            kind,
            subcategory: subcategory.to_string(),
            store: store.to_string(),
            amount,
            territory: territory.name.to_string(),
            territory_category: territory.category,
            id,
        });
    }

    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    debug!(transactions = out.len(), "generated transactions");
    Ok(out)
}

impl Transaction {
    /// Display label such as "Sale Electronics".
    pub fn label(&self) -> String {
        format!("{} {}", self.kind.label(), self.subcategory)
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%d/%m/%Y %H:%M").to_string()
    }

    pub fn formatted_amount(&self) -> String {
        format!("{} €", format_signed_amount(self.amount))
    }
}

/// `+1,234.56` / `-98,000.00`: explicit sign, thousands separators, two decimals.
pub fn format_signed_amount(amount: f64) -> String {
    let sign = if amount < 0.0 { '-' } else { '+' };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_amounts_with_sign_and_grouping() {
        assert_eq!(format_signed_amount(1234.567), "+1,234.57");
        assert_eq!(format_signed_amount(-98_000.0), "-98,000.00");
        assert_eq!(format_signed_amount(12.3), "+12.30");
        assert_eq!(format_signed_amount(1_000_000.0), "+1,000,000.00");
    }
}
