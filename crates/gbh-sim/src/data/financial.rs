//! Daily financial series.
//!
//! Every column is produced by its own generator indexed by the same date
//! sequence. Draw order is fixed (revenue noise, expense ratios, margins, then
//! the side columns in field order) so a seeded source reproduces a series
//! exactly.

use std::f64::consts::TAU;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::Distribution;
use tracing::debug;

use super::records::DailyFinancialRecord;
use crate::error::{SimError, SimResult};
use crate::random::normal;

pub const BASE_DAILY_REVENUE: f64 = 280_000.0;
pub const DAILY_REVENUE_FLOOR: f64 = 120_000.0;
const ANNUAL_AMPLITUDE: f64 = 0.35;
const MONTHLY_AMPLITUDE: f64 = 0.25;
const WEEKLY_AMPLITUDE: f64 = 0.15;
const TREND_PER_DAY: f64 = 150.0;
const TREND_ACCELERATION: f64 = 0.0001;
const REVENUE_NOISE_STD: f64 = 12_000.0;
const WEEKEND_NOISE_DAMPING: f64 = 0.7;

const EXPENSE_RATIO_MEAN: f64 = 0.78;
const EXPENSE_RATIO_STD: f64 = 0.03;
const PROFIT_MARGIN_MEAN: f64 = 0.14;
const PROFIT_MARGIN_STD: f64 = 0.02;

const BASE_EMPLOYEES: f64 = 2_800.0;
const BASE_STORES: u32 = 48;
pub const SATISFACTION_RANGE: (f64, f64) = (4.0, 4.8);
pub const PRODUCTIVITY_RANGE: (f64, f64) = (75.0, 95.0);

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Inclusive daily sequence; `end < start` is rejected rather than yielding
/// an empty range.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> SimResult<Vec<NaiveDate>> {
    if end < start {
        return Err(SimError::InvalidArgument(format!(
            "invalid date range: end {end} precedes start {start}"
        )));
    }
    Ok(start.iter_days().take_while(|d| *d <= end).collect())
}

pub fn generate_financial_series<R: Rng + ?Sized>(
    rng: &mut R,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> SimResult<Vec<DailyFinancialRecord>> {
    let end = end.unwrap_or_else(|| Local::now().date_naive());
    let dates = date_range(start, end)?;

    let daily_revenue = daily_revenue(rng, &dates)?;
    let expense_ratio = normal(EXPENSE_RATIO_MEAN, EXPENSE_RATIO_STD)?;
    let expense_ratios = (0..dates.len())
        .map(|_| expense_ratio.sample(rng).max(0.0))
        .collect::<Vec<_>>();
    let profit_margin = normal(PROFIT_MARGIN_MEAN, PROFIT_MARGIN_STD)?;
    let profit_margins = (0..dates.len())
        .map(|_| profit_margin.sample(rng).max(0.0))
        .collect::<Vec<_>>();

    let investments = investments(rng, &dates);
    let employees = employees(rng, &dates)?;
    let satisfaction = satisfaction(rng, &dates)?;
    let baskets = basket_sizes(rng, &dates)?;
    let new_customers = new_customers(rng, &dates)?;
    let store_counts = store_counts(rng, &dates);
    let productivity = productivity(rng, &dates)?;

    let mut out = Vec::with_capacity(dates.len());
    let (mut revenue_acc, mut expense_acc, mut profit_acc) = (0.0, 0.0, 0.0);
    for (i, date) in dates.iter().enumerate() {
        let revenue = daily_revenue[i];
        revenue_acc += revenue;
        expense_acc += revenue * expense_ratios[i];
        profit_acc += revenue * profit_margins[i];
        out.push(DailyFinancialRecord {
            date: *date,
            cumulative_revenue: revenue_acc,
            daily_revenue: revenue,
            cumulative_expenses: expense_acc,
            cumulative_net_profit: profit_acc,
            investment: investments[i],
            employees: employees[i].round() as u32,
            satisfaction: satisfaction[i],
            basket_size: baskets[i],
            new_customers: new_customers[i],
            store_count: store_counts[i],
            productivity_pct: productivity[i],
        });
    }

    debug!(days = out.len(), %start, %end, "generated financial series");
    Ok(out)
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Calendar bump as a fraction of the base level.
pub fn special_event_factor(date: NaiveDate) -> f64 {
    match (date.month(), date.day()) {
        // January and July clearance sales.
        (1, _) | (7, _) => 0.25,
        (12, d) if d > 15 => 0.40,
        (2, _) | (9, _) => -0.10,
        _ => 0.0,
    }
}

fn seasonal_wave(day_index: f64, period: f64, amplitude: f64) -> f64 {
    (day_index * TAU / period).sin() * amplitude
}

fn day_of_year_wave(date: NaiveDate, amplitude: f64) -> f64 {
    (f64::from(date.ordinal()) * TAU / 365.0).sin() * amplitude
}

pub fn daily_revenue<R: Rng + ?Sized>(rng: &mut R, dates: &[NaiveDate]) -> SimResult<Vec<f64>> {
    let noise_dist = normal(0.0, REVENUE_NOISE_STD)?;
    Ok(dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let t = i as f64;
            let seasonal = seasonal_wave(t, 365.0, ANNUAL_AMPLITUDE)
                + seasonal_wave(t, 30.0, MONTHLY_AMPLITUDE)
                + seasonal_wave(t, 7.0, WEEKLY_AMPLITUDE);
            let trend = t * TREND_PER_DAY * (1.0 + t * TREND_ACCELERATION);
            let mut noise = noise_dist.sample(rng);
            if is_weekend(*date) {
                noise *= WEEKEND_NOISE_DAMPING;
            }
            let revenue = BASE_DAILY_REVENUE * (1.0 + seasonal + special_event_factor(*date))
                + trend
                + noise;
            revenue.max(DAILY_REVENUE_FLOOR)
        })
        .collect())
}

/// Store openings on the first day of March, June and September; renovations
/// on the 15th of any month. Zero otherwise.
pub fn investments<R: Rng + ?Sized>(rng: &mut R, dates: &[NaiveDate]) -> Vec<f64> {
    const OPENING_BUDGETS: [f64; 3] = [250_000.0, 500_000.0, 1_000_000.0];

    dates
        .iter()
        .map(|date| {
            if date.day() == 1 && matches!(date.month(), 3 | 6 | 9) {
                if rng.gen_bool(0.3) {
                    return OPENING_BUDGETS.choose(rng).copied().unwrap_or(0.0);
                }
            } else if date.day() == 15 && rng.gen_bool(0.2) {
                return rng.gen_range(50_000.0..200_000.0);
            }
            0.0
        })
        .collect()
}

pub fn employees<R: Rng + ?Sized>(rng: &mut R, dates: &[NaiveDate]) -> SimResult<Vec<f64>> {
    let hiring = normal(0.8, 0.5)?;
    let floor = BASE_EMPLOYEES * 0.95;
    let mut out = Vec::with_capacity(dates.len());
    let mut current = BASE_EMPLOYEES;
    for (i, date) in dates.iter().enumerate() {
        if i > 0 {
            let mut growth = hiring.sample(rng);
            match date.month() {
                11 | 12 => growth += rng.gen_range(2.0..5.0),
                1 | 2 => growth -= rng.gen_range(1.0..3.0),
                _ => {}
            }
            current = (current + growth).max(floor);
        }
        out.push(current);
    }
    Ok(out)
}

pub fn satisfaction<R: Rng + ?Sized>(rng: &mut R, dates: &[NaiveDate]) -> SimResult<Vec<f64>> {
    let (lo, hi) = SATISFACTION_RANGE;
    let noise = normal(0.0, 0.04)?;
    Ok(dates
        .iter()
        .map(|date| {
            let adjustment = match date.month() {
                12 | 1 | 7 => -0.10,
                2 | 9 => 0.05,
                _ => 0.0,
            };
            (4.3 + adjustment + noise.sample(rng)).clamp(lo, hi)
        })
        .collect())
}

pub fn basket_sizes<R: Rng + ?Sized>(rng: &mut R, dates: &[NaiveDate]) -> SimResult<Vec<f64>> {
    let noise = normal(0.0, 3.0)?;
    Ok(dates
        .iter()
        .map(|date| {
            let special = match date.month() {
                12 => 15.0,
                1 | 7 => 5.0,
                _ => 0.0,
            };
            let basket = 65.0 + day_of_year_wave(*date, 8.0) + special + noise.sample(rng);
            basket.max(40.0)
        })
        .collect())
}

pub fn new_customers<R: Rng + ?Sized>(rng: &mut R, dates: &[NaiveDate]) -> SimResult<Vec<u32>> {
    let noise = normal(0.0, 30.0)?;
    Ok(dates
        .iter()
        .map(|date| {
            let weekday_effect = if is_weekend(*date) { 120.0 } else { 80.0 };
            let special = match date.month() {
                12 => 100.0,
                1 | 7 => 150.0,
                _ => 0.0,
            };
            let customers = 400.0
                + day_of_year_wave(*date, 50.0)
                + weekday_effect
                + special
                + noise.sample(rng);
            customers.max(200.0) as u32
        })
        .collect())
}

/// Flat except on the first of a month, where a store opens with p = 0.3.
pub fn store_counts<R: Rng + ?Sized>(rng: &mut R, dates: &[NaiveDate]) -> Vec<u32> {
    let mut out = Vec::with_capacity(dates.len());
    let mut current = BASE_STORES;
    for (i, date) in dates.iter().enumerate() {
        if i > 0 && date.day() == 1 && rng.gen_bool(0.3) {
            current += 1;
        }
        out.push(current);
    }
    out
}

pub fn productivity<R: Rng + ?Sized>(rng: &mut R, dates: &[NaiveDate]) -> SimResult<Vec<f64>> {
    let (lo, hi) = PRODUCTIVITY_RANGE;
    let noise = normal(0.0, 2.0)?;
    Ok(dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let learning = (i as f64 * 0.01).min(5.0);
            (85.0 + day_of_year_wave(*date, 3.0) + learning + noise.sample(rng)).clamp(lo, hi)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::sim_rng;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn special_events_follow_the_calendar() {
        assert_eq!(special_event_factor(ymd(2023, 1, 10)), 0.25);
        assert_eq!(special_event_factor(ymd(2023, 7, 31)), 0.25);
        assert_eq!(special_event_factor(ymd(2023, 12, 15)), 0.0);
        assert_eq!(special_event_factor(ymd(2023, 12, 16)), 0.40);
        assert_eq!(special_event_factor(ymd(2023, 9, 3)), -0.10);
        assert_eq!(special_event_factor(ymd(2023, 5, 3)), 0.0);
    }

    #[test]
    fn investments_only_land_on_eligible_days() {
        let mut rng = sim_rng(Some(11));
        let dates = date_range(ymd(2022, 1, 1), ymd(2024, 12, 31)).expect("range");
        let values = investments(&mut rng, &dates);
        for (date, value) in dates.iter().zip(&values) {
            if *value > 0.0 {
                let opening = date.day() == 1 && matches!(date.month(), 3 | 6 | 9);
                assert!(opening || date.day() == 15, "unexpected investment on {date}");
            }
        }
        assert!(values.iter().any(|v| *v > 0.0));
    }

    #[test]
    fn employees_never_fall_below_floor() {
        let mut rng = sim_rng(Some(5));
        let dates = date_range(ymd(2023, 1, 1), ymd(2023, 3, 31)).expect("range");
        let values = employees(&mut rng, &dates).expect("employees");
        assert_eq!(values[0], BASE_EMPLOYEES);
        assert!(values.iter().all(|v| *v >= BASE_EMPLOYEES * 0.95));
    }

    #[test]
    fn store_count_is_monotone_and_steps_on_month_start() {
        let mut rng = sim_rng(Some(9));
        let dates = date_range(ymd(2023, 1, 1), ymd(2025, 1, 1)).expect("range");
        let values = store_counts(&mut rng, &dates);
        assert_eq!(values[0], BASE_STORES);
        for i in 1..values.len() {
            let step = values[i] - values[i - 1];
            assert!(step <= 1);
            if step == 1 {
                assert_eq!(dates[i].day(), 1);
            }
        }
    }
}
