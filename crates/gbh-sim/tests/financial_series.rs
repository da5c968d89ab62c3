use chrono::{Local, NaiveDate};
use gbh_sim::data::financial::{
    generate_financial_series, DAILY_REVENUE_FLOOR, PRODUCTIVITY_RANGE, SATISFACTION_RANGE,
};
use gbh_sim::random::sim_rng;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn one_record_per_calendar_day() {
    let mut rng = sim_rng(Some(1));
    let series = generate_financial_series(&mut rng, ymd(2023, 1, 1), Some(ymd(2024, 12, 31)))
        .expect("series");
    assert_eq!(series.len(), 731);
    assert_eq!(series[0].date, ymd(2023, 1, 1));
    assert_eq!(series[series.len() - 1].date, ymd(2024, 12, 31));
    assert!(series.windows(2).all(|w| w[1].date == w[0].date.succ_opt().expect("succ")));
}

#[test]
fn daily_revenue_respects_floor_and_cumulative_columns_grow() {
    let mut rng = sim_rng(Some(2));
    let series = generate_financial_series(&mut rng, ymd(2023, 1, 1), Some(ymd(2024, 6, 30)))
        .expect("series");
    assert!(series.iter().all(|r| r.daily_revenue >= DAILY_REVENUE_FLOOR));
    for w in series.windows(2) {
        assert!(w[1].cumulative_revenue >= w[0].cumulative_revenue);
        assert!(w[1].cumulative_expenses >= w[0].cumulative_expenses);
        assert!(w[1].cumulative_net_profit >= w[0].cumulative_net_profit);
        assert!(w[1].store_count >= w[0].store_count);
        let delta = w[1].cumulative_revenue - w[0].cumulative_revenue;
        assert!((delta - w[1].daily_revenue).abs() < 1e-6 * w[1].cumulative_revenue);
    }
}

#[test]
fn bounded_columns_stay_in_range() {
    let mut rng = sim_rng(Some(3));
    let series = generate_financial_series(&mut rng, ymd(2022, 1, 1), Some(ymd(2024, 12, 31)))
        .expect("series");
    let (sat_lo, sat_hi) = SATISFACTION_RANGE;
    let (prod_lo, prod_hi) = PRODUCTIVITY_RANGE;
    for r in &series {
        assert!((sat_lo..=sat_hi).contains(&r.satisfaction), "{}", r.satisfaction);
        assert!((prod_lo..=prod_hi).contains(&r.productivity_pct));
        assert!(r.basket_size >= 40.0);
        assert!(r.new_customers >= 200);
        assert!(r.employees > 0);
        assert!(r.investment >= 0.0);
    }
}

#[test]
fn single_day_cumulative_equals_daily() {
    let mut rng = sim_rng(Some(4));
    let day = ymd(2023, 1, 1);
    let series = generate_financial_series(&mut rng, day, Some(day)).expect("series");
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].cumulative_revenue, series[0].daily_revenue);
}

#[test]
fn reversed_range_is_rejected() {
    let mut rng = sim_rng(Some(5));
    let err = generate_financial_series(&mut rng, ymd(2023, 2, 1), Some(ymd(2023, 1, 1)))
        .expect_err("end before start should fail");
    assert!(err.to_string().contains("date range"), "unexpected error: {err}");
}

#[test]
fn open_range_ends_today() {
    let mut rng = sim_rng(Some(6));
    let today = Local::now().date_naive();
    let start = today - chrono::Duration::days(9);
    let series = generate_financial_series(&mut rng, start, None).expect("series");
    // The clock may tick past midnight between the two reads.
    assert!(series.len() == 10 || series.len() == 11, "len={}", series.len());
}
