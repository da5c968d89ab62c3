use chrono::NaiveDate;
use gbh_sim::analytics::clustering::cluster_territories;
use gbh_sim::analytics::decomposition::{adf_test, analyze_daily_revenue};
use gbh_sim::analytics::metrics::advanced_metrics;
use gbh_sim::analytics::montecarlo::{project_revenue, MonteCarloConfig, Scenario};
use gbh_sim::analytics::ratios::financial_ratios;
use gbh_sim::analytics::regression::revenue_trend;
use gbh_sim::analytics::{analyze, AnalyticsOptions};
use gbh_sim::data::financial::generate_financial_series;
use gbh_sim::data::records::DailyFinancialRecord;
use gbh_sim::data::territory::generate_territory_performance;
use gbh_sim::error::SimError;
use gbh_sim::random::{normal, sim_rng};
use gbh_sim::registry::TERRITORIES;
use gbh_sim::snapshot::{Snapshot, SnapshotRequest};
use rand_distr::Distribution;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn year_series(seed: u64) -> Vec<DailyFinancialRecord> {
    generate_financial_series(&mut sim_rng(Some(seed)), ymd(2023, 1, 1), Some(ymd(2023, 12, 31)))
        .expect("series")
}

#[test]
fn trend_forecast_extends_past_last_day() {
    let series = year_series(1);
    let trend = revenue_trend(&series, 30).expect("trend");
    assert_eq!(trend.forecast.len(), 30);
    assert_eq!(trend.forecast[0].date, ymd(2024, 1, 1));
    assert_eq!(trend.forecast[29].date, ymd(2024, 1, 30));
    assert!(trend.slope > 0.0);
    assert!(trend.r_squared > 0.9, "r2={}", trend.r_squared);
    for point in &trend.forecast {
        assert!(point.lower <= point.value && point.value <= point.upper);
    }
}

#[test]
fn short_series_reports_insufficient_data() {
    let series = generate_financial_series(&mut sim_rng(Some(2)), ymd(2023, 1, 1), Some(ymd(2023, 1, 5)))
        .expect("series");
    let err = revenue_trend(&series, 30).expect_err("five rows is too few");
    assert!(matches!(err, SimError::InsufficientData { required: 10, actual: 5, .. }));
}

#[test]
fn analyze_skips_sections_that_need_more_rows() {
    let request = SnapshotRequest {
        start: ymd(2023, 3, 1),
        end: Some(ymd(2023, 3, 5)),
        transactions: 10,
        now: ymd(2023, 3, 6).and_hms_opt(8, 0, 0).expect("time"),
    };
    let snapshot = Snapshot::generate(&mut sim_rng(Some(3)), &request).expect("snapshot");
    let report = analyze(&snapshot, &AnalyticsOptions::default()).expect("report");
    assert!(report.trend.is_none());
    assert!(report.time_series.is_none());
    assert!(report.ratios.is_some());
    assert!(report.clusters.is_some());
    assert!(report.projection.is_some());
}

#[test]
fn clusters_cover_every_territory_and_are_ranked_by_revenue() {
    let territories = generate_territory_performance(&mut sim_rng(Some(4)));
    let clusters = cluster_territories(&territories).expect("clusters");
    assert_eq!(clusters.profiles.len(), 3);
    assert_eq!(clusters.assignments.len(), TERRITORIES.len());
    let total: usize = clusters.profiles.iter().map(|p| p.size).sum();
    assert_eq!(total, TERRITORIES.len());
    assert_eq!(clusters.profiles[0].label, "High Performers");
    for pair in clusters.profiles.windows(2) {
        assert!(pair[0].mean_revenue >= pair[1].mean_revenue);
    }
    assert_eq!(clusters.elbow.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![2, 3, 4, 5]);

    let again = cluster_territories(&territories).expect("clusters again");
    assert_eq!(clusters, again);
}

#[test]
fn clustering_needs_five_territories() {
    let territories = generate_territory_performance(&mut sim_rng(Some(5)));
    let err = cluster_territories(&territories[..4]).expect_err("too few rows");
    assert!(err.to_string().contains("territory clustering"), "unexpected error: {err}");
}

#[test]
fn white_noise_is_stationary() {
    let mut rng = sim_rng(Some(6));
    let standard = normal(0.0, 1.0).expect("normal");
    let noise = (0..300).map(|_| standard.sample(&mut rng)).collect::<Vec<_>>();
    let adf = adf_test(&noise).expect("adf");
    assert!(adf.is_stationary, "statistic={}", adf.statistic);
    assert!(adf.critical_1pct < adf.critical_5pct && adf.critical_5pct < adf.critical_10pct);
}

#[test]
fn time_series_analysis_aligns_with_input() {
    let series = year_series(7);
    let analysis = analyze_daily_revenue(&series).expect("analysis");
    let d = &analysis.decomposition;
    assert_eq!(d.trend.len(), series.len());
    assert_eq!(d.seasonal.len(), series.len());
    assert_eq!(d.residual.len(), series.len());
    assert_eq!(d.seasonal[0], d.seasonal[7]);
    assert!((0.0..=1.0).contains(&analysis.seasonal_strength));
    assert_eq!(analysis.autocorrelation.len(), 21);
}

#[test]
fn ratios_use_latest_day() {
    let series = year_series(8);
    let ratios = financial_ratios(&series).expect("ratios");
    let margin = ratios.net_margin_pct.expect("margin");
    assert!(margin >= 0.0 && margin < 30.0, "margin={margin}");
    assert!((ratios.debt_to_assets - 0.4).abs() < 1e-12);
    assert!((ratios.debt_to_equity - 0.4 / 0.6).abs() < 1e-9);
    assert_eq!(
        ratios.operating_margin_pct.expect("operating"),
        margin * 0.85
    );
}

#[test]
fn monte_carlo_is_seeded_and_ordered() {
    let config = MonteCarloConfig {
        simulations: 500,
        horizon: 30,
        confidence: 90.0,
        scenario: Scenario::Optimistic,
        seed: 42,
    };
    let a = project_revenue(&config, 1_000_000.0, Some(0.2), Some(15.0)).expect("projection");
    let b = project_revenue(&config, 1_000_000.0, Some(0.2), Some(15.0)).expect("projection");
    assert_eq!(a, b);
    assert_eq!(a.final_values.len(), 500);
    assert!(a.lower <= a.median && a.median <= a.upper);
    assert_eq!(a.lower_percentile, 5.0);
    assert_eq!(a.upper_percentile, 95.0);
    assert!((a.daily_growth_mean - 0.002 * 1.2).abs() < 1e-12);
}

#[test]
fn monte_carlo_rejects_out_of_range_horizon() {
    let config = MonteCarloConfig {
        horizon: 365,
        ..MonteCarloConfig::default()
    };
    let err = project_revenue(&config, 1.0, None, None).expect_err("horizon too long");
    assert!(err.to_string().contains("horizon"), "unexpected error: {err}");
}

#[test]
fn advanced_metrics_cover_both_tables() {
    let series = year_series(9);
    let territories = generate_territory_performance(&mut sim_rng(Some(9)));
    let metrics = advanced_metrics(&series, &territories);

    assert!(metrics.daily_growth_rate_pct.expect("growth") > 0.0);
    assert!(metrics.revenue_volatility_pct.expect("volatility") > 0.0);
    let hhi = metrics.hhi_index.expect("hhi");
    assert!(hhi >= 10_000.0 / TERRITORIES.len() as f64 && hhi <= 10_000.0);
    assert_eq!(metrics.category_performance.len(), 3);

    let corr = metrics.correlation.expect("correlation");
    assert_eq!(corr.columns.len(), corr.values.len());
    let diag = corr.get("revenue", "revenue").expect("diagonal");
    assert!((diag - 1.0).abs() < 1e-9);
}
