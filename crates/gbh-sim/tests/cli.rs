use clap::Parser;
use gbh_sim::analytics::montecarlo::Scenario;
use gbh_sim::cli::Args;
use gbh_sim::registry::TerritoryCategory;

fn args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv).expect("arguments should parse")
}

#[test]
fn scenario_flag_overrides_profile() {
    let profile = args(&["gbh-sim", "analyze", "--scenario", "prudent"])
        .resolve_profile()
        .expect("profile");
    assert_eq!(profile.monte_carlo.scenario, Scenario::Prudent);

    let profile = args(&["gbh-sim", "snapshot", "--scenario", "optimistic"])
        .resolve_profile()
        .expect("profile");
    assert_eq!(profile.monte_carlo.scenario, Scenario::Optimistic);

    let profile = args(&["gbh-sim", "analyze"]).resolve_profile().expect("profile");
    assert_eq!(profile.monte_carlo.scenario, Scenario::Realistic);
}

#[test]
fn unknown_scenario_is_rejected() {
    let err = args(&["gbh-sim", "analyze", "--scenario", "bullish"])
        .resolve_profile()
        .expect_err("unknown scenario");
    assert!(err.to_string().contains("unknown scenario"), "unexpected error: {err}");
}

#[test]
fn territories_category_filter_parses_codes() {
    let filter = args(&["gbh-sim", "territories", "--category", "COM"])
        .category_filter()
        .expect("filter");
    assert_eq!(filter, Some(TerritoryCategory::OverseasCollectivity));

    let filter = args(&["gbh-sim", "territories", "--category", "mainland-region"])
        .category_filter()
        .expect("filter");
    assert_eq!(filter, Some(TerritoryCategory::MainlandRegion));

    let filter = args(&["gbh-sim", "territories"]).category_filter().expect("filter");
    assert_eq!(filter, None);
}

#[test]
fn unknown_category_is_rejected() {
    let err = args(&["gbh-sim", "territories", "--category", "Atlantis"])
        .category_filter()
        .expect_err("unknown category");
    assert!(err.to_string().contains("unknown territory category"), "unexpected error: {err}");
}
