use std::collections::HashSet;

use gbh_sim::data::territory::generate_territory_performance;
use gbh_sim::random::sim_rng;
use gbh_sim::registry::{find_territory, TerritoryCategory, TERRITORIES};

#[test]
fn one_record_per_registered_territory() {
    let rows = generate_territory_performance(&mut sim_rng(Some(10)));
    assert_eq!(rows.len(), TERRITORIES.len());
    let names = rows.iter().map(|r| r.territory.as_str()).collect::<HashSet<_>>();
    assert_eq!(names.len(), TERRITORIES.len());
    for row in &rows {
        let entry = find_territory(&row.territory).expect("registered territory");
        assert_eq!(row.category, entry.category);
        assert_eq!(row.store_count as usize, entry.stores.len());
    }
}

#[test]
fn values_stay_inside_category_ranges() {
    for seed in 0..20 {
        for row in generate_territory_performance(&mut sim_rng(Some(seed))) {
            let p = row.category.profile();
            assert!(row.revenue >= p.revenue.0 && row.revenue <= p.revenue.1);
            assert!(row.growth_pct >= p.growth_pct.0 && row.growth_pct <= p.growth_pct.1);
            assert!((4.0..=4.9).contains(&row.satisfaction));
            let (lo, hi) = p.new_customers_per_month;
            assert!((lo..=hi).contains(&row.new_customers_per_month));
            assert!(row.revenue > 0.0 && row.store_count > 0);
        }
    }
}

#[test]
fn category_partition_matches_registry() {
    let rows = generate_territory_performance(&mut sim_rng(Some(11)));
    for category in TerritoryCategory::ALL {
        let generated = rows
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.territory.as_str())
            .collect::<Vec<_>>();
        let registered = category.territories().map(|t| t.name).collect::<Vec<_>>();
        assert_eq!(generated, registered);
    }
}

#[test]
fn category_codes_round_trip() {
    for category in TerritoryCategory::ALL {
        assert_eq!(
            TerritoryCategory::parse(category.code()).expect("parse"),
            category
        );
    }
    assert!(TerritoryCategory::parse("Atlantis").is_err());
}

#[test]
fn registry_lookups_follow_catalog() {
    use gbh_sim::registry::{stores_for, territory_names};

    assert_eq!(
        territory_names(TerritoryCategory::OverseasDepartment),
        vec!["Martinique", "Guadeloupe", "Réunion", "Guyane", "Mayotte"]
    );
    assert_eq!(stores_for("Corse").expect("Corse"), ["GBH Ajaccio", "GBH Bastia"]);
    let err = stores_for("Atlantis").expect_err("unknown territory");
    assert!(err.to_string().contains("unknown territory"), "unexpected error: {err}");
}
