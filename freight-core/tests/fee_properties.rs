use freight_core::{
    FeeError, Pricing, RateStructure, RawDestination, RouteCatalog, RouteDefaults, RouteGroup,
    RouteTable, compute_fee,
};

const FIXTURE_TABLE: &str = r#"{
    "routes": [
        {
            "origin": "A",
            "destinations": [
                {
                    "destination": "B",
                    "per_volume_rate": 800,
                    "min_reward": 30000000,
                    "max_volume": 335000,
                    "collateral_rate": 0,
                    "round_trip": false
                },
                { "destination": "B", "per_volume_rate": 700, "round_trip": true },
                { "destination": "C", "per_volume_rate": 850 },
                { "destination": "Flat", "per_volume_rate": 800, "flat_rate": 415, "max_volume": 350000 }
            ]
        },
        {
            "origin": "Z",
            "destinations": [
                { "destination": "A", "per_volume_rate": 900, "min_reward": 10000000 }
            ]
        }
    ]
}"#;

fn fixture() -> RouteCatalog {
    RouteCatalog::from_json(FIXTURE_TABLE).expect("fixture table is valid")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn reward_is_floored_at_minimum() {
    let result = compute_fee(&fixture(), "A ➠ B", 1_000.0, 0.0).unwrap();
    assert_close(result.reward, 30_000_000.0);
    assert_close(result.max_m3, 335_000.0);
    assert_eq!(result.route, "A ➠ B");
}

#[test]
fn reward_above_floor_is_volume_fee() {
    let result = compute_fee(&fixture(), "A ➠ B", 100_000.0, 0.0).unwrap();
    assert_close(result.reward, 80_000_000.0);
    assert_eq!(
        result.rate_structure,
        RateStructure {
            per_volume_rate: 800.0,
            collateral_rate: 0.0
        }
    );
}

#[test]
fn oversized_cargo_is_rejected() {
    let err = compute_fee(&fixture(), "A ➠ B", 400_000.0, 0.0).unwrap_err();
    assert_eq!(
        err,
        FeeError::VolumeExceeded {
            route: "A ➠ B".to_string(),
            attempted: 400_000.0,
            max_volume: 335_000.0,
        }
    );
}

#[test]
fn volume_at_cap_is_accepted() {
    let result = compute_fee(&fixture(), "A ➠ B", 335_000.0, 0.0).unwrap();
    assert_close(result.reward, 335_000.0 * 800.0);
}

#[test]
fn flat_rate_ignores_volume_and_collateral() {
    let catalog = fixture();
    for (volume, collateral) in [(0.0, 0.0), (1_000.0, 10.0), (999_999.0, 999_999.0)] {
        let result = compute_fee(&catalog, "A ➠ Flat", volume, collateral).unwrap();
        assert_close(result.reward, 415.0);
        assert_eq!(result.rate_structure, RateStructure::flat());
        assert_eq!(result.pricing, Pricing::Flat);
        assert_close(result.max_m3, 350_000.0);
    }
}

#[test]
fn volume_and_collateral_fees_add_up() {
    let catalog = fixture();
    let result = compute_fee(&catalog, "A ➠ C", 50_000.0, 500.0).unwrap();
    assert_close(result.reward, 46_250_000.0);

    let rule = catalog.get("A ➠ C").unwrap();
    let raw = 50_000.0 * rule.per_volume_rate
        + 500.0 * catalog.collateral_unit() * rule.collateral_rate;
    assert!(raw > rule.min_reward);
    assert_eq!(result.reward, raw);
}

#[test]
fn floor_applies_to_the_sum_not_each_term() {
    let catalog = fixture();
    let rule = catalog.get("A ➠ C").unwrap();
    // 20,000 m3 * 850 = 17m and 2,000m collateral * 0.75% = 15m; each under 30m, sum above
    let result = compute_fee(&catalog, "A ➠ C", 20_000.0, 2_000.0).unwrap();
    assert!(20_000.0 * rule.per_volume_rate < rule.min_reward);
    assert_close(result.reward, 32_000_000.0);
}

#[test]
fn below_floor_equals_min_reward_exactly() {
    let catalog = fixture();
    let rule = catalog.get("Z ➠ A").unwrap();
    let result = compute_fee(&catalog, "Z ➠ A", 10.0, 0.0).unwrap();
    assert_eq!(result.reward, rule.min_reward);
}

#[test]
fn unknown_route_is_reported() {
    let err = compute_fee(&fixture(), "not-a-real-route", 1.0, 1.0).unwrap_err();
    assert_eq!(
        err,
        FeeError::UnknownRoute {
            route: "not-a-real-route".to_string()
        }
    );
}

#[test]
fn route_options_sort_by_code_point() {
    let table = RouteTable::new(vec![
        RouteGroup {
            origin: "Z".to_string(),
            destinations: vec![RawDestination::new("A", 800.0)],
        },
        RouteGroup {
            origin: "A".to_string(),
            destinations: vec![
                RawDestination::new("B", 800.0),
                RawDestination {
                    round_trip: Some(true),
                    ..RawDestination::new("B", 800.0)
                },
            ],
        },
    ]);
    let catalog = RouteCatalog::build(table).unwrap();
    assert_eq!(catalog.route_options(), vec!["A ➠ B", "A ⮂ B", "Z ➠ A"]);
}

#[test]
fn round_trip_and_one_way_differ_only_in_glyph() {
    let options = fixture().route_options();
    assert!(options.contains(&"A ➠ B".to_string()));
    assert!(options.contains(&"A ⮂ B".to_string()));
}

#[test]
fn overriding_one_field_inherits_the_rest() {
    let catalog = fixture();
    let defaults = RouteDefaults::default();
    let rule = catalog.get("Z ➠ A").unwrap();
    assert_close(rule.min_reward, 10_000_000.0);
    assert_close(rule.collateral_rate, defaults.collateral_rate);
    assert_close(rule.max_volume, defaults.max_volume);
    assert_close(rule.max_collateral, defaults.max_collateral);
    assert!(!rule.round_trip);
    assert!(rule.flat_rate.is_none());
}

#[test]
fn catalog_method_matches_free_function() {
    let catalog = fixture();
    assert_eq!(
        catalog.compute_fee("A ➠ C", 12_345.0, 42.0),
        compute_fee(&catalog, "A ➠ C", 12_345.0, 42.0)
    );
}
