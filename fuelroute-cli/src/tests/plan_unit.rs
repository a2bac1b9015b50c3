//! Focused unit tests covering plan CLI configuration and output shaping.

use super::helpers::{temp_root, write_utf8};
use super::*;
use camino::Utf8PathBuf;
use crate::plan::{PlanArgs, PlanConfig, PlanResponse, config_from_layers_for_test};
use fuelroute_core::test_support::{meridian_route, station_at};
use fuelroute_core::{FuelStop, PlanError, PlanResult, PlanStrategy, PlannerConfig, TripPlan};
use geo::Coord;
use rstest::rstest;
use rust_decimal::Decimal;

fn args_with_locations() -> PlanArgs {
    PlanArgs {
        start: Some("Dallas, TX".to_owned()),
        end: Some("Chicago, IL".to_owned()),
        ..PlanArgs::default()
    }
}

#[rstest]
#[case::missing_start(None, Some("Chicago, IL"), ARG_PLAN_START, ENV_PLAN_START)]
#[case::missing_end(Some("Dallas, TX"), None, ARG_PLAN_END, ENV_PLAN_END)]
fn converting_plan_without_location_errors(
    #[case] start: Option<&str>,
    #[case] end: Option<&str>,
    #[case] expected_field: &'static str,
    #[case] expected_env: &'static str,
) {
    let args = PlanArgs {
        start: start.map(str::to_owned),
        end: end.map(str::to_owned),
        ..PlanArgs::default()
    };

    let err = PlanConfig::try_from(args).expect_err("missing location should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn plan_config_applies_defaults() {
    let config = PlanConfig::try_from(args_with_locations()).expect("config should build");
    assert_eq!(config.start, "Dallas, TX");
    assert_eq!(config.end, "Chicago, IL");
    assert_eq!(config.database, Utf8PathBuf::from(DEFAULT_DATABASE));
    assert_eq!(config.osrm_base_url, "http://router.project-osrm.org");
    assert_eq!(
        config.nominatim_base_url,
        "https://nominatim.openstreetmap.org"
    );
    assert_eq!(config.planner, PlannerConfig::default());
}

#[rstest]
fn plan_config_applies_vehicle_overrides() {
    let args = PlanArgs {
        tank_range: Some(650.0),
        mpg: Some(6.5),
        strategy: Some("shortest-path".to_owned()),
        ..args_with_locations()
    };

    let config = PlanConfig::try_from(args).expect("config should build");
    assert_eq!(config.planner.tank_range_miles, 650.0);
    assert_eq!(config.planner.miles_per_gallon, 6.5);
    assert_eq!(config.planner.strategy, PlanStrategy::ShortestPath);
}

#[rstest]
fn unknown_strategy_is_rejected() {
    let args = PlanArgs {
        strategy: Some("cheapest-first".to_owned()),
        ..args_with_locations()
    };

    let err = PlanConfig::try_from(args).expect_err("unknown strategy should error");
    match err {
        CliError::InvalidStrategy(source) => assert_eq!(source.0, "cheapest-first"),
        other => panic!("expected InvalidStrategy, found {other:?}"),
    }
}

#[rstest]
#[case::zero_tank(Some(0.0), None, PlanError::InvalidTankRange { value: 0.0 })]
#[case::negative_mpg(None, Some(-4.0), PlanError::InvalidMilesPerGallon { value: -4.0 })]
fn invalid_vehicle_parameters_are_rejected(
    #[case] tank_range: Option<f64>,
    #[case] mpg: Option<f64>,
    #[case] expected: PlanError,
) {
    let args = PlanArgs {
        tank_range,
        mpg,
        ..args_with_locations()
    };

    let err = PlanConfig::try_from(args).expect_err("invalid vehicle should error");
    match err {
        CliError::InvalidPlannerConfig(source) => assert_eq!(source, expected),
        other => panic!("expected InvalidPlannerConfig, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_missing_database() {
    let (_tmp, root) = temp_root();
    let config = PlanConfig {
        database: root.join("stations.db"),
        ..PlanConfig::try_from(args_with_locations()).expect("config should build")
    };

    let err = config.validate_sources().expect_err("missing database");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_DATABASE);
            assert_eq!(path, root.join("stations.db"));
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_accepts_existing_database() {
    let (_tmp, root) = temp_root();
    let database = root.join("stations.db");
    write_utf8(&database, b"");
    let config = PlanConfig {
        database,
        ..PlanConfig::try_from(args_with_locations()).expect("config should build")
    };

    config.validate_sources().expect("database exists");
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "tank_range": "a lot" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "start": "Dallas, TX",
            "osrm_base_url": "http://from-file:5000",
            "mpg": 8.0,
            "tank_range": 400.0,
        }),
        None,
    );
    composer.push_environment(json!({
        "end": "Tulsa, OK",
        "mpg": 9.0,
    }));
    composer.push_cli(json!({
        "mpg": 11.0,
        "strategy": "shortest-path",
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.start, "Dallas, TX");
    assert_eq!(config.end, "Tulsa, OK");
    assert_eq!(config.osrm_base_url, "http://from-file:5000");
    assert_eq!(config.planner.tank_range_miles, 400.0);
    assert_eq!(config.planner.miles_per_gallon, 11.0);
    assert_eq!(config.planner.strategy, PlanStrategy::ShortestPath);
}

#[rstest]
fn plan_response_reports_latitude_first() {
    let origin = Coord { x: -97.0, y: 32.0 };
    let route = meridian_route(origin, 100.0, 3);
    let station = station_at("7", Coord { x: -97.1, y: 32.5 }, Decimal::new(3159, 3))
        .with_address("I-35 EXIT 7", "Waco", "TX");
    let stop = FuelStop {
        station,
        distance_from_start_miles: 50.0,
        gallons: 5.0,
        cost: Decimal::new(15795, 3),
    };
    let end = *route.geometry.last().expect("route has points");
    let trip = TripPlan {
        start: origin,
        end,
        route,
        plan: PlanResult {
            stops: vec![stop],
            total_cost: Decimal::new(15795, 3),
            total_distance_miles: 100.0,
            uncovered_triggers: 0,
            strategy: PlanStrategy::Greedy,
        },
    };

    let response = PlanResponse::from(trip);
    assert_eq!(response.route.geometry.len(), 3);
    assert_eq!(response.route.geometry.first(), Some(&[32.0, -97.0]));
    assert_eq!(response.route.distance_miles, 100.0);
    let [summary] = response.fuel_stops.as_slice() else {
        panic!("expected one stop, found {:?}", response.fuel_stops);
    };
    assert_eq!(summary.station_name, "Station 7");
    assert_eq!(summary.city, "Waco");
    assert_eq!(summary.coordinates, [32.5, -97.1]);
    assert_eq!(summary.price, Decimal::new(3159, 3));
    assert_eq!(summary.distance_from_start_miles, 50.0);
    assert_eq!(response.total_cost, Decimal::new(15795, 3));
}

#[rstest]
fn plan_response_uses_documented_field_names() {
    let route = meridian_route(Coord { x: -97.0, y: 32.0 }, 10.0, 2);
    let [start, end] = route.geometry.as_slice() else {
        panic!("expected two route points, found {:?}", route.geometry);
    };
    let trip = TripPlan {
        start: *start,
        end: *end,
        route,
        plan: PlanResult {
            stops: Vec::new(),
            total_cost: Decimal::ZERO,
            total_distance_miles: 10.0,
            uncovered_triggers: 0,
            strategy: PlanStrategy::Greedy,
        },
    };

    let value = serde_json::to_value(PlanResponse::from(trip)).expect("serialise response");
    for key in ["route", "fuel_stops", "total_cost", "total_distance_miles"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    let route_value = value.get("route").expect("route object");
    for key in ["distance_miles", "duration_hours", "geometry"] {
        assert!(route_value.get(key).is_some(), "missing route.{key}");
    }
    assert_eq!(
        value.get("strategy").and_then(serde_json::Value::as_str),
        Some("greedy")
    );
}
