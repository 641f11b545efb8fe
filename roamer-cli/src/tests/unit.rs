//! Focused unit tests covering CLI configuration and waypoint loading.

use super::helpers::{
    StubServices, default_route, located_waypoints, temp_root, write_utf8, write_waypoints,
};
use super::*;
use crate::fs::{load_waypoints, require_existing};
use crate::optimize::{OptimizeConfig, run_optimize_with};
use crate::output::{TripOutput, write_json};
use crate::route::RouteConfig;
use crate::search::{SearchConfig, run_search_with};
use crate::services::transport_config;
use clap::ValueEnum;
use log::LevelFilter;
use ortho_config::{MergeComposer, OrthoConfig};
use roamer_core::{
    DEFAULT_ENDPOINT, DEFAULT_SOURCE, PipelineError, SearchResult, ServiceCallError, Waypoint,
    WaypointId,
};
use rstest::rstest;
use serde_json::json;
use std::time::Duration;

fn search_args(text: Option<&str>, token: Option<&str>) -> SearchArgs {
    SearchArgs {
        text: text.map(str::to_owned),
        access_token: token.map(str::to_owned),
        ..SearchArgs::default()
    }
}

fn optimize_args() -> OptimizeArgs {
    OptimizeArgs {
        waypoints: Some("trip.json".into()),
        route_url: Some("http://router.test/route".to_owned()),
        optimize_url: Some("http://solver.test/optimize".to_owned()),
        ..OptimizeArgs::default()
    }
}

#[rstest]
fn search_without_text_errors() {
    let err = SearchConfig::try_from(search_args(None, Some("pk.test")))
        .expect_err("missing text should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_SEARCH_TEXT);
            assert_eq!(env, ENV_SEARCH_TEXT);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case("")]
#[case("   ")]
fn search_rejects_blank_text(#[case] text: &str) {
    let err = SearchConfig::try_from(search_args(Some(text), Some("pk.test")))
        .expect_err("blank text should error");
    assert!(matches!(
        err,
        CliError::InvalidArgument {
            field: ARG_SEARCH_TEXT,
            ..
        }
    ));
}

#[rstest]
fn search_requires_access_token() {
    let err = SearchConfig::try_from(search_args(Some("Lyon"), None))
        .expect_err("missing token should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_ACCESS_TOKEN);
            assert_eq!(env, ENV_ACCESS_TOKEN);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn search_config_fills_defaults() {
    let config = SearchConfig::try_from(search_args(Some("Lyon"), Some("pk.test")))
        .expect("config should build");

    assert_eq!(config.text, "Lyon");
    assert_eq!(config.options.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.options.source, DEFAULT_SOURCE);
    assert_eq!(config.options.access_token, "pk.test");
    assert!(config.options.proximity.is_empty());
    assert_eq!(config.select, None);
    assert_eq!(config.transport.timeout, Duration::from_secs(30));
    assert_eq!(config.log_level, LogLevel::Warn);
}

#[rstest]
#[case(None, Duration::from_secs(30))]
#[case(Some(5), Duration::from_secs(5))]
fn transport_timeout_defaults_and_overrides(
    #[case] timeout_secs: Option<u64>,
    #[case] expected: Duration,
) {
    let transport = transport_config(timeout_secs).expect("valid timeout");
    assert_eq!(transport.timeout, expected);
}

#[rstest]
fn zero_timeout_is_rejected() {
    let err = transport_config(Some(0)).expect_err("zero timeout should error");
    assert!(matches!(
        err,
        CliError::InvalidArgument {
            field: ARG_TIMEOUT_SECS,
            ..
        }
    ));
}

#[rstest]
fn optimize_config_defaults_solver_and_profile() {
    let config = OptimizeConfig::try_from(optimize_args()).expect("config should build");

    assert_eq!(config.params.solver, DEFAULT_SOLVER);
    assert_eq!(config.params.profile, DEFAULT_PROFILE);
    assert_eq!(config.optimize_url, "http://solver.test/optimize");
}

#[rstest]
#[case::waypoints(ARG_WAYPOINTS, ENV_OPTIMIZE_WAYPOINTS)]
#[case::route_url(ARG_ROUTE_URL, ENV_OPTIMIZE_ROUTE_URL)]
#[case::optimize_url(ARG_OPTIMIZE_URL, ENV_OPTIMIZE_OPTIMIZE_URL)]
fn optimize_config_reports_missing_options(
    #[case] missing: &'static str,
    #[case] expected_env: &'static str,
) {
    let mut args = optimize_args();
    match missing {
        ARG_WAYPOINTS => args.waypoints = None,
        ARG_ROUTE_URL => args.route_url = None,
        _ => args.optimize_url = None,
    }

    let err = OptimizeConfig::try_from(args).expect_err("missing option should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, missing);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn route_config_requires_route_url() {
    let args = RouteArgs {
        waypoints: Some("trip.json".into()),
        ..RouteArgs::default()
    };

    let err = RouteConfig::try_from(args).expect_err("missing route url should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_ROUTE_URL);
            assert_eq!(env, ENV_ROUTE_ROUTE_URL);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "solver": "vrp",
            "profile": "cycling",
            "route_url": "http://from-file/route",
        }),
        None,
    );
    composer.push_environment(json!({
        "route_url": "http://from-env/route",
        "optimize_url": "http://from-env/optimize",
    }));
    composer.push_cli(json!({
        "waypoints": "trip.json",
        "solver": "tsp-fast",
    }));

    let merged = OptimizeArgs::merge_from_layers(composer.layers()).expect("layers should merge");
    let config = OptimizeConfig::try_from(merged).expect("merged config should build");

    assert_eq!(config.waypoints, "trip.json");
    assert_eq!(config.route_url, "http://from-env/route");
    assert_eq!(config.optimize_url, "http://from-env/optimize");
    assert_eq!(config.params.solver, "tsp-fast");
    assert_eq!(config.params.profile, "cycling");
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "timeout_secs": "soon" }));

    let err = OptimizeArgs::merge_from_layers(composer.layers())
        .map_err(CliError::from)
        .expect_err("invalid layer should fail");
    assert!(matches!(err, CliError::Configuration(_)));
}

#[rstest]
fn cli_parses_search_flags() {
    let cli = Cli::try_parse_from([
        "roamer",
        "search",
        "Lyon",
        "--access-token",
        "pk.test",
        "--proximity",
        "4.8,45.7",
        "--log-level",
        "warning",
    ])
    .expect("arguments should parse");

    let Command::Search(args) = cli.command else {
        panic!("expected search command");
    };
    assert_eq!(args.text.as_deref(), Some("Lyon"));
    assert_eq!(args.proximity.as_deref(), Some("4.8,45.7"));
    assert_eq!(args.log_level, Some(LogLevel::Warn));
}

#[rstest]
#[case(LogLevel::Off, LevelFilter::Off)]
#[case(LogLevel::Error, LevelFilter::Error)]
#[case(LogLevel::Info, LevelFilter::Info)]
#[case(LogLevel::Trace, LevelFilter::Trace)]
fn log_levels_map_to_filters(#[case] level: LogLevel, #[case] expected: LevelFilter) {
    assert_eq!(level.to_filter(), expected);
}

#[rstest]
fn log_level_accepts_warning_alias() {
    let level = LogLevel::from_str("warning", true).expect("alias should parse");
    assert_eq!(level, LogLevel::Warn);
}

#[rstest]
fn load_waypoints_keeps_unlocated_entries() {
    let (_tmp, root) = temp_root();
    let path = root.join("trip.json");
    write_utf8(
        &path,
        br#"[{"id": 1, "lat": 45.76, "lon": 4.84, "index": 0}, {"id": 2, "index": 1, "label": "TBD"}]"#,
    );

    let waypoints = load_waypoints(&path).expect("waypoints should decode");

    assert_eq!(waypoints.len(), 2);
    assert_eq!(waypoints[0], Waypoint::new(WaypointId(1), 45.76, 4.84, 0));
    assert!(!waypoints[1].is_located());
    assert_eq!(waypoints[1].label.as_deref(), Some("TBD"));
}

#[rstest]
fn load_waypoints_rejects_invalid_json() {
    let (_tmp, root) = temp_root();
    let path = root.join("trip.json");
    write_utf8(&path, b"{ not valid json");

    let err = load_waypoints(&path).expect_err("invalid json should error");
    match err {
        CliError::ParseWaypoints { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseWaypoints, found {other:?}"),
    }
}

#[rstest]
fn load_waypoints_reports_missing_file() {
    let (_tmp, root) = temp_root();
    let path = root.join("absent.json");

    let err = load_waypoints(&path).expect_err("missing file should error");
    assert!(matches!(err, CliError::OpenWaypoints { .. }));
}

#[rstest]
fn require_existing_rejects_directories() {
    let (_tmp, root) = temp_root();
    let path = root.join("trip.json");
    std::fs::create_dir(path.as_std_path()).expect("create directory");

    let err = require_existing(&path, ARG_WAYPOINTS).expect_err("directory should fail");
    match err {
        CliError::MissingSourceFile { field, path: reported } => {
            assert_eq!(field, ARG_WAYPOINTS);
            assert_eq!(reported, path);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn write_json_appends_newline() {
    let mut buffer = Vec::new();
    write_json(&mut buffer, &json!({ "ok": true })).expect("write should succeed");

    let text = String::from_utf8(buffer).expect("utf-8 output");
    assert!(text.ends_with("}\n"));
}

#[rstest]
fn search_reports_authoritative_failure() {
    let services = StubServices {
        search_failure: Some((
            "Lyon".to_owned(),
            ServiceCallError::Rejected {
                code: "InvalidToken".to_owned(),
                message: "bad token".to_owned(),
            },
        )),
        ..StubServices::default()
    };
    let config = SearchConfig::try_from(search_args(Some("Lyon"), Some("pk.bad")))
        .expect("config should build");
    let mut stdout = Vec::new();

    let err = run_search_with(&config, &services, &mut stdout).expect_err("search should fail");

    assert!(matches!(err, CliError::Search(ServiceCallError::Rejected { .. })));
    assert!(stdout.is_empty());
}

#[rstest]
fn search_with_no_matches_prints_empty_list() {
    let services = StubServices::default();
    let config = SearchConfig::try_from(search_args(Some("Nowhere"), Some("pk.test")))
        .expect("config should build");
    let mut stdout = Vec::new();

    run_search_with(&config, &services, &mut stdout).expect("search should succeed");

    let results: Vec<SearchResult> =
        serde_json::from_slice(&stdout).expect("output should be JSON");
    assert!(results.is_empty());
}

#[rstest]
fn optimize_reports_path_failure_after_reorder() {
    let (_tmp, root) = temp_root();
    let path = root.join("trip.json");
    write_waypoints(&path, &located_waypoints());
    let services = StubServices {
        order: Ok(vec![2, 0, 1]),
        route: Err(ServiceCallError::Timeout {
            url: "http://router.test/route".to_owned(),
            timeout_secs: 30,
        }),
        ..StubServices::default()
    };
    let mut args = optimize_args();
    args.waypoints = Some(path);
    let config = OptimizeConfig::try_from(args).expect("config should build");
    let mut stdout = Vec::new();

    let err = run_optimize_with(&config, &services, &mut stdout).expect_err("path should fail");

    assert!(matches!(
        err,
        CliError::Pipeline(PipelineError::PathFetch { .. })
    ));
    assert_eq!(
        services.built.borrow().as_slice(),
        [
            "router http://router.test/route".to_owned(),
            "optimizer http://solver.test/optimize".to_owned(),
        ]
    );
}

#[rstest]
fn trip_output_round_trips_route() {
    let output = TripOutput {
        waypoints: located_waypoints(),
        route: default_route(),
    };
    let payload = serde_json::to_string(&output).expect("serialize output");
    let decoded: TripOutput = serde_json::from_str(&payload).expect("decode output");
    assert_eq!(decoded, output);
}
