//! Focused unit tests covering import CLI configuration.

use super::helpers::{CSV_HEADER, temp_root, write_utf8};
use super::*;
use crate::import::{ImportArgs, ImportConfig, config_from_layers_for_test};
use camino::Utf8PathBuf;
use rstest::rstest;

#[rstest]
fn converting_import_without_csv_errors() {
    let err = ImportConfig::try_from(ImportArgs::default()).expect_err("missing csv should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_IMPORT_CSV);
            assert_eq!(env, ENV_IMPORT_CSV);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn import_config_applies_defaults() {
    let args = ImportArgs {
        csv: Some(Utf8PathBuf::from("stations.csv")),
        ..ImportArgs::default()
    };

    let config = ImportConfig::try_from(args).expect("config should build");
    assert_eq!(config.csv, Utf8PathBuf::from("stations.csv"));
    assert_eq!(config.database, Utf8PathBuf::from(DEFAULT_DATABASE));
    assert_eq!(
        config.nominatim_base_url,
        "https://nominatim.openstreetmap.org"
    );
}

#[rstest]
fn validate_sources_reports_missing_csv() {
    let (_tmp, root) = temp_root();
    let config = ImportConfig {
        csv: root.join("stations.csv"),
        database: root.join("stations.db"),
        nominatim_base_url: "http://localhost:8080".to_owned(),
    };

    let err = config.validate_sources().expect_err("missing csv");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_IMPORT_CSV);
            assert_eq!(path, root.join("stations.csv"));
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_not_file() {
    let (_tmp, root) = temp_root();
    let csv = root.join("stations.csv");
    std::fs::create_dir(&csv).expect("csv directory");
    let config = ImportConfig {
        csv: csv.clone(),
        database: root.join("stations.db"),
        nominatim_base_url: "http://localhost:8080".to_owned(),
    };

    let err = config
        .validate_sources()
        .expect_err("expected directory path to fail validation");
    match err {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_IMPORT_CSV);
            assert_eq!(path, csv);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_does_not_require_database() {
    let (_tmp, root) = temp_root();
    let csv = root.join("stations.csv");
    write_utf8(&csv, CSV_HEADER.as_bytes());
    let config = ImportConfig {
        csv,
        database: root.join("missing").join("stations.db"),
        nominatim_base_url: "http://localhost:8080".to_owned(),
    };

    config.validate_sources().expect("database is created on demand");
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "csv": 42 }));

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

    let (_tmp, root) = temp_root();
    let env_csv = root.join("from-env.csv");
    let cli_database = root.join("from-cli.db");
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "database": root.join("from-file.db").as_str(),
            "nominatim_base_url": "http://from-file:8080",
        }),
        None,
    );
    composer.push_environment(json!({
        "csv": env_csv.as_str(),
        "database": root.join("from-env.db").as_str(),
    }));
    composer.push_cli(json!({
        "database": cli_database.as_str(),
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.csv, env_csv);
    assert_eq!(config.database, cli_database);
    assert_eq!(config.nominatim_base_url, "http://from-file:8080");
}
