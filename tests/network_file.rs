mod common;

use common::NetworkBuilder;
use netomata_lib::{run, AppConfig, EvolveError, NetworkFile, NetworkFileError};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("netomata_{}_{name}", std::process::id()))
}

#[test]
fn test_save_load_and_run() {
    let network = NetworkBuilder::ring(21, 1)
        .with_activity(10, 1.0)
        .into_network_file();
    let path = temp_path("ring.json");
    network.save(&path).unwrap();
    let loaded = NetworkFile::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, network);

    let config = AppConfig::from_toml(
        r#"
        [run]
        timesteps = 4

        [rule]
        kind = "nks"
        number = 30
        "#,
    )
    .unwrap();
    let history = run(&loaded, &config).unwrap();
    assert_eq!(
        common::render(history.row(3)),
        ".......##.####......."
    );
}

#[test]
fn test_missing_file() {
    let err = NetworkFile::load(temp_path("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, NetworkFileError::FileSystem(_)));
}

#[test]
fn test_non_numeric_entry_reported_by_run() {
    let network = NetworkFile::parse(
        r#"{
            "initial_conditions": [1, 0],
            "adjacency_matrix": [[0, 1], [true, "x"]]
        }"#,
    )
    .unwrap();
    let err = run(&network, &AppConfig::default()).unwrap_err();
    let evolve_err = err.downcast_ref::<EvolveError>().unwrap();
    match evolve_err {
        EvolveError::Conversion { location, found } => {
            assert_eq!(location, "adjacency_matrix[1][1]");
            assert_eq!(*found, "string");
        }
        other => panic!("Unexpected error: {other}"),
    }
}

#[test]
fn test_past_conditions_from_file() {
    let network = NetworkFile::parse(
        r#"{
            "initial_conditions": [0],
            "adjacency_matrix": [[1]],
            "past_conditions": [[4], [2]]
        }"#,
    )
    .unwrap();
    let mut config = AppConfig::default();
    config.run.timesteps = 2;
    // sum rule ignores the past; the run only needs the rows to be accepted
    let history = run(&network, &config).unwrap();
    assert_eq!(history.rows(), &[vec![0.0], vec![0.0]]);

    let mismatched = NetworkFile {
        past_conditions: vec![vec![serde_json::json!(1), serde_json::json!(2)]],
        ..network
    };
    let err = run(&mismatched, &config).unwrap_err();
    assert!(err.to_string().contains("past_conditions"));
}

#[test]
fn test_demo_files_run() {
    let demos = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos");
    let network = NetworkFile::load(demos.join("rule30_ring.json")).unwrap();
    let config =
        AppConfig::from_toml(&std::fs::read_to_string(demos.join("rule30.toml")).unwrap()).unwrap();

    let history = run(&network, &config).unwrap();
    assert_eq!(history.timesteps(), 10);
    assert_eq!(common::render(history.row(1)), ".........###.........");
}
