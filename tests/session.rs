use std::{fmt::Write as _, fs, path::Path};

use bpnnet::config::TrainingConfig;
use bpnnet::data::PartitionError;
use bpnnet::feedforward::{Network, Topology};
use bpnnet::session::{self, SessionError};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;

/// 50 rows of the AND gate truth table.
fn write_and_data(path: &Path) {
    let mut text = String::new();
    for i in 0..50 {
        let (a, b) = (i % 2, (i / 2) % 2);
        writeln!(text, "{},{},{}", a, b, a & b).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn config(dir: &Path, partitioning: serde_json::Value) -> TrainingConfig {
    let json = json!({
        "data": { "path": dir.join("data.csv"), "inputs": 2, "outputs": 1 },
        "hidden": 4,
        "learning_rate": 0.5,
        "momentum": 0.5,
        "max_epochs": 30,
        "desired_accuracy": 100,
        "partitioning": partitioning,
        "log": { "path": dir.join("log.csv"), "resolution": 10 },
        "save_weights": dir.join("weights.csv"),
        "seed": 11
    });
    TrainingConfig::from_json(&json.to_string()).unwrap()
}

#[test]
fn growing_session_trains_logs_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    write_and_data(&dir.path().join("data.csv"));

    let config = config(
        dir.path(),
        json!({ "kind": "growing", "step_percent": 50 }),
    );
    let outcome = session::run(&config).unwrap();
    assert_eq!(outcome.reports.len(), 2);
    assert!(outcome.reports[0].epochs >= 1);
    for report in &outcome.reports {
        assert!(report.epochs <= 30);
    }

    let log = fs::read_to_string(dir.path().join("log.csv")).unwrap();
    let mut lines = log.lines();
    assert_eq!(
        lines.next(),
        Some("Epoch,Training Set Accuracy,Generalization Set Accuracy,Training Set MSE,Generalization Set MSE")
    );
    let rows: Vec<Vec<&str>> = lines.map(|l| l.split(',').collect()).collect();
    // Epoch 0 and the final row of the first run, the final row of the second at least
    assert!(rows.len() >= 3);
    assert_eq!(rows[0][0], "0");
    assert!(rows.iter().all(|r| r.len() == 5));

    let mut saved = Network::new(Topology::new(2, 4, 1), &mut StdRng::seed_from_u64(0)).unwrap();
    saved.load_weights(dir.path().join("weights.csv")).unwrap();
    assert_eq!(saved.weights(), outcome.network.weights());
}

#[test]
fn seeded_sessions_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    write_and_data(&dir.path().join("data.csv"));

    let config = config(
        dir.path(),
        json!({ "kind": "windowing", "window_size": 10, "step_size": 10 }),
    );
    let first = session::run(&config).unwrap();
    let second = session::run(&config).unwrap();

    // 30 training entries: windows at 0, 10 and 20
    assert_eq!(first.reports.len(), 3);
    assert_eq!(first.reports, second.reports);
    assert_eq!(first.network.weights(), second.network.weights());
}

#[test]
fn initial_weights_are_loaded() {
    let dir = tempfile::tempdir().unwrap();
    write_and_data(&dir.path().join("data.csv"));

    let start = Network::from_weights(Topology::new(2, 4, 1), &[0.0; 17]).unwrap();
    start.save_weights(dir.path().join("start.csv")).unwrap();

    let mut config = config(dir.path(), json!({ "kind": "static" }));
    config.initial_weights = Some(dir.path().join("start.csv"));
    config.max_epochs = 0;

    let outcome = session::run(&config).unwrap();
    assert_eq!(outcome.reports.len(), 1);
    assert_eq!(outcome.reports[0].epochs, 0);
    assert_eq!(outcome.network.weights(), &[0.0; 17]);
}

#[test]
fn oversized_window_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_and_data(&dir.path().join("data.csv"));

    let config = config(
        dir.path(),
        json!({ "kind": "windowing", "window_size": 40, "step_size": 10 }),
    );
    assert!(matches!(
        session::run(&config),
        Err(SessionError::Partition(PartitionError::BadWindow { .. }))
    ));
}

#[test]
fn unbounded_growing_step_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_and_data(&dir.path().join("data.csv"));

    let config = config(
        dir.path(),
        json!({ "kind": "growing", "step_percent": 1e-300 }),
    );
    assert!(matches!(
        session::run(&config),
        Err(SessionError::Partition(PartitionError::TooManySets { .. }))
    ));
    assert!(!dir.path().join("weights.csv").exists());
}

#[test]
fn missing_data_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), json!({ "kind": "static" }));
    assert!(matches!(
        session::run(&config),
        Err(SessionError::Data(_))
    ));
    assert!(!dir.path().join("weights.csv").exists());
}
