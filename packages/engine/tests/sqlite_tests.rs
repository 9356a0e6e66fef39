//! Engine restarts against an on-disk SQLite store

mod common;

use std::sync::Arc;

use interval_net_algo::normalize_interval;
use interval_net_engine::{Engine, EngineConfig, ModelStore, SqliteStore};
use tempfile::TempDir;

use common::review;

fn config_for(dir: &TempDir, seed: u64) -> EngineConfig {
    let mut config = EngineConfig::with_seed(seed);
    config.database_path = dir.path().join("interval-net.db");
    config.training.epoch_factor = 2;
    config
}

fn open(config: &EngineConfig) -> Engine {
    let store = SqliteStore::new(&config.database_path).expect("store opens");
    Engine::open(config.clone(), store).expect("engine opens")
}

#[test]
fn test_model_survives_restart() {
    let dir = TempDir::new().expect("temp dir");
    let config = config_for(&dir, 7);

    let (weights, history, prediction) = {
        let engine = open(&config);
        for grade in 0..6 {
            let mut input = review(grade, 10.0, 12.0 + grade as f64);
            input.repetition = grade as f64;
            engine.record_review(input).expect("review recorded");
        }
        (
            engine.weights(),
            engine.history(),
            engine.predict_next_interval(12.0, 14.0, 3.0, 4.0),
        )
    };

    // a different seed must not matter once weights exist
    let reopened = open(&config_for(&dir, 99));

    assert_eq!(reopened.weights(), weights);
    assert_eq!(reopened.history(), history);
    assert_eq!(reopened.predict_next_interval(12.0, 14.0, 3.0, 4.0), prediction);
    assert_eq!(reopened.persisted_case_count().expect("count"), 6);
}

#[test]
fn test_first_open_persists_initial_weights() {
    let dir = TempDir::new().expect("temp dir");
    let config = config_for(&dir, 3);

    let initial = open(&config).weights();

    let store = SqliteStore::new(&config.database_path).expect("store opens");
    assert_eq!(store.load_weights().expect("load weights"), initial);
    assert_eq!(store.case_count().expect("count"), 0);
}

#[test]
fn test_restart_merges_repeated_cases() {
    let dir = TempDir::new().expect("temp dir");
    let config = config_for(&dir, 5);

    {
        let engine = open(&config);
        engine.record_review(review(4, 10.0, 10.0)).expect("review recorded");
        engine.record_review(review(4, 10.0, 30.0)).expect("review recorded");
        // both reviews stay separate while running
        assert_eq!(engine.history().len(), 2);
    }

    let reopened = open(&config);
    let history = reopened.history();

    assert_eq!(history.len(), 1);
    let expected = (normalize_interval(10.0) + normalize_interval(30.0)) / 2.0;
    assert!((history[0].target_interval - expected).abs() < 1e-12);
}

#[test]
fn test_restart_keeps_newest_window() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = config_for(&dir, 11);
    config.history_limit = 5;
    config.training.epoch_factor = 1;

    let store = Arc::new(SqliteStore::new(&config.database_path).expect("store opens"));
    let live_history = {
        let engine = Engine::open(config.clone(), Arc::clone(&store)).expect("engine opens");
        for i in 0..8 {
            let mut input = review(4, 10.0, 10.0);
            input.repetition = i as f64;
            engine.record_review(input).expect("review recorded");
        }
        engine.history()
    };

    assert_eq!(store.case_count().expect("count"), 8);
    let reopened = Engine::open(config, Arc::clone(&store)).expect("engine opens");
    assert_eq!(reopened.history(), live_history);
}
