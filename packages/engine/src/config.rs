use std::path::PathBuf;

use interval_net_algo::{TrainingConfig, HISTORY_LIMIT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub database_path: PathBuf,
    pub history_limit: usize,
    pub training: TrainingConfig,
    /// Fixed generator seed for weight initialisation and shuffling
    pub seed: Option<u64>,
    /// Initialise and persist random weights when the weight store is empty
    pub seed_empty_weights: bool,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("interval-net.db"),
            history_limit: HISTORY_LIMIT,
            training: TrainingConfig::default(),
            seed: None,
            seed_empty_weights: true,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("INTERVAL_NET_DB") {
            if !val.trim().is_empty() {
                config.database_path = PathBuf::from(val);
            }
        }
        if let Ok(val) = std::env::var("INTERVAL_NET_HISTORY_LIMIT") {
            config.history_limit = val.parse().unwrap_or(HISTORY_LIMIT);
        }
        if let Ok(val) = std::env::var("INTERVAL_NET_EPOCH_FACTOR") {
            config.training.epoch_factor = val.parse().unwrap_or(config.training.epoch_factor);
        }
        if let Ok(val) = std::env::var("INTERVAL_NET_TARGET_RMSE") {
            config.training.target_rmse = val.parse().unwrap_or(config.training.target_rmse);
        }
        if let Ok(val) = std::env::var("INTERVAL_NET_SEED") {
            config.seed = val.parse().ok();
        }
        if let Ok(val) = std::env::var("INTERVAL_NET_SEED_WEIGHTS") {
            config.seed_empty_weights = val.parse().unwrap_or(true);
        }
        config.log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        config
    }

    /// Config for tests: fixed seed, in-memory friendly defaults
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
