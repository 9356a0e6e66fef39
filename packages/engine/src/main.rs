use std::process::ExitCode;

use clap::{Parser, Subcommand};

use interval_net_engine::config::EngineConfig;
use interval_net_engine::logging::init_tracing;
use interval_net_engine::{Engine, EngineResult, PredictionInput, ReviewInput, SqliteStore};

#[derive(Parser)]
#[command(name = "interval-net", version, about = "Neural spaced-repetition scheduler")]
struct Cli {
    /// Database file (overrides INTERVAL_NET_DB)
    #[arg(long, global = true)]
    db: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict the next interval in days
    Predict {
        last_predicted_interval: f64,
        review_interval: f64,
        repetition: f64,
        grade: f64,
    },
    /// Record a completed review and retrain
    Review {
        last_predicted_interval: f64,
        review_interval: f64,
        repetition: f64,
        grade: f64,
        predicted_interval: f64,
        actual_interval: f64,
        #[arg(allow_negative_numbers = true)]
        actual_grade: i32,
    },
    /// Training statistics
    Stats,
    /// Current weights in persistence order
    Weights,
}

fn run(cli: Cli, config: EngineConfig) -> EngineResult<serde_json::Value> {
    let store = SqliteStore::new(&config.database_path)?;
    let engine = Engine::open(config, store)?;

    let value = match cli.command {
        Command::Predict {
            last_predicted_interval,
            review_interval,
            repetition,
            grade,
        } => {
            let input = PredictionInput {
                last_predicted_interval,
                review_interval,
                repetition,
                grade,
            };
            input.validate()?;
            serde_json::json!({ "intervalDays": engine.predict(&input) })
        }
        Command::Review {
            last_predicted_interval,
            review_interval,
            repetition,
            grade,
            predicted_interval,
            actual_interval,
            actual_grade,
        } => {
            let input = ReviewInput {
                last_predicted_interval,
                review_interval,
                repetition,
                grade,
                predicted_interval,
                actual_interval,
                actual_grade,
            };
            input.validate()?;
            let report = engine.record_review(input)?;
            serde_json::to_value(report).unwrap_or_default()
        }
        Command::Stats => serde_json::to_value(engine.stats()).unwrap_or_default(),
        Command::Weights => serde_json::json!(engine.weights()),
    };

    Ok(value)
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = EngineConfig::from_env();
    if let Some(ref db) = cli.db {
        config.database_path = db.clone();
    }
    let _log_guard = init_tracing(&config.log_level);

    match run(cli, config) {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
