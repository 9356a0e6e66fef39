//! SQLite-backed model store

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use interval_net_algo::Exemplar;
use rusqlite::{params, Connection};

use crate::storage::{migrations, ModelStore, StorageError, StorageResult};

pub struct SqliteStore {
    connection: Mutex<Connection>,
    db_path: String,
}

impl SqliteStore {
    /// Opens (or creates) the database file and runs migrations
    ///
    /// WAL mode is enabled so readers of the case log never block the
    /// weight rewrite.
    pub fn new<P: AsRef<Path>>(db_path: P) -> StorageResult<Self> {
        let path_str = db_path.as_ref().to_string_lossy().to_string();
        let connection = Connection::open(&db_path)?;

        connection.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;

        let store = Self {
            connection: Mutex::new(connection),
            db_path: path_str,
        };
        store.initialize()?;

        tracing::info!(path = %store.db_path, "sqlite model store opened");
        Ok(store)
    }

    /// In-memory database (for testing)
    pub fn in_memory() -> StorageResult<Self> {
        let connection = Connection::open_in_memory()?;

        let store = Self {
            connection: Mutex::new(connection),
            db_path: ":memory:".to_string(),
        };
        store.initialize()?;

        Ok(store)
    }

    pub fn initialize(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        migrations::run_migrations(&conn)?;
        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.db_path
    }

    fn get_connection(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|e| StorageError::LockError(e.to_string()))
    }
}

impl ModelStore for SqliteStore {
    fn load_weights(&self) -> StorageResult<Vec<f64>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare("SELECT position, weight FROM network_weight ORDER BY position")?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut weights = Vec::with_capacity(rows.len());
        for (expected, (position, weight)) in rows.into_iter().enumerate() {
            if position != expected as i64 {
                return Err(StorageError::Corrupt(format!(
                    "weight positions are not contiguous: expected {}, found {}",
                    expected, position
                )));
            }
            weights.push(weight);
        }

        Ok(weights)
    }

    fn save_weights(&self, weights: &[f64]) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM network_weight", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO network_weight (position, weight) VALUES (?1, ?2)")?;
            for (position, weight) in weights.iter().enumerate() {
                stmt.execute(params![position as i64, weight])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn load_recent_cases(&self, limit: usize) -> StorageResult<Vec<Exemplar>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT last_predicted_interval, review_interval, repetition, grade, target_interval
             FROM user_case
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;

        let cases = stmt
            .query_map(params![limit as i64], |row| {
                Ok(Exemplar {
                    last_predicted_interval: row.get(0)?,
                    review_interval: row.get(1)?,
                    repetition: row.get(2)?,
                    grade: row.get(3)?,
                    target_interval: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cases)
    }

    fn append_case(&self, case: &Exemplar) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO user_case
                (created_at, last_predicted_interval, review_interval, repetition, grade, target_interval)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
                case.last_predicted_interval,
                case.review_interval,
                case.repetition,
                case.grade,
                case.target_interval,
            ],
        )?;
        Ok(())
    }

    fn case_count(&self) -> StorageResult<u64> {
        let conn = self.get_connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM user_case", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}
