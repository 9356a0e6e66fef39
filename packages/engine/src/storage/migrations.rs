//! Versioned schema migrations
//!
//! Each migration runs in its own transaction and is recorded in
//! `schema_migrations`.

use rusqlite::Connection;

use crate::storage::{StorageError, StorageResult};

pub const CURRENT_SCHEMA_VERSION: i32 = 2;

#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i32,
    pub name: String,
    pub sql: String,
}

impl Migration {
    pub fn new(version: i32, name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
            sql: sql.into(),
        }
    }
}

/// All migrations, ordered by version
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "weights and case log",
            r#"
            CREATE TABLE IF NOT EXISTS network_weight (
                position INTEGER PRIMARY KEY,
                weight REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_case (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                last_predicted_interval REAL NOT NULL
                    CHECK (last_predicted_interval >= 0.0 AND last_predicted_interval <= 1.0),
                review_interval REAL NOT NULL
                    CHECK (review_interval >= 0.0 AND review_interval <= 1.0),
                repetition REAL NOT NULL
                    CHECK (repetition >= 0.0 AND repetition <= 1.0),
                grade REAL NOT NULL
                    CHECK (grade >= 0.0 AND grade <= 1.0),
                target_interval REAL NOT NULL
                    CHECK (target_interval >= 0.0 AND target_interval <= 1.0)
            );
            "#,
        ),
        Migration::new(
            2,
            "case log recency index",
            r#"
            CREATE INDEX IF NOT EXISTS idx_user_case_created
                ON user_case(created_at DESC, id DESC);
            "#,
        ),
    ]
}

fn ensure_migrations_table(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at INTEGER NOT NULL
        );
        "#,
    )
    .map_err(|e| StorageError::Migration(format!("failed to create migrations table: {}", e)))?;

    Ok(())
}

/// Highest applied version, 0 for a fresh database
pub fn get_current_version(conn: &Connection) -> i32 {
    if ensure_migrations_table(conn).is_err() {
        return 0;
    }

    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

fn get_applied_versions(conn: &Connection) -> StorageResult<Vec<i32>> {
    ensure_migrations_table(conn)?;

    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .filter_map(|r| r.ok())
        .collect();

    Ok(versions)
}

fn record_migration(conn: &Connection, migration: &Migration) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.name,
            chrono::Utc::now().timestamp()
        ],
    )?;

    Ok(())
}

/// Applies every pending migration, returning the resulting version
pub fn run_migrations(conn: &Connection) -> StorageResult<i32> {
    ensure_migrations_table(conn)?;

    let applied_versions = get_applied_versions(conn)?;
    let mut final_version = get_current_version(conn);

    tracing::debug!(
        current = final_version,
        target = CURRENT_SCHEMA_VERSION,
        "checking schema migrations"
    );

    for migration in get_migrations() {
        if applied_versions.contains(&migration.version) {
            continue;
        }

        match execute_migration_in_transaction(conn, &migration) {
            Ok(()) => {
                final_version = migration.version;
                tracing::info!(version = migration.version, name = %migration.name, "migration applied");
            }
            Err(e) => {
                tracing::error!(version = migration.version, error = %e, "migration failed");
                return Err(e);
            }
        }
    }

    Ok(final_version)
}

fn execute_migration_in_transaction(conn: &Connection, migration: &Migration) -> StorageResult<()> {
    conn.execute("BEGIN IMMEDIATE", [])?;

    match conn.execute_batch(&migration.sql) {
        Ok(()) => {
            if let Err(e) = record_migration(conn, migration) {
                conn.execute("ROLLBACK", []).ok();
                return Err(e);
            }

            conn.execute("COMMIT", [])?;
            Ok(())
        }
        Err(e) => {
            conn.execute("ROLLBACK", []).ok();
            Err(StorageError::Migration(format!(
                "migration v{} failed: {}",
                migration.version, e
            )))
        }
    }
}
