//! Database connection utilities.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;

use crate::StoreError;

/// Opens (or creates) the sightings `SQLite` database and ensures the
/// schema exists.
///
/// # Errors
///
/// Returns [`StoreError`] if the database cannot be opened or schema
/// creation fails.
pub async fn open_db(path: &Path) -> Result<Box<dyn Database>, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| StoreError::Conversion {
        message: format!("Failed to open SQLite database: {e}"),
    })?;

    ensure_schema(db.as_ref()).await?;

    log::info!("Opened sightings database at {}", path.display());

    Ok(db)
}

/// Creates the sightings table and its range-scan index if they don't
/// already exist.
async fn ensure_schema(db: &dyn Database) -> Result<(), StoreError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS sightings (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            latitude    REAL NOT NULL,
            longitude   REAL NOT NULL,
            sighted_at  TEXT NOT NULL,
            reported_at TEXT NOT NULL,
            details     TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_sightings_sighted_at
         ON sightings (sighted_at)",
    )
    .await?;

    Ok(())
}
