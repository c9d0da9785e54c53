//! Connection setup and embedded migrations.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::path::Path;
use tracing::{debug, info};
use vermeer_error::{HistoryError, HistoryErrorKind, HistoryResult};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Open (creating if needed) the history database at `path`.
///
/// Parent directories are created. The connection waits on a locked
/// database instead of failing immediately.
pub fn establish_connection(path: &Path) -> HistoryResult<SqliteConnection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            HistoryError::new(HistoryErrorKind::Connection(format!(
                "Failed to create {}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    let url = path.to_string_lossy();
    let mut conn = SqliteConnection::establish(&url)?;
    conn.batch_execute("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")?;
    debug!(path = %path.display(), "Opened history database");
    Ok(conn)
}

/// Open a private in-memory database.
pub fn establish_in_memory() -> HistoryResult<SqliteConnection> {
    Ok(SqliteConnection::establish(":memory:")?)
}

/// Run pending migrations.
pub fn run_migrations(conn: &mut SqliteConnection) -> HistoryResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| HistoryError::new(HistoryErrorKind::Migration(e.to_string())))?;

    if !applied.is_empty() {
        info!(count = applied.len(), "Applied history migrations");
    }
    Ok(())
}
