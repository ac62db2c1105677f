//! Shared storage plumbing for the module stores.
//!
//! Each domain module owns its own `SQLite` database file. This module holds
//! the connection and schema helpers they share: opening a database (creating
//! parent directories as needed) and idempotently applying a schema.

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Open or create a database at the given path.
///
/// Creates the parent directories and database file if they don't exist.
/// Safe to call on every program start.
///
/// # Errors
///
/// Returns an error if the directory or database cannot be created or opened.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    debug!("Opening database at {}", path.display());
    let conn = Connection::open(path).map_err(|source| Error::DatabaseOpen {
        path: path.to_path_buf(),
        source,
    })?;

    // Enable WAL mode for better concurrent read performance
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

    info!("Database opened successfully at {}", path.display());
    Ok(conn)
}

/// Apply a schema to an open connection.
///
/// Every statement uses `CREATE ... IF NOT EXISTS`, so re-running this on an
/// existing database neither errors nor touches existing rows.
///
/// # Errors
///
/// Returns an error if a schema statement fails.
pub fn initialize_schema(conn: &Connection, statements: &[&str]) -> Result<()> {
    for statement in statements {
        conn.execute(statement, [])?;
    }
    Ok(())
}
