//! Persistent storage for the weather module.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::Result;
use crate::storage;

use super::{ClearanceSummary, WeatherRecord};

/// SQL statement to create the weather table.
const CREATE_WEATHER_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS weather (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    wind_speed REAL NOT NULL,
    temperature REAL NOT NULL,
    humidity REAL NOT NULL,
    visibility REAL NOT NULL,
    date TEXT NOT NULL,
    clearance TEXT NOT NULL
)
";

/// All schema creation statements in order.
const SCHEMA_STATEMENTS: &[&str] = &[CREATE_WEATHER_TABLE];

/// Storage engine for weather observations and their clearance decisions.
///
/// The clearance column holds the decision text evaluated at insert time;
/// it is never recomputed from the other columns on the way out.
#[derive(Debug)]
pub struct WeatherStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl WeatherStore {
    /// Open or create the weather database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = storage::open_database(&path)?;
        storage::initialize_schema(&conn, SCHEMA_STATEMENTS)?;
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        storage::initialize_schema(&conn, SCHEMA_STATEMENTS)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a weather record and return its generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, record: &WeatherRecord) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO weather (wind_speed, temperature, humidity, visibility, date, clearance)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                record.wind_speed,
                record.temperature,
                record.humidity,
                record.visibility,
                record.date,
                record.clearance,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted weather record with id {}", id);
        Ok(id)
    }

    /// List all weather records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all_records(&self) -> Result<Vec<WeatherRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, wind_speed, temperature, humidity, visibility, date, clearance
            FROM weather ORDER BY id ASC
            ",
        )?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// List the clearance projection (date, wind, visibility, decision) in
    /// insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clearance_summaries(&self) -> Result<Vec<ClearanceSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, wind_speed, visibility, clearance FROM weather ORDER BY id ASC",
        )?;
        let summaries = stmt
            .query_map([], |row| {
                Ok(ClearanceSummary {
                    date: row.get(0)?,
                    wind_speed: row.get(1)?,
                    visibility: row.get(2)?,
                    clearance: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    /// Count weather records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM weather", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Convert a database row to a WeatherRecord.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<WeatherRecord> {
        Ok(WeatherRecord {
            id: Some(row.get(0)?),
            wind_speed: row.get(1)?,
            temperature: row.get(2)?,
            humidity: row.get(3)?,
            visibility: row.get(4)?,
            date: row.get(5)?,
            clearance: row.get(6)?,
        })
    }
}
