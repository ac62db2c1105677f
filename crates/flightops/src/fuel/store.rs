//! Persistent storage for the fuel module.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::Result;
use crate::storage;

use super::FuelRecord;

/// SQL statement to create the fuel data table.
const CREATE_FUELDATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS fueldata (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fuel_capacity REAL NOT NULL,
    burn_rate REAL NOT NULL,
    cruising_speed REAL NOT NULL,
    estimated_range REAL NOT NULL,
    date TEXT NOT NULL
)
";

/// All schema creation statements in order.
const SCHEMA_STATEMENTS: &[&str] = &[CREATE_FUELDATA_TABLE];

/// Storage engine for fuel and range estimates.
///
/// The estimated range column holds the value computed at insert time; it is
/// never recomputed from the other columns on the way out.
#[derive(Debug)]
pub struct FuelStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl FuelStore {
    /// Open or create the fuel database at the given path.
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

    /// Insert a fuel record and return its generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, record: &FuelRecord) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO fueldata (fuel_capacity, burn_rate, cruising_speed, estimated_range, date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                record.fuel_capacity,
                record.burn_rate,
                record.cruising_speed,
                record.estimated_range,
                record.date,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted fuel record with id {}", id);
        Ok(id)
    }

    /// List all fuel records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all_records(&self) -> Result<Vec<FuelRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, fuel_capacity, burn_rate, cruising_speed, estimated_range, date
            FROM fueldata ORDER BY id ASC
            ",
        )?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Count fuel records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM fueldata", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Convert a database row to a FuelRecord.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<FuelRecord> {
        Ok(FuelRecord {
            id: Some(row.get(0)?),
            fuel_capacity: row.get(1)?,
            burn_rate: row.get(2)?,
            cruising_speed: row.get(3)?,
            estimated_range: row.get(4)?,
            date: row.get(5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> FuelStore {
        FuelStore::open_in_memory().expect("failed to create test store")
    }

    fn sample_record() -> FuelRecord {
        FuelRecord::estimated(100.0, 20.0, 500.0, "2025-05-01".to_string())
            .expect("positive burn rate")
    }

    #[test]
    fn test_insert_and_list_roundtrip() {
        let store = create_test_store();
        let id = store.insert(&sample_record()).unwrap();
        assert!(id >= 1);

        let records = store.all_records().unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, Some(id));
        assert!((record.fuel_capacity - 100.0).abs() < f64::EPSILON);
        assert!((record.burn_rate - 20.0).abs() < f64::EPSILON);
        assert!((record.cruising_speed - 500.0).abs() < f64::EPSILON);
        assert!((record.estimated_range - 2500.0).abs() < f64::EPSILON);
        assert_eq!(record.date, "2025-05-01");
    }

    #[test]
    fn test_listing_follows_insertion_order() {
        let store = create_test_store();
        for speed in [400.0, 500.0, 600.0] {
            let record = FuelRecord::estimated(100.0, 20.0, speed, "2025-05-01".to_string())
                .expect("positive burn rate");
            store.insert(&record).unwrap();
        }

        let speeds: Vec<f64> = store
            .all_records()
            .unwrap()
            .into_iter()
            .map(|r| r.cruising_speed)
            .collect();
        assert_eq!(speeds, [400.0, 500.0, 600.0]);
    }

    #[test]
    fn test_count() {
        let store = create_test_store();
        assert_eq!(store.count().unwrap(), 0);
        store.insert(&sample_record()).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("flightops_fuel_test_{}.db", std::process::id()));

        let store = FuelStore::open(&db_path).unwrap();
        store.insert(&sample_record()).unwrap();
        drop(store);

        let store = FuelStore::open(&db_path).unwrap();
        assert_eq!(store.path(), db_path);
        assert_eq!(store.count().unwrap(), 1);

        drop(store);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }
}
