//! Persistent storage for the maintenance module.
//!
//! Owns the aircraft register and the maintenance log, both kept in the
//! module's own `SQLite` database file.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::Result;
use crate::storage;

use super::{Aircraft, MaintenanceRecord, MaintenanceStatus};

/// SQL statement to create the aircraft table.
const CREATE_AIRCRAFT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS aircraft (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    model TEXT NOT NULL,
    manufacture_year INTEGER NOT NULL
)
";

/// SQL statement to create the maintenance log table.
const CREATE_MAINTENANCE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS maintenance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    aircraft_id INTEGER NOT NULL,
    description TEXT NOT NULL,
    date TEXT NOT NULL,
    engineer TEXT NOT NULL,
    cost REAL NOT NULL,
    status TEXT NOT NULL,
    FOREIGN KEY (aircraft_id) REFERENCES aircraft(id)
)
";

/// SQL statement to create an index on `aircraft_id` for history lookups.
const CREATE_AIRCRAFT_ID_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_maintenance_aircraft ON maintenance(aircraft_id)
";

/// All schema creation statements in order.
const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_AIRCRAFT_TABLE,
    CREATE_MAINTENANCE_TABLE,
    CREATE_AIRCRAFT_ID_INDEX,
];

/// Storage engine for aircraft and their maintenance history.
#[derive(Debug)]
pub struct MaintenanceStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl MaintenanceStore {
    /// Open or create the maintenance database at the given path.
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

    /// Register an aircraft and return its generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_aircraft(&self, aircraft: &Aircraft) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO aircraft (name, model, manufacture_year) VALUES (?1, ?2, ?3)",
            params![aircraft.name, aircraft.model, aircraft.manufacture_year],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted aircraft with id {}", id);
        Ok(id)
    }

    /// Check whether an aircraft with the given id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn aircraft_exists(&self, id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM aircraft WHERE id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List all registered aircraft in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all_aircraft(&self) -> Result<Vec<Aircraft>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, model, manufacture_year FROM aircraft ORDER BY id ASC",
        )?;
        let aircraft = stmt
            .query_map([], Self::row_to_aircraft)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(aircraft)
    }

    /// Search aircraft by keyword.
    ///
    /// Performs a substring match against name or model; matching either
    /// field is sufficient.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search_aircraft(&self, keyword: &str) -> Result<Vec<Aircraft>> {
        let pattern = format!("%{keyword}%");
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, name, model, manufacture_year
            FROM aircraft WHERE name LIKE ?1 OR model LIKE ?2
            ORDER BY id ASC
            ",
        )?;
        let aircraft = stmt
            .query_map(params![pattern, pattern], Self::row_to_aircraft)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(aircraft)
    }

    /// Count registered aircraft.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn aircraft_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM aircraft", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Log a maintenance record and return its generated id.
    ///
    /// The caller has already verified the referenced aircraft exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_record(&self, record: &MaintenanceRecord) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO maintenance (aircraft_id, description, date, engineer, cost, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                record.aircraft_id,
                record.description,
                record.date,
                record.engineer,
                record.cost,
                record.status.to_string(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted maintenance record with id {}", id);
        Ok(id)
    }

    /// List all maintenance records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all_records(&self) -> Result<Vec<MaintenanceRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, aircraft_id, description, date, engineer, cost, status
            FROM maintenance ORDER BY id ASC
            ",
        )?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// List maintenance records for one aircraft in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn records_for_aircraft(&self, aircraft_id: i64) -> Result<Vec<MaintenanceRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, aircraft_id, description, date, engineer, cost, status
            FROM maintenance WHERE aircraft_id = ?1
            ORDER BY id ASC
            ",
        )?;
        let records = stmt
            .query_map([aircraft_id], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Count maintenance records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn record_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM maintenance", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Convert a database row to an Aircraft.
    fn row_to_aircraft(row: &rusqlite::Row) -> rusqlite::Result<Aircraft> {
        Ok(Aircraft {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            model: row.get(2)?,
            manufacture_year: row.get(3)?,
        })
    }

    /// Convert a database row to a MaintenanceRecord.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<MaintenanceRecord> {
        let status_str: String = row.get(6)?;
        Ok(MaintenanceRecord {
            id: Some(row.get(0)?),
            aircraft_id: row.get(1)?,
            description: row.get(2)?,
            date: row.get(3)?,
            engineer: row.get(4)?,
            cost: row.get(5)?,
            status: MaintenanceStatus::from_stored(&status_str),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> MaintenanceStore {
        MaintenanceStore::open_in_memory().expect("failed to create test store")
    }

    fn sample_aircraft(name: &str, model: &str) -> Aircraft {
        Aircraft::new(name.to_string(), model.to_string(), 1998)
    }

    fn sample_record(aircraft_id: i64) -> MaintenanceRecord {
        MaintenanceRecord::new(
            aircraft_id,
            "Engine overhaul".to_string(),
            "2025-03-01".to_string(),
            "R. Mehta".to_string(),
            1200.0,
            MaintenanceStatus::Completed,
        )
    }

    #[test]
    fn test_open_in_memory() {
        let store = MaintenanceStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_insert_and_list_roundtrip() {
        let store = create_test_store();
        let id = store
            .insert_aircraft(&sample_aircraft("Skyhawk", "C172"))
            .unwrap();
        assert!(id >= 1);

        let all = store.all_aircraft().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, Some(id));
        assert_eq!(all[0].name, "Skyhawk");
        assert_eq!(all[0].model, "C172");
        assert_eq!(all[0].manufacture_year, 1998);
    }

    #[test]
    fn test_listing_follows_insertion_order() {
        let store = create_test_store();
        for name in ["Alpha", "Bravo", "Charlie"] {
            store.insert_aircraft(&sample_aircraft(name, "M1")).unwrap();
        }

        let names: Vec<String> = store
            .all_aircraft()
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, ["Alpha", "Bravo", "Charlie"]);
    }

    #[test]
    fn test_search_matches_name_or_model() {
        let store = create_test_store();
        store
            .insert_aircraft(&sample_aircraft("Skyhawk", "C172"))
            .unwrap();
        store
            .insert_aircraft(&sample_aircraft("Citation", "CJ4"))
            .unwrap();

        // Keyword present in model but absent from name still matches
        let results = store.search_aircraft("172").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Skyhawk");

        let results = store.search_aircraft("Citation").unwrap();
        assert_eq!(results.len(), 1);

        let results = store.search_aircraft("nonexistent").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_aircraft_exists() {
        let store = create_test_store();
        let id = store
            .insert_aircraft(&sample_aircraft("Skyhawk", "C172"))
            .unwrap();

        assert!(store.aircraft_exists(id).unwrap());
        assert!(!store.aircraft_exists(id + 100).unwrap());
    }

    #[test]
    fn test_insert_record_and_filter() {
        let store = create_test_store();
        let first = store
            .insert_aircraft(&sample_aircraft("Skyhawk", "C172"))
            .unwrap();
        let second = store
            .insert_aircraft(&sample_aircraft("Citation", "CJ4"))
            .unwrap();

        store.insert_record(&sample_record(first)).unwrap();
        store.insert_record(&sample_record(second)).unwrap();
        store.insert_record(&sample_record(first)).unwrap();

        let for_first = store.records_for_aircraft(first).unwrap();
        assert_eq!(for_first.len(), 2);
        assert!(for_first.iter().all(|r| r.aircraft_id == first));

        assert_eq!(store.all_records().unwrap().len(), 3);
        assert!(store.records_for_aircraft(999).unwrap().is_empty());
    }

    #[test]
    fn test_record_roundtrip_preserves_fields() {
        let store = create_test_store();
        let aircraft_id = store
            .insert_aircraft(&sample_aircraft("Skyhawk", "C172"))
            .unwrap();
        let id = store.insert_record(&sample_record(aircraft_id)).unwrap();
        assert!(id >= 1);

        let records = store.all_records().unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, Some(id));
        assert_eq!(record.aircraft_id, aircraft_id);
        assert_eq!(record.description, "Engine overhaul");
        assert_eq!(record.date, "2025-03-01");
        assert_eq!(record.engineer, "R. Mehta");
        assert!((record.cost - 1200.0).abs() < f64::EPSILON);
        assert_eq!(record.status, MaintenanceStatus::Completed);
    }

    #[test]
    fn test_status_stored_lowercase() {
        let store = create_test_store();
        let aircraft_id = store
            .insert_aircraft(&sample_aircraft("Skyhawk", "C172"))
            .unwrap();
        let mut record = sample_record(aircraft_id);
        record.status = MaintenanceStatus::Pending;
        store.insert_record(&record).unwrap();

        let stored: String = store
            .conn
            .query_row("SELECT status FROM maintenance", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, "pending");
    }

    #[test]
    fn test_counts() {
        let store = create_test_store();
        assert_eq!(store.aircraft_count().unwrap(), 0);
        assert_eq!(store.record_count().unwrap(), 0);

        let id = store
            .insert_aircraft(&sample_aircraft("Skyhawk", "C172"))
            .unwrap();
        store.insert_record(&sample_record(id)).unwrap();

        assert_eq!(store.aircraft_count().unwrap(), 1);
        assert_eq!(store.record_count().unwrap(), 1);
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("flightops_maint_test_{}.db", std::process::id()));

        let store = MaintenanceStore::open(&db_path).unwrap();
        store
            .insert_aircraft(&sample_aircraft("Skyhawk", "C172"))
            .unwrap();
        drop(store);

        // Second open re-runs schema initialization without clobbering rows
        let store = MaintenanceStore::open(&db_path).unwrap();
        assert_eq!(store.path(), db_path);
        assert_eq!(store.aircraft_count().unwrap(), 1);

        drop(store);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_unicode_fields() {
        let store = create_test_store();
        let aircraft = Aircraft::new("ガルフ".to_string(), "G650".to_string(), 2015);
        let id = store.insert_aircraft(&aircraft).unwrap();

        let all = store.all_aircraft().unwrap();
        assert_eq!(all[0].id, Some(id));
        assert_eq!(all[0].name, "ガルフ");
    }
}
