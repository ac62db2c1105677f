//! Aircraft maintenance module.
//!
//! Manages the aircraft register and maintenance logs: registration, log
//! entry, history retrieval, keyword search, and per-aircraft filtering.

pub mod store;

use std::fmt;
use std::io::{BufRead, Write};

use tracing::warn;

use crate::config::Config;
use crate::console::Console;
use crate::error::Result;
use crate::input::{Constraint, FieldSpec, RealBound};

pub use store::MaintenanceStore;

/// Completion state of a maintenance record.
///
/// Stored lowercase; operator input is accepted case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceStatus {
    /// Work has been carried out.
    Completed,
    /// Work is still outstanding.
    Pending,
}

impl MaintenanceStatus {
    /// Convert a stored status string back to the enum.
    ///
    /// Unknown values are treated as pending so a hand-edited database
    /// doesn't abort listing.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        match value {
            "completed" => Self::Completed,
            "pending" => Self::Pending,
            other => {
                warn!("Unknown maintenance status: {}, treating as pending", other);
                Self::Pending
            }
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// A registered aircraft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aircraft {
    /// Unique identifier (assigned by the store).
    pub id: Option<i64>,
    /// Aircraft name.
    pub name: String,
    /// Aircraft model.
    pub model: String,
    /// Year of manufacture (1950–2025).
    pub manufacture_year: i64,
}

impl Aircraft {
    /// Create a new aircraft pending registration.
    #[must_use]
    pub fn new(name: String, model: String, manufacture_year: i64) -> Self {
        Self {
            id: None,
            name,
            model,
            manufacture_year,
        }
    }
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.map_or_else(|| "-".to_string(), |i| i.to_string());
        write!(
            f,
            "[{id}] {} | {} | {}",
            self.name, self.model, self.manufacture_year
        )
    }
}

/// A single maintenance log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceRecord {
    /// Unique identifier (assigned by the store).
    pub id: Option<i64>,
    /// The aircraft this work was performed on.
    pub aircraft_id: i64,
    /// What was done.
    pub description: String,
    /// Service date (YYYY-MM-DD shape).
    pub date: String,
    /// Engineer who performed or owns the work.
    pub engineer: String,
    /// Repair cost, non-negative.
    pub cost: f64,
    /// Completion state.
    pub status: MaintenanceStatus,
}

impl MaintenanceRecord {
    /// Create a new record pending insertion.
    #[must_use]
    pub fn new(
        aircraft_id: i64,
        description: String,
        date: String,
        engineer: String,
        cost: f64,
        status: MaintenanceStatus,
    ) -> Self {
        Self {
            id: None,
            aircraft_id,
            description,
            date,
            engineer,
            cost,
            status,
        }
    }
}

impl fmt::Display for MaintenanceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.map_or_else(|| "-".to_string(), |i| i.to_string());
        write!(
            f,
            "[{id}] aircraft {} | {} | {} | {} | {:.2} | {}",
            self.aircraft_id, self.date, self.engineer, self.description, self.cost, self.status
        )
    }
}

const NAME_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter aircraft name: ",
    constraint: Constraint::NonEmpty,
    format_message: "Aircraft name cannot be empty.",
    range_message: "Aircraft name cannot be empty.",
};

const MODEL_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter model: ",
    constraint: Constraint::NonEmpty,
    format_message: "Model cannot be empty.",
    range_message: "Model cannot be empty.",
};

const YEAR_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter manufacture year: ",
    constraint: Constraint::Integer {
        min: Some(1950),
        max: Some(2025),
    },
    format_message: "Manufacture year must be a numeric value.",
    range_message: "Enter a realistic year between 1950\u{2013}2025.",
};

const AIRCRAFT_ID_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter aircraft ID: ",
    constraint: Constraint::Integer {
        min: None,
        max: None,
    },
    format_message: "Aircraft ID must be numeric.",
    range_message: "Aircraft ID must be numeric.",
};

const FILTER_ID_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter aircraft ID: ",
    constraint: Constraint::Integer {
        min: None,
        max: None,
    },
    format_message: "ID must be numeric.",
    range_message: "ID must be numeric.",
};

const DESCRIPTION_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter maintenance description: ",
    constraint: Constraint::NonEmpty,
    format_message: "Description cannot be empty.",
    range_message: "Description cannot be empty.",
};

const DATE_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter date (YYYY-MM-DD): ",
    constraint: Constraint::DateShape,
    format_message: "Invalid date format. Use YYYY-MM-DD.",
    range_message: "Invalid date format. Use YYYY-MM-DD.",
};

const ENGINEER_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter engineer name: ",
    constraint: Constraint::NonEmpty,
    format_message: "Engineer name cannot be empty.",
    range_message: "Engineer name cannot be empty.",
};

const COST_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter repair cost (\u{20b9}): ",
    constraint: Constraint::Real(RealBound::NonNegative),
    format_message: "Enter a valid number for cost.",
    range_message: "Cost must be positive.",
};

const STATUS_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter maintenance status (Completed/Pending): ",
    constraint: Constraint::OneOf(&["completed", "pending"]),
    format_message: "Status must be either 'Completed' or 'Pending'.",
    range_message: "Status must be either 'Completed' or 'Pending'.",
};

/// Run the maintenance module.
///
/// Opens the module's store, then loops on the module menu until the
/// operator selects "back".
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the console fails, or the
/// operator interrupts the session.
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, config: &Config) -> Result<()> {
    let store = MaintenanceStore::open(config.maintenance_db_path())?;
    menu(console, &store)
}

fn menu<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &MaintenanceStore,
) -> Result<()> {
    loop {
        console.say("\n--- Aircraft Maintenance Module ---")?;
        console.say("1. Add Aircraft")?;
        console.say("2. Search Aircraft")?;
        console.say("3. View Aircraft List")?;
        console.say("4. Add Maintenance Record")?;
        console.say("5. View All Maintenance Records")?;
        console.say("6. View Maintenance Records for Specific Aircraft")?;
        console.say("7. Back to Main Menu")?;

        let choice = console.prompt("Enter choice: ")?;
        match choice.as_str() {
            "1" => add_aircraft(console, store)?,
            "2" => search_aircraft(console, store)?,
            "3" => view_aircraft(console, store)?,
            "4" => log_maintenance(console, store)?,
            "5" => view_maintenance(console, store)?,
            "6" => view_maintenance_by_aircraft(console, store)?,
            "7" => return Ok(()),
            _ => console.say("Invalid input, please try again.")?,
        }
    }
}

/// Register a new aircraft.
fn add_aircraft<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &MaintenanceStore,
) -> Result<()> {
    let name = console.read_text(&NAME_FIELD)?;
    let model = console.read_text(&MODEL_FIELD)?;
    let year = console.read_integer(&YEAR_FIELD)?;

    let aircraft = Aircraft::new(name, model, year);
    match store.insert_aircraft(&aircraft) {
        Ok(_) => console.say("Aircraft added successfully.")?,
        Err(e) => console.say(&format!("Database Error: {e}"))?,
    }
    Ok(())
}

/// Search aircraft by name or model keyword.
fn search_aircraft<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &MaintenanceStore,
) -> Result<()> {
    let keyword = console.prompt("Enter search keyword: ")?;
    if keyword.is_empty() {
        console.say("Search keyword cannot be empty.")?;
        return Ok(());
    }

    match store.search_aircraft(&keyword) {
        Ok(rows) => {
            if rows.is_empty() {
                console.say("No matching aircraft found.")?;
            } else {
                console.say("\nSearch Results:")?;
                for row in rows {
                    console.say(&row.to_string())?;
                }
            }
        }
        Err(e) => console.say(&format!("Database Error: {e}"))?,
    }
    Ok(())
}

/// List every registered aircraft.
fn view_aircraft<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &MaintenanceStore,
) -> Result<()> {
    match store.all_aircraft() {
        Ok(rows) => {
            if rows.is_empty() {
                console.say("No aircraft registered yet.")?;
            } else {
                console.say("\nRegistered Aircraft:")?;
                for row in rows {
                    console.say(&row.to_string())?;
                }
            }
        }
        Err(e) => console.say(&format!("Database Error: {e}"))?,
    }
    Ok(())
}

/// Log a maintenance record against an existing aircraft.
///
/// The aircraft id is re-prompted until it references a registered aircraft,
/// so an orphan record is never inserted.
fn log_maintenance<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &MaintenanceStore,
) -> Result<()> {
    let aircraft_id = loop {
        let id = console.read_integer(&AIRCRAFT_ID_FIELD)?;
        if store.aircraft_exists(id)? {
            break id;
        }
        console.say("No aircraft exists with that ID.")?;
    };

    let description = console.read_text(&DESCRIPTION_FIELD)?;
    let date = console.read_text(&DATE_FIELD)?;
    let engineer = console.read_text(&ENGINEER_FIELD)?;
    let cost = console.read_real(&COST_FIELD)?;
    let status = MaintenanceStatus::from_stored(&console.read_text(&STATUS_FIELD)?);

    let record = MaintenanceRecord::new(aircraft_id, description, date, engineer, cost, status);
    match store.insert_record(&record) {
        Ok(_) => console.say("Maintenance record added.")?,
        Err(e) => console.say(&format!("Database Error: {e}"))?,
    }
    Ok(())
}

/// List the full maintenance log.
fn view_maintenance<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &MaintenanceStore,
) -> Result<()> {
    match store.all_records() {
        Ok(rows) => {
            if rows.is_empty() {
                console.say("No maintenance records found.")?;
            } else {
                console.say("\nMaintenance Records:")?;
                for row in rows {
                    console.say(&row.to_string())?;
                }
            }
        }
        Err(e) => console.say(&format!("Database Error: {e}"))?,
    }
    Ok(())
}

/// List maintenance records for one aircraft.
fn view_maintenance_by_aircraft<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &MaintenanceStore,
) -> Result<()> {
    let aircraft_id = console.read_integer(&FILTER_ID_FIELD)?;

    match store.records_for_aircraft(aircraft_id) {
        Ok(rows) => {
            if rows.is_empty() {
                console.say("No maintenance records for this aircraft.")?;
            } else {
                console.say(&format!(
                    "\nMaintenance Records for Aircraft ID {aircraft_id}"
                ))?;
                for row in rows {
                    console.say(&row.to_string())?;
                }
            }
        }
        Err(e) => console.say(&format!("Database Error: {e}"))?,
    }
    Ok(())
}
