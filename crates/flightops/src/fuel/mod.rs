//! Fuel and flight range module.
//!
//! Estimates aircraft range from fuel load, burn rate, and cruising speed,
//! and keeps a history of the estimates.

pub mod store;

use std::fmt;
use std::io::{BufRead, Write};

use crate::config::Config;
use crate::console::Console;
use crate::error::{Error, Result};
use crate::input::{Constraint, FieldSpec, RealBound};

pub use store::FuelStore;

/// Estimate flight range in km.
///
/// Endurance is fuel divided by burn rate (hours); range is endurance times
/// cruising speed. The input layer guarantees a positive burn rate, but a
/// non-positive one still fails here rather than producing a nonsense range.
///
/// # Errors
///
/// Returns [`Error::Division`] if `burn` is not positive.
pub fn estimate_range(fuel: f64, burn: f64, speed: f64) -> Result<f64> {
    if burn <= 0.0 {
        return Err(Error::Division { burn });
    }
    let endurance = fuel / burn;
    Ok(endurance * speed)
}

/// One recorded range estimate.
///
/// The estimated range is computed once when the record is built and stored
/// with it; later reads display the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelRecord {
    /// Unique identifier (assigned by the store).
    pub id: Option<i64>,
    /// Fuel onboard in kg, positive.
    pub fuel_capacity: f64,
    /// Burn rate in kg/hour, positive.
    pub burn_rate: f64,
    /// Cruising speed in km/h, positive.
    pub cruising_speed: f64,
    /// The derived range estimate in km.
    pub estimated_range: f64,
    /// Estimate date (YYYY-MM-DD shape).
    pub date: String,
}

impl FuelRecord {
    /// Build a record from fuel parameters, computing the range once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Division`] if the burn rate is not positive.
    pub fn estimated(
        fuel_capacity: f64,
        burn_rate: f64,
        cruising_speed: f64,
        date: String,
    ) -> Result<Self> {
        let estimated_range = estimate_range(fuel_capacity, burn_rate, cruising_speed)?;
        Ok(Self {
            id: None,
            fuel_capacity,
            burn_rate,
            cruising_speed,
            estimated_range,
            date,
        })
    }
}

impl fmt::Display for FuelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.map_or_else(|| "-".to_string(), |i| i.to_string());
        write!(
            f,
            "[{id}] {} | fuel {:.1} kg | burn {:.1} kg/h | speed {:.1} km/h | range {:.2} km",
            self.date, self.fuel_capacity, self.burn_rate, self.cruising_speed,
            self.estimated_range
        )
    }
}

const FUEL_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter total fuel onboard (kg): ",
    constraint: Constraint::Real(RealBound::Positive),
    format_message: "Enter a valid numeric value for fuel.",
    range_message: "Fuel must be a positive numeric value.",
};

const BURN_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter fuel burn rate (kg/hour): ",
    constraint: Constraint::Real(RealBound::Positive),
    format_message: "Enter a valid numeric value for burn rate.",
    range_message: "Burn rate must be positive.",
};

const SPEED_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter cruising speed (km/h): ",
    constraint: Constraint::Real(RealBound::Positive),
    format_message: "Enter a valid numeric value for speed.",
    range_message: "Speed must be positive.",
};

const DATE_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter date (YYYY-MM-DD): ",
    constraint: Constraint::DateShape,
    format_message: "Invalid date format. Use YYYY-MM-DD.",
    range_message: "Invalid date format. Use YYYY-MM-DD.",
};

/// Run the fuel module.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the console fails, or the
/// operator interrupts the session.
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, config: &Config) -> Result<()> {
    let store = FuelStore::open(config.fuel_db_path())?;
    menu(console, &store)
}

fn menu<R: BufRead, W: Write>(console: &mut Console<R, W>, store: &FuelStore) -> Result<()> {
    loop {
        console.say("\n--- Fuel & Range Module ---")?;
        console.say("1. Calculate Flight Range")?;
        console.say("2. View Range Calculation History")?;
        console.say("3. Back to Main Menu")?;

        let choice = console.prompt("Enter choice: ")?;
        if choice.is_empty() || !choice.chars().all(|c| c.is_ascii_digit()) {
            console.say("Enter a number between 1\u{2013}3.")?;
            continue;
        }

        match choice.parse::<i64>() {
            Ok(1) => calculate_range(console, store)?,
            Ok(2) => view_range_logs(console, store)?,
            Ok(3) => return Ok(()),
            _ => console.say("Invalid selection, try again.")?,
        }
    }
}

/// Collect fuel parameters, estimate range, and record the result.
fn calculate_range<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &FuelStore,
) -> Result<()> {
    let fuel = console.read_real(&FUEL_FIELD)?;
    let burn = console.read_real(&BURN_FIELD)?;
    let speed = console.read_real(&SPEED_FIELD)?;
    let date = console.read_text(&DATE_FIELD)?;

    let record = match FuelRecord::estimated(fuel, burn, speed, date) {
        Ok(record) => record,
        Err(e) => {
            console.say(&format!("Error in calculation: {e}"))?;
            return Ok(());
        }
    };

    match store.insert(&record) {
        Ok(_) => console.say(&format!(
            "\n Estimated range = {:.2} km",
            record.estimated_range
        ))?,
        Err(e) => console.say(&format!("Database Error: {e}"))?,
    }
    Ok(())
}

/// List the estimate history.
fn view_range_logs<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &FuelStore,
) -> Result<()> {
    match store.all_records() {
        Ok(rows) => {
            if rows.is_empty() {
                console.say("No entries found in fuel database.")?;
            } else {
                console.say("\nFuel & Range History:")?;
                for row in rows {
                    console.say(&row.to_string())?;
                }
            }
        }
        Err(e) => console.say(&format!("Database Error: {e}"))?,
    }
    Ok(())
}
