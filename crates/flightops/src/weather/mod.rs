//! Weather and takeoff clearance module.
//!
//! Records weather observations, evaluates takeoff clearance against fixed
//! safety thresholds, and serves the observation history.

pub mod store;

use std::fmt;
use std::io::{BufRead, Write};

use crate::config::Config;
use crate::console::Console;
use crate::error::Result;
use crate::input::{Constraint, FieldSpec, RealBound};

pub use store::WeatherStore;

/// The takeoff clearance decision for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeoffDecision {
    /// Wind speed above 35 knots.
    HighWind,
    /// Visibility below 3 km.
    LowVisibility,
    /// Temperature outside -20°C to +50°C.
    UnsafeTemperature,
    /// Humidity above 95%.
    HighHumidity,
    /// All checks passed.
    Cleared,
}

impl fmt::Display for TakeoffDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighWind => write!(f, "NO - High wind"),
            Self::LowVisibility => write!(f, "NO - Low visibility"),
            Self::UnsafeTemperature => write!(f, "NO - Unsafe temperature"),
            Self::HighHumidity => write!(f, "NO - High humidity risk"),
            Self::Cleared => write!(f, "YES - Cleared for takeoff"),
        }
    }
}

/// Decide whether takeoff is allowed.
///
/// Rules, first match wins:
/// - wind speed must not exceed 35 knots
/// - visibility must be at least 3 km
/// - temperature must be within -20°C to +50°C
/// - humidity must not exceed 95%
///
/// Known inconsistency: operational guidance prefers humidity under 90%, but
/// clearance is only refused above 95%; readings between 90 and 95 are
/// accepted. Kept as-is for compatibility with recorded decisions.
#[must_use]
pub fn evaluate_clearance(wind: f64, temp: f64, humidity: f64, visibility: f64) -> TakeoffDecision {
    if wind > 35.0 {
        return TakeoffDecision::HighWind;
    }
    if visibility < 3.0 {
        return TakeoffDecision::LowVisibility;
    }
    if temp < -20.0 || temp > 50.0 {
        return TakeoffDecision::UnsafeTemperature;
    }
    if humidity > 95.0 {
        return TakeoffDecision::HighHumidity;
    }
    TakeoffDecision::Cleared
}

/// One recorded weather observation.
///
/// The clearance text is evaluated once when the observation is built and
/// stored with it; later reads display the stored decision.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    /// Unique identifier (assigned by the store).
    pub id: Option<i64>,
    /// Wind speed in knots, non-negative.
    pub wind_speed: f64,
    /// Temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent, 0–100.
    pub humidity: f64,
    /// Visibility in km, non-negative.
    pub visibility: f64,
    /// Observation date (YYYY-MM-DD shape).
    pub date: String,
    /// The clearance decision text.
    pub clearance: String,
}

impl WeatherRecord {
    /// Build a record from an observation, evaluating clearance once.
    #[must_use]
    pub fn observed(
        wind_speed: f64,
        temperature: f64,
        humidity: f64,
        visibility: f64,
        date: String,
    ) -> Self {
        let clearance =
            evaluate_clearance(wind_speed, temperature, humidity, visibility).to_string();
        Self {
            id: None,
            wind_speed,
            temperature,
            humidity,
            visibility,
            date,
            clearance,
        }
    }
}

impl fmt::Display for WeatherRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.map_or_else(|| "-".to_string(), |i| i.to_string());
        write!(
            f,
            "[{id}] {} | wind {:.1} kt | temp {:.1} \u{b0}C | humidity {:.1}% | visibility {:.1} km | {}",
            self.date, self.wind_speed, self.temperature, self.humidity, self.visibility,
            self.clearance
        )
    }
}

/// The clearance projection of a weather record.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearanceSummary {
    /// Observation date.
    pub date: String,
    /// Wind speed in knots.
    pub wind_speed: f64,
    /// Visibility in km.
    pub visibility: f64,
    /// The stored clearance decision text.
    pub clearance: String,
}

impl fmt::Display for ClearanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | wind {:.1} kt | visibility {:.1} km | {}",
            self.date, self.wind_speed, self.visibility, self.clearance
        )
    }
}

const WIND_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter wind speed (knots): ",
    constraint: Constraint::Real(RealBound::NonNegative),
    format_message: "Enter a valid number for wind speed.",
    range_message: "Wind speed cannot be negative.",
};

const TEMPERATURE_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter temperature (\u{b0}C): ",
    constraint: Constraint::Real(RealBound::Any),
    format_message: "Enter a valid number for temperature.",
    range_message: "Enter a valid number for temperature.",
};

const HUMIDITY_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter humidity (%): ",
    constraint: Constraint::Real(RealBound::Percent),
    format_message: "Enter a valid number for humidity.",
    range_message: "Humidity must be between 0 and 100%.",
};

const VISIBILITY_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter visibility (km): ",
    constraint: Constraint::Real(RealBound::NonNegative),
    format_message: "Enter a valid number for visibility.",
    range_message: "Visibility must be positive.",
};

const DATE_FIELD: FieldSpec = FieldSpec {
    prompt: "Enter date (YYYY-MM-DD): ",
    constraint: Constraint::DateShape,
    format_message: "Invalid date format. Use YYYY-MM-DD.",
    range_message: "Invalid date format. Use YYYY-MM-DD.",
};

/// Run the weather module.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the console fails, or the
/// operator interrupts the session.
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, config: &Config) -> Result<()> {
    let store = WeatherStore::open(config.weather_db_path())?;
    menu(console, &store)
}

fn menu<R: BufRead, W: Write>(console: &mut Console<R, W>, store: &WeatherStore) -> Result<()> {
    loop {
        console.say("\n---- Weather & Takeoff Clearance Module ----")?;
        console.say("1. Record Weather Data")?;
        console.say("2. View Weather Logs")?;
        console.say("3. View Clearance Results")?;
        console.say("4. Back to Main Menu")?;

        let choice = console.prompt("Enter choice: ")?;
        match choice.as_str() {
            "1" => record_weather(console, store)?,
            "2" => view_weather_logs(console, store)?,
            "3" => view_clearance_status(console, store)?,
            "4" => return Ok(()),
            _ => console.say("Invalid input, try again.")?,
        }
    }
}

/// Record an observation and report its clearance decision.
fn record_weather<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &WeatherStore,
) -> Result<()> {
    let wind = console.read_real(&WIND_FIELD)?;
    let temperature = console.read_real(&TEMPERATURE_FIELD)?;
    let humidity = console.read_real(&HUMIDITY_FIELD)?;
    let visibility = console.read_real(&VISIBILITY_FIELD)?;
    let date = console.read_text(&DATE_FIELD)?;

    let record = WeatherRecord::observed(wind, temperature, humidity, visibility, date);
    match store.insert(&record) {
        Ok(_) => {
            console.say("\n Weather recorded successfully.")?;
            console.say(&format!("TAKEOFF CLEARANCE: {}", record.clearance))?;
        }
        Err(e) => console.say(&format!("Database Error: {e}"))?,
    }
    Ok(())
}

/// List the full observation history.
fn view_weather_logs<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &WeatherStore,
) -> Result<()> {
    match store.all_records() {
        Ok(rows) => {
            if rows.is_empty() {
                console.say("No weather history found.")?;
            } else {
                console.say("\nWeather History:")?;
                for row in rows {
                    console.say(&row.to_string())?;
                }
            }
        }
        Err(e) => console.say(&format!("Database Error: {e}"))?,
    }
    Ok(())
}

/// List only the clearance decisions.
fn view_clearance_status<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    store: &WeatherStore,
) -> Result<()> {
    match store.clearance_summaries() {
        Ok(rows) => {
            if rows.is_empty() {
                console.say("No clearance records found.")?;
            } else {
                console.say("\nClearance Summary:")?;
                for row in rows {
                    console.say(&row.to_string())?;
                }
            }
        }
        Err(e) => console.say(&format!("Database Error: {e}"))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drive(input: &str, store: &WeatherStore) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = {
            let mut console = Console::new(Cursor::new(input.to_string()), &mut out);
            menu(&mut console, store)
        };
        (result, String::from_utf8(out).expect("UTF-8 output"))
    }

    #[test]
    fn test_high_wind_takes_precedence() {
        // Wind above 35 refuses clearance regardless of the other readings
        let decision = evaluate_clearance(36.0, 200.0, 100.0, 0.0);
        assert_eq!(decision, TakeoffDecision::HighWind);
        assert_eq!(decision.to_string(), "NO - High wind");
    }

    #[test]
    fn test_low_visibility_second() {
        let decision = evaluate_clearance(35.0, 200.0, 100.0, 2.9);
        assert_eq!(decision, TakeoffDecision::LowVisibility);
        assert_eq!(decision.to_string(), "NO - Low visibility");
    }

    #[test]
    fn test_unsafe_temperature_third() {
        assert_eq!(
            evaluate_clearance(10.0, -20.1, 100.0, 5.0),
            TakeoffDecision::UnsafeTemperature
        );
        assert_eq!(
            evaluate_clearance(10.0, 50.1, 100.0, 5.0),
            TakeoffDecision::UnsafeTemperature
        );
    }

    #[test]
    fn test_high_humidity_fourth() {
        let decision = evaluate_clearance(10.0, 20.0, 95.1, 5.0);
        assert_eq!(decision, TakeoffDecision::HighHumidity);
        assert_eq!(decision.to_string(), "NO - High humidity risk");
    }

    #[test]
    fn test_cleared_for_takeoff() {
        let decision = evaluate_clearance(10.0, 20.0, 50.0, 10.0);
        assert_eq!(decision, TakeoffDecision::Cleared);
        assert_eq!(decision.to_string(), "YES - Cleared for takeoff");
    }

    #[test]
    fn test_boundaries_are_inclusive_where_documented() {
        // Exactly 35 knots, 3 km, -20/+50 °C, and 95% all pass
        assert_eq!(
            evaluate_clearance(35.0, 20.0, 50.0, 5.0),
            TakeoffDecision::Cleared
        );
        assert_eq!(
            evaluate_clearance(10.0, 20.0, 50.0, 3.0),
            TakeoffDecision::Cleared
        );
        assert_eq!(
            evaluate_clearance(10.0, -20.0, 50.0, 5.0),
            TakeoffDecision::Cleared
        );
        assert_eq!(
            evaluate_clearance(10.0, 50.0, 50.0, 5.0),
            TakeoffDecision::Cleared
        );
        assert_eq!(
            evaluate_clearance(10.0, 20.0, 95.0, 5.0),
            TakeoffDecision::Cleared
        );
    }

    #[test]
    fn test_humidity_between_90_and_95_is_accepted() {
        // Documented inconsistency: guidance says under 90 preferred, the
        // rule only refuses above 95
        assert_eq!(
            evaluate_clearance(10.0, 20.0, 93.0, 5.0),
            TakeoffDecision::Cleared
        );
    }

    #[test]
    fn test_record_weather_flow() {
        let store = WeatherStore::open_in_memory().unwrap();
        let (result, out) = drive("1\n10\n20\n50\n10\n2025-04-01\n4\n", &store);

        assert!(result.is_ok());
        assert!(out.contains(" Weather recorded successfully."));
        assert!(out.contains("TAKEOFF CLEARANCE: YES - Cleared for takeoff"));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_record_weather_reprompts_bad_humidity() {
        let store = WeatherStore::open_in_memory().unwrap();
        let (result, out) = drive("1\n10\n20\n120\n50\n10\n2025-04-01\n4\n", &store);

        assert!(result.is_ok());
        assert!(out.contains("Humidity must be between 0 and 100%."));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_record_weather_stores_refusal() {
        let store = WeatherStore::open_in_memory().unwrap();
        let (result, out) = drive("1\n40\n20\n50\n10\n2025-04-01\n4\n", &store);

        assert!(result.is_ok());
        assert!(out.contains("TAKEOFF CLEARANCE: NO - High wind"));

        let records = store.all_records().unwrap();
        assert_eq!(records[0].clearance, "NO - High wind");
    }

    #[test]
    fn test_view_logs_empty() {
        let store = WeatherStore::open_in_memory().unwrap();
        let (result, out) = drive("2\n4\n", &store);

        assert!(result.is_ok());
        assert!(out.contains("No weather history found."));
    }

    #[test]
    fn test_view_clearance_empty() {
        let store = WeatherStore::open_in_memory().unwrap();
        let (result, out) = drive("3\n4\n", &store);

        assert!(result.is_ok());
        assert!(out.contains("No clearance records found."));
    }

    #[test]
    fn test_view_clearance_summary() {
        let store = WeatherStore::open_in_memory().unwrap();
        store
            .insert(&WeatherRecord::observed(
                10.0,
                20.0,
                50.0,
                10.0,
                "2025-04-01".to_string(),
            ))
            .unwrap();

        let (result, out) = drive("3\n4\n", &store);

        assert!(result.is_ok());
        assert!(out.contains("Clearance Summary:"));
        assert!(out.contains("2025-04-01"));
        assert!(out.contains("YES - Cleared for takeoff"));
    }

    #[test]
    fn test_invalid_menu_choice() {
        let store = WeatherStore::open_in_memory().unwrap();
        let (result, out) = drive("8\n4\n", &store);

        assert!(result.is_ok());
        assert!(out.contains("Invalid input, try again."));
    }

    #[test]
    fn test_observed_computes_clearance_once() {
        let record = WeatherRecord::observed(36.0, 20.0, 50.0, 10.0, "2025-04-01".to_string());
        assert_eq!(record.clearance, "NO - High wind");
        assert!(record.id.is_none());
    }
}
