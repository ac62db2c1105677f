//! Top-level dispatcher for the suite.
//!
//! Presents the three module menus plus exit. Each module runs inside a
//! failure boundary: an error escaping a module is reported with a
//! module-identifying prefix and the suite keeps running. The operator
//! interrupt is the one error that passes through, so the process can
//! terminate instead of re-displaying the menu.

use std::io::{BufRead, Write};

use tracing::info;

use crate::config::Config;
use crate::console::Console;
use crate::error::Result;
use crate::{fuel, maintenance, weather};

/// Run the interactive suite until the operator exits.
///
/// # Errors
///
/// Returns [`crate::error::Error::Interrupted`] if the operator interrupts
/// the session, or an error if the console fails.
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, config: &Config) -> Result<()> {
    info!("Starting interactive suite");
    loop {
        console.say("\n===== Flight Operational Tools Suite =====")?;
        console.say("1. Aircraft Maintenance System")?;
        console.say("2. Weather Takeoff Evaluation")?;
        console.say("3. Fuel & Flight Range Estimation")?;
        console.say("4. Exit")?;

        let choice = console.prompt("Enter choice (1-4): ")?;
        if choice.is_empty() || !choice.chars().all(|c| c.is_ascii_digit()) {
            console.say("Please enter a number between 1-4.")?;
            continue;
        }

        match choice.parse::<i64>() {
            Ok(1) => run_module(console, config, "maintenance", maintenance::run)?,
            Ok(2) => run_module(console, config, "weather", weather::run)?,
            Ok(3) => run_module(console, config, "fuel", fuel::run)?,
            Ok(4) => {
                console.say("Exiting program.... Goodbye!")?;
                return Ok(());
            }
            _ => console.say("Invalid choice. Enter a number between 1-4.")?,
        }
    }
}

/// Invoke a module entry point inside its failure boundary.
fn run_module<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &Config,
    name: &str,
    entry: fn(&mut Console<R, W>, &Config) -> Result<()>,
) -> Result<()> {
    if let Err(e) = entry(console, config) {
        if e.is_interrupted() {
            return Err(e);
        }
        console.say(&format!("Error running {name} module: {e}"))?;
    }
    Ok(())
}
