//! `flightops` - A console suite for aviation operational data
//!
//! This library provides the core functionality for recording and querying
//! aircraft maintenance logs, weather-based takeoff clearance decisions, and
//! fuel/range estimates, each backed by its own `SQLite` store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod fuel;
pub mod input;
pub mod logging;
pub mod maintenance;
pub mod menu;
pub mod storage;
pub mod weather;

pub use config::Config;
pub use console::Console;
pub use error::{Error, Result};
pub use logging::init_logging;
