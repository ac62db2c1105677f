//! `flightops` - CLI for the flight operational tools suite
//!
//! This binary provides the command-line interface: the interactive suite by
//! default, plus status and configuration commands.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use clap::Parser;

use flightops::cli::{Cli, Command, ConfigCommand};
use flightops::fuel::FuelStore;
use flightops::maintenance::MaintenanceStore;
use flightops::weather::WeatherStore;
use flightops::{init_logging, menu, Config, Console};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            run_suite(&config);
            Ok(())
        }
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, &config_cmd),
    }
}

/// Run the interactive suite with the outermost failure boundary.
///
/// Both the interrupt and the catch-all path print a final message and let
/// the process terminate normally; neither sets an exit code.
fn run_suite(config: &Config) {
    let mut console = Console::stdio();
    match menu::run(&mut console, config) {
        Ok(()) => {}
        Err(e) if e.is_interrupted() => {
            println!("\nProgram terminated manually by user.");
        }
        Err(e) => {
            println!("Unexpected error: {e}");
        }
    }
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    // Opening a store runs its idempotent schema initialization, so status
    // works on a fresh data directory too
    let maintenance = MaintenanceStore::open(config.maintenance_db_path())?;
    let weather = WeatherStore::open(config.weather_db_path())?;
    let fuel = FuelStore::open(config.fuel_db_path())?;

    let aircraft = maintenance.aircraft_count()?;
    let maintenance_records = maintenance.record_count()?;
    let weather_records = weather.count()?;
    let fuel_records = fuel.count()?;

    if json {
        let status = serde_json::json!({
            "data_dir": config.data_dir(),
            "maintenance": {
                "database": maintenance.path(),
                "aircraft": aircraft,
                "records": maintenance_records,
            },
            "weather": {
                "database": weather.path(),
                "records": weather_records,
            },
            "fuel": {
                "database": fuel.path(),
                "records": fuel_records,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("flightops status");
        println!("----------------");
        println!("Data dir:      {}", config.data_dir().display());
        println!(
            "Maintenance:   {} ({aircraft} aircraft, {maintenance_records} records)",
            maintenance.path().display()
        );
        println!(
            "Weather:       {} ({weather_records} records)",
            weather.path().display()
        );
        println!(
            "Fuel:          {} ({fuel_records} records)",
            fuel.path().display()
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data dir:       {}", config.data_dir().display());
                println!(
                    "  Maintenance db: {}",
                    config.maintenance_db_path().display()
                );
                println!("  Weather db:     {}", config.weather_db_path().display());
                println!("  Fuel db:        {}", config.fuel_db_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
