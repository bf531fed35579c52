// Fleet Telemetry Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/fleet-telemetry-sim
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/fleet-telemetry-sim --vehicles 5 --push-api --export-csv --verbose
// ```

use clap::Parser;
use fleet_telemetry_sim::simulation::{FleetOrchestrator, LoggingConfig};
use fleet_telemetry_sim::types::{CliArgs, SimulationConfig};
use std::process;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        let default_config = SimulationConfig::default();
        match default_config.print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Initialize logging based on CLI flags. The per-tick console lines
    // are INFO, so the default level already shows the live fleet view.
    let logging_result = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        LoggingConfig::new().with_level(tracing::Level::INFO).init()
    };

    if let Err(e) = logging_result {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Starting Fleet Telemetry Simulator");

    // Load configuration from CLI arguments and optional config file
    let config = match SimulationConfig::from_cli_args(args.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    // Handle dry run mode
    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    let orchestrator = FleetOrchestrator::new(config);
    if let Err(e) = orchestrator.run() {
        error!("Simulation failed: {}", e);
        process::exit(1);
    }

    info!("Fleet Telemetry Simulator completed successfully");
}

/// Print startup banner with configuration
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Fleet Telemetry Simulator");
    eprintln!("=========================");
    eprintln!("Streams physically plausible vehicle sensor data");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Vehicles: {}", config.vehicle_count);
    eprintln!("  Tick Interval: {}s", config.tick_interval_secs);
    match config.tick_budget {
        Some(ticks) => eprintln!("  Tick Budget: {}", ticks),
        None => eprintln!("  Tick Budget: unbounded"),
    }
    eprintln!("  CSV Session Log: {}", if config.log_enabled { "enabled" } else { "disabled" });
    if config.log_enabled {
        eprintln!("  Log Directory: {}", config.log_directory);
    }
    eprintln!("  Push to Scoring Service: {}", if config.push_enabled { "enabled" } else { "disabled" });
    if config.push_enabled {
        eprintln!("  Scoring Endpoint: {}", config.push_endpoint());
    }
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}
