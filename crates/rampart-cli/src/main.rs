//! Rampart CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use rampart::RampartError;
use rampart_cli::{Args, error_adapter::to_reportables};

fn main() {
    // Panics in the library are invariant violations; report them with miette
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);

    info!(version = env!("CARGO_PKG_VERSION"); "Starting Rampart");
    debug!(args:?; "Parsed arguments");

    // Build and render the manifest
    if let Err(err) = rampart_cli::run(&args) {
        report(&err);
        process::exit(1);
    }

    info!(output = args.output; "Completed successfully");
}

/// Initializes `env_logger`, falling back to `warn` for an unknown level.
fn init_logging(level: &str) {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
}

/// Logs every diagnostic carried by `err` as a graphical miette report.
fn report(err: &RampartError) {
    let reporter = miette::GraphicalReportHandler::new();

    for reportable in to_reportables(err) {
        let mut rendered = String::new();
        reporter
            .render_report(&mut rendered, &reportable)
            .expect("Writing to String buffer is infallible");

        error!("{rendered}");
    }
}
