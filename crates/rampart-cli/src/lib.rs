//! Rampart CLI library
//!
//! This module contains the core CLI logic for the Rampart diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::info;

use rampart::{DiagramBuilder, RampartError};

/// Run the Rampart CLI application
///
/// Loads the manifest named by `args`, compiles it and renders the artifact
/// to the output path. Custom-icon assets resolve relative to the manifest's
/// directory. `--orientation` and `--show` replace the configured defaults;
/// the manifest's own `[options]` take precedence over both.
///
/// # Errors
///
/// Returns `RampartError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Manifest errors
/// - Diagram construction errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), RampartError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let base_dir = Path::new(&args.input)
        .parent()
        .unwrap_or_else(|| Path::new("."));

    let builder = DiagramBuilder::new(app_config);

    let mut defaults = builder.config().diagram_options()?;
    if let Some(orientation) = args.orientation {
        defaults = defaults.with_orientation(orientation);
    }
    if args.show {
        defaults = defaults.with_show(true);
    }

    let graph = builder.parse_with(&source, base_dir, defaults)?;
    let output = builder.render(&graph, &args.output)?;

    info!(
        output_file:% = output.path().display(),
        format:% = output.format(),
        bytes = output.bytes();
        "Diagram exported successfully"
    );

    Ok(())
}
