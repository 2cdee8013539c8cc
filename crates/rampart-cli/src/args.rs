//! Command-line argument definitions for the Rampart CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, logging verbosity, and a few diagram defaults.

use clap::Parser;

use rampart::layout::Orientation;

/// Command-line arguments for the Rampart diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input manifest
    #[arg(help = "Path to the input manifest (TOML)")]
    pub input: String,

    /// Path to the output artifact; the extension selects the format
    /// (png, svg, pdf, jpg, dot)
    #[arg(short, long, default_value = "out.png")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Open the rendered diagram unless the manifest says otherwise
    #[arg(long)]
    pub show: bool,

    /// Layout direction (LR, TB, RL, BT) unless the manifest sets one
    #[arg(long)]
    pub orientation: Option<Orientation>,
}
