//! Command-line interface for gcp-filter.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **filter**: Keep GCP rows that lie within tolerance of a control point
//! - **inspect**: Summarize one coordinate file before filtering
//!
//! ## Usage
//!
//! ```text
//! # Filter with the default 1 mm tolerance
//! gcp-filter filter gcp_data.txt control_points.txt -o filtered.txt
//!
//! # Looser tolerance, attribute ambiguous rows to the nearest control point
//! gcp-filter filter gcp_data.txt control_points.txt -o filtered.txt -t 0.005 --tie-break nearest
//!
//! # JSON summary for scripting
//! gcp-filter --format json filter gcp_data.txt control_points.txt -o filtered.txt
//!
//! # Check how many unique control points a file holds
//! gcp-filter inspect control_points.txt
//! ```

use clap::{Parser, Subcommand};

pub mod filter;
pub mod inspect;

#[derive(Parser)]
#[command(name = "gcp-filter")]
#[command(version)]
#[command(about = "Filter ground control point data against surveyed control points")]
#[command(
    long_about = "gcp-filter keeps the rows of a GCP data file whose X, Y and Z lie within a tolerance of a surveyed control point.\n\nBoth inputs are tab-delimited with a CRS identifier on the first line. The output carries the GCP file's CRS line followed by the matched rows, and a report lists how many pictures each control point received."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter GCP rows against control points
    Filter(filter::FilterArgs),

    /// Summarize a coordinate file
    Inspect(inspect::InspectArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
