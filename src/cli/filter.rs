use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::types::{IndexStrategy, TieBreak};
use crate::matching::engine::{FilterConfig, DEFAULT_IMAGE_COLUMN};
use crate::matching::tolerance::DEFAULT_TOLERANCE;
use crate::pipeline::{FilterJob, FilterSummary};

#[derive(Args)]
pub struct FilterArgs {
    /// GCP data file (tab-delimited, CRS identifier on line 1)
    #[arg(required = true)]
    pub gcp_file: PathBuf,

    /// Control points file (tab-delimited, CRS identifier on line 1)
    #[arg(required = true)]
    pub control_points: PathBuf,

    /// Where to write the matched GCP rows
    #[arg(short, long)]
    pub output: PathBuf,

    /// Maximum per-axis coordinate difference, in the files' units
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE, allow_negative_numbers = true)]
    pub tolerance: f64,

    /// Zero-based column holding the image identifier
    #[arg(long, default_value_t = DEFAULT_IMAGE_COLUMN)]
    pub image_column: usize,

    /// Which control point gets a row that is within tolerance of several
    #[arg(long, value_enum, default_value = "first")]
    pub tie_break: TieBreak,

    /// Candidate lookup strategy
    #[arg(long, value_enum, default_value = "linear")]
    pub index: IndexStrategy,
}

impl FilterArgs {
    fn to_job(&self) -> FilterJob {
        FilterJob::new(&self.gcp_file, &self.control_points, &self.output).with_config(
            FilterConfig {
                tolerance: self.tolerance,
                image_column: self.image_column,
                tie_break: self.tie_break,
                index: self.index,
            },
        )
    }
}

/// Execute filter subcommand
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an input cannot be read, or the
/// output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FilterArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let job = args.to_job();

    if verbose {
        eprintln!(
            "Tolerance {} ({:?} tie-break, {:?} index)",
            job.config.tolerance, job.config.tie_break, job.config.index
        );
    }

    let summary = job.run()?;

    match format {
        OutputFormat::Text => print_text_summary(&summary),
        OutputFormat::Json => print_json_summary(&summary)?,
        OutputFormat::Tsv => print_tsv_summary(&summary),
    }

    Ok(())
}

fn print_text_summary(summary: &FilterSummary) {
    for line in &summary.log {
        println!("{line}");
    }
}

fn print_json_summary(summary: &FilterSummary) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn print_tsv_summary(summary: &FilterSummary) {
    println!("control_point\tx\ty\tz\tpictures\timages");
    for cp in &summary.statistics.breakdown {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            cp.label,
            cp.coordinate.x,
            cp.coordinate.y,
            cp.coordinate.z,
            cp.pictures,
            cp.images.join(",")
        );
    }
}
