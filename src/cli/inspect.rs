use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::types::Coordinate;
use crate::matching::control_points::ControlPointSet;
use crate::matching::engine::RowWarning;
use crate::parsing::tsv::read_tabular_file;
use crate::utils::validation::validate_input_path;

#[derive(Args)]
pub struct InspectArgs {
    /// Coordinate file (tab-delimited, CRS identifier on line 1)
    #[arg(required = true)]
    pub input: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct FileOverview {
    pub path: PathBuf,
    pub crs_header: String,
    pub data_rows: usize,
    pub valid_rows: usize,
    pub unique_points: usize,
    pub duplicate_rows: usize,
    pub short_rows: usize,
    pub invalid_rows: Vec<RowWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Serialize)]
pub struct Bounds {
    pub min: Coordinate,
    pub max: Coordinate,
}

/// Read a coordinate file and summarize it
///
/// # Errors
///
/// Returns an error if the path is invalid or the file cannot be read.
pub fn overview(args: &InspectArgs) -> anyhow::Result<FileOverview> {
    validate_input_path("input file", &args.input)?;
    let file = read_tabular_file(&args.input)?;
    let points = ControlPointSet::from_records(&file.records);

    Ok(FileOverview {
        path: args.input.clone(),
        crs_header: file.header,
        data_rows: points.rows_read,
        valid_rows: points.len() + points.duplicates,
        unique_points: points.len(),
        duplicate_rows: points.duplicates,
        short_rows: points.short_rows,
        bounds: points.bounds().map(|(min, max)| Bounds { min, max }),
        invalid_rows: points.warnings.into_iter().map(RowWarning::from).collect(),
    })
}

/// Execute inspect subcommand
///
/// # Errors
///
/// Returns an error if the path is invalid or the file cannot be read.
pub fn run(args: &InspectArgs, format: OutputFormat) -> anyhow::Result<()> {
    let overview = overview(args)?;

    match format {
        OutputFormat::Text => print_text_overview(&overview),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&overview)?),
        OutputFormat::Tsv => print_tsv_overview(&overview),
    }

    Ok(())
}

fn print_text_overview(overview: &FileOverview) {
    println!("File: {}", overview.path.display());
    println!("  CRS header: {}", overview.crs_header);
    println!("  Data rows: {}", overview.data_rows);
    println!("  Valid coordinate rows: {}", overview.valid_rows);
    println!("  Unique points: {}", overview.unique_points);
    println!("  Duplicate rows: {}", overview.duplicate_rows);
    println!("  Rows with fewer than 3 fields: {}", overview.short_rows);

    if let Some(bounds) = &overview.bounds {
        println!("  Bounds: {} to {}", bounds.min, bounds.max);
    }

    if !overview.invalid_rows.is_empty() {
        println!("\nInvalid rows:");
        for warning in &overview.invalid_rows {
            println!("  {warning}");
        }
    }
}

fn print_tsv_overview(overview: &FileOverview) {
    println!("crs_header\tdata_rows\tvalid_rows\tunique_points\tduplicate_rows\tshort_rows\tinvalid_rows");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        overview.crs_header,
        overview.data_rows,
        overview.valid_rows,
        overview.unique_points,
        overview.duplicate_rows,
        overview.short_rows,
        overview.invalid_rows.len()
    );
}
