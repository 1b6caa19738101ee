//! One filtering run: read both inputs, match, write the output, report.
//!
//! ```rust,no_run
//! use gcp_filter::pipeline::FilterJob;
//!
//! let job = FilterJob::new("gcp_data.txt", "control_points.txt", "filtered.txt")
//!     .with_tolerance(0.005);
//! let summary = job.run().unwrap();
//!
//! for line in &summary.log {
//!     println!("{line}");
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::matching::control_points::ControlPointSet;
use crate::matching::engine::{FilterConfig, FilterEngine, RowWarning};
use crate::parsing::tsv::{read_tabular_file, write_tabular_file, ReadError, WriteError};
use crate::report::summary::StatisticsReport;
use crate::utils::validation::{
    validate_image_column, validate_input_path, validate_output_path, validate_tolerance,
    ValidationError,
};

const GCP_ROLE: &str = "GCP data file";
const CONTROL_POINTS_ROLE: &str = "control points file";

/// Errors that abort a run
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ValidationError),

    #[error("Failed to read input: {0}")]
    Read(#[from] ReadError),

    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),
}

/// The four values a run needs
#[derive(Debug, Clone, Serialize)]
pub struct FilterJob {
    pub gcp_path: PathBuf,
    pub control_points_path: PathBuf,
    pub output_path: PathBuf,
    pub config: FilterConfig,
}

/// Structured result of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct FilterSummary {
    pub output_path: PathBuf,
    pub config: FilterConfig,

    /// CRS header copied to the output
    pub crs_header: String,

    /// Data rows in the GCP file
    pub total_gcp_rows: usize,
    /// GCP rows with parseable coordinates
    pub valid_gcp_rows: usize,
    /// Data rows in the control points file
    pub control_point_rows: usize,
    pub unique_control_points: usize,
    pub matched_rows: usize,
    pub matched_control_points: usize,

    pub gcp_warnings: Vec<RowWarning>,
    pub control_point_warnings: Vec<RowWarning>,

    pub statistics: StatisticsReport,

    /// Progress and result lines in the order they happened
    pub log: Vec<String>,
}

impl FilterJob {
    pub fn new(
        gcp_path: impl Into<PathBuf>,
        control_points_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            gcp_path: gcp_path.into(),
            control_points_path: control_points_path.into(),
            output_path: output_path.into(),
            config: FilterConfig::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: FilterConfig) -> Self {
        self.config = config;
        self
    }

    /// Check paths and options before anything is read
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for missing inputs, a missing output path, an output
    /// path that names an input, a negative or non-finite tolerance, or an image
    /// column inside the coordinate columns.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_input_path(GCP_ROLE, &self.gcp_path)?;
        validate_input_path(CONTROL_POINTS_ROLE, &self.control_points_path)?;
        validate_output_path(
            &self.output_path,
            &[
                (GCP_ROLE, self.gcp_path.as_path()),
                (CONTROL_POINTS_ROLE, self.control_points_path.as_path()),
            ],
        )?;
        validate_tolerance(self.config.tolerance)?;
        validate_image_column(self.config.image_column)?;
        Ok(())
    }

    /// Run the filter.
    ///
    /// The output is written only after both inputs have been read and filtered.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Configuration` if validation fails, `FilterError::Read`
    /// if an input cannot be read, or `FilterError::Write` if the output cannot be
    /// written. Malformed rows are not errors; they come back as warnings.
    pub fn run(&self) -> Result<FilterSummary, FilterError> {
        self.validate()?;

        let mut log = RunLog::default();
        log.push("Starting filter process...");

        log.push("Reading GCP data file...");
        let gcp = read_tabular_file(&self.gcp_path)?;
        log.push(format!("Loaded {} GCP data rows", gcp.records.len()));

        log.push("Reading control points file...");
        let cp_file = read_tabular_file(&self.control_points_path)?;
        log.push(format!("Loaded {} control point rows", cp_file.records.len()));

        if cp_file.header != gcp.header {
            debug!(
                "CRS headers differ: '{}' vs '{}'",
                gcp.header, cp_file.header
            );
        }

        let control_points = ControlPointSet::from_records(&cp_file.records);
        for warning in &control_points.warnings {
            log.push(format!("Warning: skipping invalid control point row: {warning}"));
        }
        log.push(format!(
            "Parsed {} unique control points",
            control_points.len()
        ));

        log.push("Filtering GCP data...");
        let engine = FilterEngine::with_config(&control_points, self.config.clone());
        let outcome = engine.filter(&gcp.records);
        for warning in &outcome.warnings {
            log.push(format!("Warning: skipping invalid GCP row: {warning}"));
        }

        log.push("Writing output file...");
        write_tabular_file(&self.output_path, &gcp.header, &outcome.matched)?;

        let statistics = StatisticsReport::from_statistics(&outcome.statistics, control_points.len());

        log.push("Filter completed successfully");
        log.push(format!(
            "Matched {} rows from {} total GCP data rows",
            outcome.matched.len(),
            outcome.total_rows
        ));
        log.push(format!(
            "Matched data saved to: {}",
            self.output_path.display()
        ));
        log.push(String::new());
        log.extend(statistics.render_text());

        info!(
            "Matched {}/{} GCP rows, {}/{} control points",
            outcome.matched.len(),
            outcome.total_rows,
            statistics.matched_control_points,
            statistics.total_control_points
        );

        Ok(FilterSummary {
            output_path: self.output_path.clone(),
            config: self.config.clone(),
            crs_header: gcp.header,
            total_gcp_rows: outcome.total_rows,
            valid_gcp_rows: outcome.valid_rows,
            control_point_rows: control_points.rows_read,
            unique_control_points: control_points.len(),
            matched_rows: outcome.matched.len(),
            matched_control_points: statistics.matched_control_points,
            gcp_warnings: outcome.warnings,
            control_point_warnings: control_points
                .warnings
                .iter()
                .cloned()
                .map(RowWarning::from)
                .collect(),
            statistics,
            log: log.into_lines(),
        })
    }
}

/// Convenience wrapper over [`FilterJob::run`]
///
/// # Errors
///
/// See [`FilterJob::run`].
pub fn run_filter(
    gcp_path: &Path,
    control_points_path: &Path,
    output_path: &Path,
    tolerance: f64,
) -> Result<FilterSummary, FilterError> {
    FilterJob::new(gcp_path, control_points_path, output_path)
        .with_tolerance(tolerance)
        .run()
}

/// Ordered run log, mirrored to `debug!`
#[derive(Default)]
struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!("{line}");
        self.lines.push(line);
    }

    fn extend(&mut self, lines: impl IntoIterator<Item = String>) {
        for line in lines {
            self.push(line);
        }
    }

    fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
