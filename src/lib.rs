//! # gcp-filter
//!
//! A library for filtering ground control point (GCP) measurements against a set of
//! surveyed control points.
//!
//! Photogrammetry tools export GCP observations as tab-delimited rows: the X, Y and Z
//! of a marked point followed by pass-through fields such as the image it was marked
//! in. When only some of those points are real surveyed control points, the rest of
//! the rows are noise.
//!
//! `gcp-filter` keeps only the GCP rows whose coordinates lie within a per-axis
//! tolerance of a known control point and reports how many pictures each control
//! point ended up with.
//!
//! ## Features
//!
//! - **Per-axis tolerance**: a row matches when X, Y and Z each differ by at most the
//!   tolerance
//! - **Exact de-duplication**: repeated control points collapse by exact value
//! - **Deterministic attribution**: first control point in file order, or the nearest
//! - **Malformed row resilience**: bad rows are skipped with a warning, never abort
//! - **Header pass-through**: the CRS line is copied verbatim, never interpreted
//!
//! ## Example
//!
//! ```rust,no_run
//! use gcp_filter::pipeline::FilterJob;
//!
//! let summary = FilterJob::new("gcp_data.txt", "control_points.txt", "filtered.txt")
//!     .with_tolerance(0.005)
//!     .run()
//!     .unwrap();
//!
//! println!(
//!     "{} of {} rows matched {}/{} control points",
//!     summary.matched_rows,
//!     summary.total_gcp_rows,
//!     summary.matched_control_points,
//!     summary.unique_control_points,
//! );
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Coordinates, control points and raw records
//! - [`parsing`]: Tab-delimited reader/writer and coordinate parsing
//! - [`matching`]: Tolerance predicate, control point set and filtering engine
//! - [`report`]: Match statistics and the statistics report
//! - [`pipeline`]: One complete filtering run
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod pipeline;
pub mod report;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::record::CoordinateRecord;
pub use crate::core::types::*;
pub use matching::engine::{FilterConfig, FilterEngine, FilterOutcome};
pub use pipeline::{FilterError, FilterJob, FilterSummary};
