//! Control point matching and GCP row filtering.
//!
//! - [`coordinates_match`]: the per-axis tolerance predicate
//! - [`ControlPointSet`]: unique control points in file order
//! - [`CandidateFinder`]: looks up the control point a coordinate belongs to
//! - [`FilterEngine`]: keeps matching GCP rows and collects statistics
//!
//! ## Matching rule
//!
//! A GCP row matches a control point when its X, Y and Z each differ from the control
//! point's by no more than the tolerance. A row within tolerance of several control
//! points is attributed to exactly one of them:
//!
//! 1. **first** (default): the earliest in control-points file order
//! 2. **nearest**: the closest by Euclidean distance, earliest on ties
//!
//! ## Lookup
//!
//! The linear strategy compares every row with every control point. The grid strategy
//! buckets control points into cells twice the tolerance wide and only inspects the
//! 27 cells around each row. Both produce the same attribution.
//!
//! ## Example
//!
//! ```rust
//! use gcp_filter::core::types::Coordinate;
//! use gcp_filter::matching::{ControlPointSet, FilterConfig, FilterEngine};
//! use gcp_filter::parsing::tsv::parse_tabular_text;
//!
//! let cps: ControlPointSet = vec![Coordinate::new(100.0, 200.0, 5.0)].into_iter().collect();
//! let gcp = parse_tabular_text("EPSG:32633\n100.0\t200.0\t5.0\timgA\n").unwrap();
//!
//! let engine = FilterEngine::with_config(&cps, FilterConfig::default());
//! let outcome = engine.filter(&gcp.records);
//! assert_eq!(outcome.matched.len(), 1);
//! ```

pub mod control_points;
pub mod engine;
pub mod index;
pub mod tolerance;

pub use control_points::ControlPointSet;
pub use engine::{FilterConfig, FilterEngine, FilterOutcome, RowWarning};
pub use index::CandidateFinder;
pub use tolerance::{coordinates_match, DEFAULT_TOLERANCE};
