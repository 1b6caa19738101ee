//! Match statistics and their presentation.
//!
//! - [`MatchStatistics`]: rows matched during filtering, grouped per control point
//! - [`StatisticsReport`]: counts, min/max/mean pictures per control point and the
//!   per-control-point breakdown, ready to print or serialize
//!
//! [`MatchStatistics`]: statistics::MatchStatistics
//! [`StatisticsReport`]: summary::StatisticsReport

pub mod statistics;
pub mod summary;

pub use statistics::{MatchStatistics, MatchedRow};
pub use summary::StatisticsReport;
