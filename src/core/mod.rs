//! Core data types for control point filtering.
//!
//! - [`Coordinate`]: an (X, Y, Z) triple parsed from the first three columns of a row
//! - [`ControlPoint`]: a unique surveyed point, remembered with its position in the
//!   control-points file
//! - [`CoordinateRecord`]: one raw tab-delimited data row with its line number
//! - [`TieBreak`], [`IndexStrategy`]: matching options
//!
//! ## Coordinate identity
//!
//! Control points are de-duplicated by the exact value of their triple, never by
//! tolerance. Two surveyed points a millimetre apart stay two control points.
//!
//! [`Coordinate`]: types::Coordinate
//! [`ControlPoint`]: types::ControlPoint
//! [`CoordinateRecord`]: record::CoordinateRecord
//! [`TieBreak`]: types::TieBreak
//! [`IndexStrategy`]: types::IndexStrategy

pub mod record;
pub mod types;
