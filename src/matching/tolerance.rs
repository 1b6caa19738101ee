use crate::core::types::Coordinate;

/// Default per-axis tolerance, in the files' native units (metres for projected CRSs)
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// True if every axis differs by at most `tolerance` (inclusive).
///
/// This is a per-axis box test, not a Euclidean radius: a point 0.9 * tolerance
/// off on all three axes still matches.
#[must_use]
pub fn coordinates_match(a: &Coordinate, b: &Coordinate, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance
        && (a.y - b.y).abs() <= tolerance
        && (a.z - b.z).abs() <= tolerance
}
