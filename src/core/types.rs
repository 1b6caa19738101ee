use serde::{Deserialize, Serialize};

/// An (X, Y, Z) position in the file's native units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Largest per-axis absolute difference (Chebyshev distance)
    #[cfg(test)]
    pub fn max_axis_delta(&self, other: &Coordinate) -> f64 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }

    /// Squared Euclidean distance, used to rank in-tolerance candidates
    #[must_use]
    pub fn distance_squared(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Bit-exact identity of the triple. `-0.0` and `0.0` share a key.
    #[must_use]
    pub fn exact_key(&self) -> (u64, u64, u64) {
        (
            canonical_bits(self.x),
            canonical_bits(self.y),
            canonical_bits(self.z),
        )
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// A unique surveyed control point from the control-points file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Position of first occurrence among the unique control points
    pub index: usize,

    pub coordinate: Coordinate,
}

impl ControlPoint {
    #[must_use]
    pub fn new(index: usize, coordinate: Coordinate) -> Self {
        Self { index, coordinate }
    }

    /// 1-based label used in reports (CP1, CP2, ...)
    #[must_use]
    pub fn label(&self) -> String {
        format!("CP{}", self.index + 1)
    }
}

/// How to attribute a GCP row that lies within tolerance of several control points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// First control point in control-points file order
    #[default]
    First,
    /// Smallest Euclidean distance, ties resolved by file order
    Nearest,
}

/// How candidate control points are looked up for each GCP row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum IndexStrategy {
    /// Compare every GCP row against every control point
    #[default]
    Linear,
    /// Bucket control points on a grid sized from the tolerance
    Grid,
}
