use std::collections::HashMap;

use crate::core::types::{ControlPoint, Coordinate, IndexStrategy, TieBreak};
use crate::matching::control_points::ControlPointSet;
use crate::matching::tolerance::coordinates_match;

/// Scaled coordinates beyond this magnitude lose the sub-cell precision the grid
/// relies on; such lookups fall back to a linear scan.
const MAX_GRID_MAGNITUDE: f64 = (1u64 << 50) as f64;

type CellKey = (i64, i64, i64);

/// Finds the control point a query coordinate should be attributed to
pub struct CandidateFinder<'a> {
    control_points: &'a ControlPointSet,
    tolerance: f64,
    tie_break: TieBreak,
    grid: Option<Grid>,
}

impl<'a> CandidateFinder<'a> {
    pub fn new(
        control_points: &'a ControlPointSet,
        tolerance: f64,
        tie_break: TieBreak,
        strategy: IndexStrategy,
    ) -> Self {
        let grid = match strategy {
            IndexStrategy::Linear => None,
            IndexStrategy::Grid => Grid::build(control_points, tolerance),
        };

        Self {
            control_points,
            tolerance,
            tie_break,
            grid,
        }
    }

    /// True if lookups go through the grid
    #[must_use]
    pub fn uses_grid(&self) -> bool {
        self.grid.is_some()
    }

    /// The control point `query` matches, if any.
    ///
    /// With [`TieBreak::First`] this is the earliest control point in file order that
    /// lies within tolerance; with [`TieBreak::Nearest`] it is the closest one by
    /// Euclidean distance, earliest first on ties. Both strategies agree.
    pub fn find(&self, query: &Coordinate) -> Option<&'a ControlPoint> {
        let found = match &self.grid {
            Some(grid) => match grid.neighbourhood(query) {
                Some(candidates) => self.select(query, candidates),
                None => self.scan(query),
            },
            None => self.scan(query),
        };

        found.and_then(|idx| self.control_points.get(idx))
    }

    fn scan(&self, query: &Coordinate) -> Option<usize> {
        let points = self.control_points.as_slice();
        match self.tie_break {
            TieBreak::First => points
                .iter()
                .position(|cp| coordinates_match(query, &cp.coordinate, self.tolerance)),
            TieBreak::Nearest => self.select(query, 0..points.len()),
        }
    }

    fn select(&self, query: &Coordinate, candidates: impl Iterator<Item = usize>) -> Option<usize> {
        let points = self.control_points.as_slice();
        let mut best: Option<(usize, f64)> = None;

        for idx in candidates {
            let coordinate = &points[idx].coordinate;
            if !coordinates_match(query, coordinate, self.tolerance) {
                continue;
            }

            let distance = match self.tie_break {
                TieBreak::First => 0.0,
                TieBreak::Nearest => query.distance_squared(coordinate),
            };

            let better = match best {
                None => true,
                Some((best_idx, best_distance)) => {
                    distance < best_distance || (distance == best_distance && idx < best_idx)
                }
            };
            if better {
                best = Some((idx, distance));
            }
        }

        best.map(|(idx, _)| idx)
    }
}

/// Control points bucketed into cubic cells twice the tolerance wide, so any point
/// within tolerance of a query sits in the query's cell or one of its 26 neighbours.
struct Grid {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl Grid {
    fn build(control_points: &ControlPointSet, tolerance: f64) -> Option<Self> {
        let cell_size = if tolerance > 0.0 { 2.0 * tolerance } else { 1.0 };

        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for cp in control_points.iter() {
            let key = cell_key(&cp.coordinate, cell_size)?;
            cells.entry(key).or_default().push(cp.index);
        }

        Some(Self { cell_size, cells })
    }

    /// Indices of control points in the 3x3x3 block of cells around `query`
    fn neighbourhood<'g>(&'g self, query: &Coordinate) -> Option<impl Iterator<Item = usize> + 'g> {
        let (cx, cy, cz) = cell_key(query, self.cell_size)?;

        let mut keys = Vec::with_capacity(27);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    keys.push((cx + dx, cy + dy, cz + dz));
                }
            }
        }

        Some(
            keys.into_iter()
                .filter_map(move |key| self.cells.get(&key))
                .flat_map(|indices| indices.iter().copied()),
        )
    }
}

#[allow(clippy::cast_possible_truncation)] // bounded by MAX_GRID_MAGNITUDE
fn cell_key(coordinate: &Coordinate, cell_size: f64) -> Option<CellKey> {
    let scale = |v: f64| {
        let scaled = (v / cell_size).floor();
        (scaled.abs() <= MAX_GRID_MAGNITUDE).then_some(scaled as i64)
    };
    Some((
        scale(coordinate.x)?,
        scale(coordinate.y)?,
        scale(coordinate.z)?,
    ))
}
