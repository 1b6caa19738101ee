use std::collections::HashMap;

use tracing::{debug, warn};

use crate::core::record::CoordinateRecord;
use crate::core::types::{ControlPoint, Coordinate};
use crate::parsing::coordinates::{parse_coordinates, ParseError, XYZ_COLUMNS};

/// Unique control points in first-occurrence order
#[derive(Debug, Clone, Default)]
pub struct ControlPointSet {
    points: Vec<ControlPoint>,

    /// Exact coordinate key -> position in `points`
    by_key: HashMap<(u64, u64, u64), usize>,

    /// Data rows read from the control-points file
    pub rows_read: usize,

    /// Rows whose triple was already present
    pub duplicates: usize,

    /// Rows with fewer than 3 fields, skipped silently
    pub short_rows: usize,

    /// Rows whose coordinates failed to parse
    pub warnings: Vec<ParseError>,
}

impl ControlPointSet {
    /// Build the set from the data rows of a control-points file.
    ///
    /// Rows with fewer than three fields are skipped without a warning; rows whose
    /// coordinates do not parse are skipped and recorded in `warnings`.
    #[must_use]
    pub fn from_records(records: &[CoordinateRecord]) -> Self {
        let mut set = Self {
            rows_read: records.len(),
            ..Self::default()
        };

        for record in records {
            if !record.has_coordinates() {
                set.short_rows += 1;
                continue;
            }

            match parse_coordinates(record, XYZ_COLUMNS) {
                Ok(coordinate) => {
                    if !set.insert(coordinate) {
                        set.duplicates += 1;
                    }
                }
                Err(e) => {
                    warn!("Skipping invalid control point row: {e}");
                    set.warnings.push(e);
                }
            }
        }

        debug!(
            "Built {} unique control points from {} rows ({} duplicates, {} short)",
            set.len(),
            set.rows_read,
            set.duplicates,
            set.short_rows
        );

        set
    }

    /// Insert a coordinate; returns false if an identical triple is already present
    pub fn insert(&mut self, coordinate: Coordinate) -> bool {
        let key = coordinate.exact_key();
        if self.by_key.contains_key(&key) {
            return false;
        }
        let index = self.points.len();
        self.points.push(ControlPoint::new(index, coordinate));
        self.by_key.insert(key, index);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ControlPoint> {
        self.points.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ControlPoint> {
        self.points.iter()
    }

    /// Axis-aligned bounding box (min corner, max corner) of all points
    #[must_use]
    pub fn bounds(&self) -> Option<(Coordinate, Coordinate)> {
        let first = self.points.first()?.coordinate;
        Some(self.points.iter().fold((first, first), |(lo, hi), cp| {
            let c = cp.coordinate;
            (
                Coordinate::new(lo.x.min(c.x), lo.y.min(c.y), lo.z.min(c.z)),
                Coordinate::new(hi.x.max(c.x), hi.y.max(c.y), hi.z.max(c.z)),
            )
        }))
    }
}

impl FromIterator<Coordinate> for ControlPointSet {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        let mut set = Self::default();
        for coordinate in iter {
            set.rows_read += 1;
            if !set.insert(coordinate) {
                set.duplicates += 1;
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(lines: &[&str]) -> Vec<CoordinateRecord> {
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| CoordinateRecord::from_line(i + 2, l))
            .collect()
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = ControlPointSet::from_records(&records(&[
            "100.0\t200.0\t5.0",
            "100.0\t200.0\t5.0\textra",
            "100.00\t200\t5",
        ]));
        assert_eq!(set.len(), 1);
        assert_eq!(set.duplicates, 2);
        assert_eq!(set.rows_read, 3);
    }

    #[test]
    fn test_close_points_not_merged() {
        let set = ControlPointSet::from_records(&records(&[
            "100.0\t200.0\t5.0",
            "100.0001\t200.0\t5.0",
        ]));
        assert_eq!(set.len(), 2);
        assert_eq!(set.duplicates, 0);
    }

    #[test]
    fn test_short_rows_skipped_silently() {
        let set = ControlPointSet::from_records(&records(&["1.0\t2.0", "solo", "1\t2\t3"]));
        assert_eq!(set.len(), 1);
        assert_eq!(set.short_rows, 2);
        assert!(set.warnings.is_empty());
    }

    #[test]
    fn test_invalid_rows_warn() {
        let set = ControlPointSet::from_records(&records(&["x\t2.0\t3.0", "1\t2\t3"]));
        assert_eq!(set.len(), 1);
        assert_eq!(set.warnings.len(), 1);
        assert_eq!(set.warnings[0].line(), 2);
    }

    #[test]
    fn test_first_occurrence_order() {
        let set = ControlPointSet::from_records(&records(&[
            "3\t3\t3",
            "1\t1\t1",
            "3\t3\t3",
            "2\t2\t2",
        ]));
        let xs: Vec<f64> = set.iter().map(|cp| cp.coordinate.x).collect();
        assert_eq!(xs, vec![3.0, 1.0, 2.0]);
        let indices: Vec<usize> = set.iter().map(|cp| cp.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_bounds() {
        let set = ControlPointSet::from_records(&records(&["1\t5\t-2", "3\t-1\t4", "2\t2\t2"]));
        let (lo, hi) = set.bounds().unwrap();
        assert_eq!(lo, Coordinate::new(1.0, -1.0, -2.0));
        assert_eq!(hi, Coordinate::new(3.0, 5.0, 4.0));
        assert!(ControlPointSet::default().bounds().is_none());
    }

    #[test]
    fn test_from_iterator() {
        let set: ControlPointSet = vec![
            Coordinate::new(1.0, 2.0, 3.0),
            Coordinate::new(1.0, 2.0, 3.0),
            Coordinate::new(4.0, 5.0, 6.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.duplicates, 1);
    }
}
