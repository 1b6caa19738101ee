use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::record::CoordinateRecord;
use crate::core::types::{IndexStrategy, TieBreak};
use crate::matching::control_points::ControlPointSet;
use crate::matching::index::CandidateFinder;
use crate::matching::tolerance::DEFAULT_TOLERANCE;
use crate::parsing::coordinates::{parse_coordinates, ParseError, XYZ_COLUMNS};
use crate::report::statistics::{MatchStatistics, MatchedRow};

/// Zero-based column holding the image identifier of a GCP row
pub const DEFAULT_IMAGE_COLUMN: usize = 5;

/// Configuration for the filtering engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Maximum per-axis difference for a GCP row to match a control point
    pub tolerance: f64,
    /// Column recorded as the image identifier in statistics
    pub image_column: usize,
    /// Attribution rule when several control points are within tolerance
    pub tie_break: TieBreak,
    /// Candidate lookup strategy
    pub index: IndexStrategy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            image_column: DEFAULT_IMAGE_COLUMN,
            tie_break: TieBreak::default(),
            index: IndexStrategy::default(),
        }
    }
}

/// A GCP row dropped from the output because it could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowWarning {
    #[error("Line {line}: expected at least 3 fields, found {found}")]
    TooFewFields { line: usize, found: usize },

    #[error(transparent)]
    Invalid(#[from] ParseError),
}

impl RowWarning {
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::TooFewFields { line, .. } => *line,
            Self::Invalid(e) => e.line(),
        }
    }
}

impl Serialize for RowWarning {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("RowWarning", 2)?;
        s.serialize_field("line", &self.line())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

/// Result of filtering the rows of a GCP file
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Matched rows in GCP file order
    pub matched: Vec<CoordinateRecord>,

    /// Matched rows grouped per control point
    pub statistics: MatchStatistics,

    /// Rows skipped because they were short or unparseable
    pub warnings: Vec<RowWarning>,

    /// Data rows seen
    pub total_rows: usize,

    /// Rows with parseable coordinates
    pub valid_rows: usize,
}

/// Attributes GCP rows to control points within tolerance
pub struct FilterEngine<'a> {
    finder: CandidateFinder<'a>,
    config: FilterConfig,
}

impl<'a> FilterEngine<'a> {
    /// Create an engine with the default configuration
    pub fn new(control_points: &'a ControlPointSet) -> Self {
        Self::with_config(control_points, FilterConfig::default())
    }

    /// Create an engine with a custom configuration.
    ///
    /// The tolerance is used as given; validate it at the boundary first.
    pub fn with_config(control_points: &'a ControlPointSet, config: FilterConfig) -> Self {
        let finder = CandidateFinder::new(
            control_points,
            config.tolerance,
            config.tie_break,
            config.index,
        );
        if config.index == IndexStrategy::Grid && !finder.uses_grid() {
            debug!("Control points exceed the grid range, using a linear scan");
        }
        Self { finder, config }
    }

    /// Keep the rows that match a control point, in input order.
    ///
    /// Rows with fewer than three fields or unparseable coordinates are skipped with a
    /// warning; rows that match nothing are dropped silently.
    pub fn filter(&self, records: &[CoordinateRecord]) -> FilterOutcome {
        let mut outcome = FilterOutcome {
            total_rows: records.len(),
            ..FilterOutcome::default()
        };

        for record in records {
            if !record.has_coordinates() {
                let warning = RowWarning::TooFewFields {
                    line: record.line,
                    found: record.len(),
                };
                warn!("Skipping invalid GCP row: {warning}");
                outcome.warnings.push(warning);
                continue;
            }

            let coordinate = match parse_coordinates(record, XYZ_COLUMNS) {
                Ok(c) => c,
                Err(e) => {
                    warn!("Skipping invalid GCP row: {e}");
                    outcome.warnings.push(e.into());
                    continue;
                }
            };
            outcome.valid_rows += 1;

            let Some(control_point) = self.finder.find(&coordinate) else {
                continue;
            };

            outcome.statistics.record(
                control_point,
                MatchedRow {
                    line: record.line,
                    image: record.field(self.config.image_column).map(str::to_string),
                },
            );
            outcome.matched.push(record.clone());
        }

        debug!(
            "Matched {} of {} GCP rows ({} valid) against {} control points",
            outcome.matched.len(),
            outcome.total_rows,
            outcome.valid_rows,
            outcome.statistics.matched_control_points()
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::tsv::parse_tabular_text;

    fn control_points(text: &str) -> ControlPointSet {
        ControlPointSet::from_records(&parse_tabular_text(text).unwrap().records)
    }

    fn gcp_rows(text: &str) -> Vec<CoordinateRecord> {
        parse_tabular_text(text).unwrap().records
    }

    fn config(tolerance: f64) -> FilterConfig {
        FilterConfig {
            tolerance,
            ..FilterConfig::default()
        }
    }

    const GCP: &str = "EPSG:32633\n100.0\t200.0\t5.0\timgA\n100.002\t200.0\t5.0\timgB\n";
    const CPS: &str = "EPSG:32633\n100.0\t200.0\t5.0\n";

    #[test]
    fn test_both_rows_within_loose_tolerance() {
        let cps = control_points(CPS);
        let engine = FilterEngine::with_config(&cps, config(0.005));
        let outcome = engine.filter(&gcp_rows(GCP));

        assert_eq!(outcome.matched.len(), 2);
        assert_eq!(outcome.statistics.matched_control_points(), 1);
        assert_eq!(outcome.statistics.entries()[0].pictures(), 2);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_default_tolerance_keeps_first_row_only() {
        let cps = control_points(CPS);
        let engine = FilterEngine::new(&cps);
        let outcome = engine.filter(&gcp_rows(GCP));

        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].field(3), Some("imgA"));
        assert_eq!(outcome.total_rows, 2);
        assert_eq!(outcome.valid_rows, 2);
    }

    #[test]
    fn test_image_column_recorded() {
        let cps = control_points(CPS);
        let engine = FilterEngine::new(&cps);
        let outcome = engine.filter(&gcp_rows(
            "EPSG:32633\n100.0\t200.0\t5.0\tp1\t0.9\tIMG_0001.JPG\n100.0\t200.0\t5.0\tp1\n",
        ));

        let entry = &outcome.statistics.entries()[0];
        assert_eq!(entry.pictures(), 2);
        assert_eq!(entry.rows[0].image.as_deref(), Some("IMG_0001.JPG"));
        assert_eq!(entry.rows[1].image, None);
    }

    #[test]
    fn test_malformed_rows_warn_and_continue() {
        let cps = control_points(CPS);
        let engine = FilterEngine::new(&cps);
        let outcome = engine.filter(&gcp_rows(
            "EPSG:32633\nabc\t200.0\t5.0\n100.0\t200.0\n100.0\t200.0\t5.0\timg\n",
        ));

        assert_eq!(outcome.total_rows, 3);
        assert_eq!(outcome.valid_rows, 1);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.warnings.len(), 2);
        assert!(matches!(outcome.warnings[0], RowWarning::Invalid(_)));
        assert_eq!(
            outcome.warnings[1],
            RowWarning::TooFewFields { line: 3, found: 2 }
        );
    }

    #[test]
    fn test_unmatched_rows_dropped_silently() {
        let cps = control_points(CPS);
        let engine = FilterEngine::new(&cps);
        let outcome = engine.filter(&gcp_rows("EPSG:32633\n0\t0\t0\n1\t1\t1\n"));

        assert!(outcome.matched.is_empty());
        assert!(outcome.warnings.is_empty());
        assert!(outcome.statistics.is_empty());
        assert_eq!(outcome.valid_rows, 2);
    }

    #[test]
    fn test_preserves_gcp_order() {
        let cps = control_points("EPSG:32633\n2\t2\t2\n1\t1\t1\n");
        let engine = FilterEngine::new(&cps);
        let outcome = engine.filter(&gcp_rows("EPSG:32633\n1\t1\t1\tA\n9\t9\t9\tB\n2\t2\t2\tC\n1\t1\t1\tD\n"));

        let tags: Vec<_> = outcome.matched.iter().map(|r| r.field(3).unwrap()).collect();
        assert_eq!(tags, vec!["A", "C", "D"]);

        // Statistics follow first-hit order, not control point file order
        assert_eq!(outcome.statistics.entries()[0].control_point.index, 1);
    }

    #[test]
    fn test_ambiguous_row_attributed_once() {
        let cps = control_points("EPSG:32633\n0.003\t0\t0\n0\t0\t0\n");
        let row = "EPSG:32633\n0.001\t0\t0\n";

        let first = FilterEngine::with_config(&cps, config(0.005)).filter(&gcp_rows(row));
        assert_eq!(first.matched.len(), 1);
        assert_eq!(first.statistics.total_rows(), 1);
        assert_eq!(first.statistics.entries()[0].control_point.index, 0);

        let nearest = FilterEngine::with_config(
            &cps,
            FilterConfig {
                tie_break: TieBreak::Nearest,
                ..config(0.005)
            },
        )
        .filter(&gcp_rows(row));
        assert_eq!(nearest.statistics.entries()[0].control_point.index, 1);
    }

    #[test]
    fn test_row_count_invariant() {
        let cps = control_points(CPS);
        let engine = FilterEngine::with_config(&cps, config(0.01));
        let outcome = engine.filter(&gcp_rows(
            "EPSG:32633\n100\t200\t5\nx\ty\tz\n100.001\t200\t5\n1\n300\t200\t5\n",
        ));

        assert!(outcome.matched.len() <= outcome.valid_rows);
        assert!(outcome.valid_rows <= outcome.total_rows);
        assert_eq!(
            (outcome.matched.len(), outcome.valid_rows, outcome.total_rows),
            (2, 3, 5)
        );
    }

    #[test]
    fn test_grid_index_same_outcome() {
        let cps = control_points("EPSG:32633\n10\t10\t1\n10.004\t10\t1\n20\t20\t2\n");
        let rows = gcp_rows("EPSG:32633\n10.002\t10\t1\ta\n20.001\t19.999\t2\tb\n15\t15\t1\tc\n");

        let linear = FilterEngine::with_config(&cps, config(0.005)).filter(&rows);
        let grid = FilterEngine::with_config(
            &cps,
            FilterConfig {
                index: IndexStrategy::Grid,
                ..config(0.005)
            },
        )
        .filter(&rows);

        assert_eq!(linear.matched, grid.matched);
        assert_eq!(
            linear.statistics.entries()[0].control_point.index,
            grid.statistics.entries()[0].control_point.index
        );
    }

    #[test]
    fn test_warning_serializes_line_and_message() {
        let warning = RowWarning::TooFewFields { line: 7, found: 1 };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["line"], 7);
        assert_eq!(
            json["message"],
            "Line 7: expected at least 3 fields, found 1"
        );
    }
}
