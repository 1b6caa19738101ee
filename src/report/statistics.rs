use std::collections::HashMap;

use serde::Serialize;

use crate::core::types::ControlPoint;

/// One GCP row attributed to a control point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRow {
    /// Line of the row in the GCP file
    pub line: usize,

    /// Value of the image column, if the row has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Rows matched to a single control point, in GCP file order
#[derive(Debug, Clone, Serialize)]
pub struct ControlPointMatches {
    pub control_point: ControlPoint,
    pub rows: Vec<MatchedRow>,
}

impl ControlPointMatches {
    /// Number of pictures (matched rows) for this control point
    #[must_use]
    pub fn pictures(&self) -> usize {
        self.rows.len()
    }

    /// Image identifiers of rows that carry one
    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(|r| r.image.as_deref())
    }
}

/// Matched rows grouped by control point, in the order control points were first hit
#[derive(Debug, Clone, Default)]
pub struct MatchStatistics {
    entries: Vec<ControlPointMatches>,
    by_control_point: HashMap<usize, usize>,
}

impl MatchStatistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, control_point: &ControlPoint, row: MatchedRow) {
        let entries = &mut self.entries;
        let slot = *self
            .by_control_point
            .entry(control_point.index)
            .or_insert_with(|| {
                entries.push(ControlPointMatches {
                    control_point: *control_point,
                    rows: Vec::new(),
                });
                entries.len() - 1
            });
        self.entries[slot].rows.push(row);
    }

    /// Number of distinct control points with at least one match
    #[must_use]
    pub fn matched_control_points(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[ControlPointMatches] {
        &self.entries
    }

    /// Total rows recorded across all control points
    #[cfg(test)]
    pub fn total_rows(&self) -> usize {
        self.entries.iter().map(ControlPointMatches::pictures).sum()
    }
}
