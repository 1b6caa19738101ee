use thiserror::Error;

use crate::core::record::CoordinateRecord;
use crate::core::types::Coordinate;

/// Column indices of X, Y and Z in the first three fields of every row
pub const XYZ_COLUMNS: [usize; 3] = [0, 1, 2];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Line {line}: missing {axis} coordinate (column {column})")]
    MissingField {
        line: usize,
        axis: char,
        column: usize,
    },

    #[error("Line {line}: {axis} coordinate '{value}' is not a number")]
    NotNumeric {
        line: usize,
        axis: char,
        value: String,
    },

    #[error("Line {line}: {axis} coordinate '{value}' is not finite")]
    NotFinite {
        line: usize,
        axis: char,
        value: String,
    },
}

impl ParseError {
    /// Source line of the offending row
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::MissingField { line, .. }
            | Self::NotNumeric { line, .. }
            | Self::NotFinite { line, .. } => *line,
        }
    }
}

/// Parse the X, Y and Z fields at `columns` of a row
///
/// # Errors
///
/// Returns `ParseError::MissingField` if a column is out of range,
/// `ParseError::NotNumeric` if a field is not a decimal number, or
/// `ParseError::NotFinite` for `NaN` and infinities.
pub fn parse_coordinates(
    record: &CoordinateRecord,
    columns: [usize; 3],
) -> Result<Coordinate, ParseError> {
    let x = parse_axis(record, columns[0], 'X')?;
    let y = parse_axis(record, columns[1], 'Y')?;
    let z = parse_axis(record, columns[2], 'Z')?;
    Ok(Coordinate::new(x, y, z))
}

fn parse_axis(record: &CoordinateRecord, column: usize, axis: char) -> Result<f64, ParseError> {
    let raw = record.field(column).ok_or(ParseError::MissingField {
        line: record.line,
        axis,
        column,
    })?;

    let value: f64 = raw.trim().parse().map_err(|_| ParseError::NotNumeric {
        line: record.line,
        axis,
        value: raw.to_string(),
    })?;

    if !value.is_finite() {
        return Err(ParseError::NotFinite {
            line: record.line,
            axis,
            value: raw.to_string(),
        });
    }

    Ok(value)
}
