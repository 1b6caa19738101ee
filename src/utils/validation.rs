//! Centralized validation of run configuration.

use std::path::{Path, PathBuf};

use crate::core::record::MIN_COORDINATE_FIELDS;

/// Configuration validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No {0} path given")]
    MissingPath(&'static str),

    #[error("{role} not found: {path}")]
    InputNotFound { role: &'static str, path: PathBuf },

    #[error("{role} is not a regular file: {path}")]
    InputNotAFile { role: &'static str, path: PathBuf },

    #[error("Output path would overwrite the {role}: {path}")]
    OutputIsInput { role: &'static str, path: PathBuf },

    #[error("Tolerance must not be negative, got {0}")]
    NegativeTolerance(f64),

    #[error("Tolerance must be a finite number, got {0}")]
    NonFiniteTolerance(f64),

    #[error("Image column {0} overlaps the X/Y/Z columns")]
    ImageColumnOverlapsCoordinates(usize),
}

/// Check a tolerance value.
///
/// Zero is accepted and means exact per-axis equality.
///
/// # Examples
///
/// ```
/// use gcp_filter::utils::validation::validate_tolerance;
///
/// assert!(validate_tolerance(0.001).is_ok());
/// assert!(validate_tolerance(0.0).is_ok());
/// assert!(validate_tolerance(-0.001).is_err());
/// assert!(validate_tolerance(f64::NAN).is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::NonFiniteTolerance` for `NaN` and infinities, and
/// `ValidationError::NegativeTolerance` for values below zero.
pub fn validate_tolerance(tolerance: f64) -> Result<f64, ValidationError> {
    if !tolerance.is_finite() {
        return Err(ValidationError::NonFiniteTolerance(tolerance));
    }
    if tolerance < 0.0 {
        return Err(ValidationError::NegativeTolerance(tolerance));
    }
    Ok(tolerance)
}

/// Check that the image column does not point at a coordinate column
///
/// # Errors
///
/// Returns `ValidationError::ImageColumnOverlapsCoordinates` for columns 0-2.
pub fn validate_image_column(column: usize) -> Result<usize, ValidationError> {
    if column < MIN_COORDINATE_FIELDS {
        return Err(ValidationError::ImageColumnOverlapsCoordinates(column));
    }
    Ok(column)
}

/// Check that an input path is given and names an existing regular file
///
/// # Errors
///
/// Returns `ValidationError::MissingPath` for an empty path,
/// `ValidationError::InputNotFound` if nothing exists there, or
/// `ValidationError::InputNotAFile` for directories and the like.
pub fn validate_input_path(role: &'static str, path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::MissingPath(role));
    }
    if !path.exists() {
        return Err(ValidationError::InputNotFound {
            role,
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(ValidationError::InputNotAFile {
            role,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Check that an output path is given and does not name one of the inputs
///
/// # Errors
///
/// Returns `ValidationError::MissingPath` for an empty path or
/// `ValidationError::OutputIsInput` if it resolves to one of `inputs`.
pub fn validate_output_path(
    path: &Path,
    inputs: &[(&'static str, &Path)],
) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::MissingPath("output file"));
    }

    for &(role, input) in inputs {
        if same_file(path, input) {
            return Err(ValidationError::OutputIsInput {
                role,
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
