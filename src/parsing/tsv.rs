use std::fs::Permissions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::record::CoordinateRecord;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not valid UTF-8 text")]
    NotText(PathBuf),

    #[error("File is empty: {0}")]
    Empty(PathBuf),
}

#[derive(Error, Debug)]
#[error("Cannot write {path}: {source}")]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// A tab-delimited coordinate file: an opaque CRS header line followed by data rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularFile {
    /// First line of the file, without its line terminator
    pub header: String,

    /// Non-blank data lines, split on tab
    pub records: Vec<CoordinateRecord>,
}

/// Read a tab-delimited file with a one-line CRS header
///
/// # Errors
///
/// Returns `ReadError::NotFound` if the file does not exist, `ReadError::Io` if it
/// cannot be read, `ReadError::NotText` if it is not UTF-8, or `ReadError::Empty`
/// if it has no lines at all.
pub fn read_tabular_file(path: &Path) -> Result<TabularFile, ReadError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReadError::NotFound(path.to_path_buf())
        } else {
            ReadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let text = String::from_utf8(bytes).map_err(|_| ReadError::NotText(path.to_path_buf()))?;

    let file =
        parse_tabular_text(&text).ok_or_else(|| ReadError::Empty(path.to_path_buf()))?;

    debug!(
        "Read {} data rows from {}",
        file.records.len(),
        path.display()
    );

    Ok(file)
}

/// Split file text into header and data rows.
///
/// Returns `None` when the text has no lines. Blank data lines are skipped; the
/// remaining lines are trimmed before splitting on tab.
#[must_use]
pub fn parse_tabular_text(text: &str) -> Option<TabularFile> {
    let mut lines = text.lines();
    let header = lines.next()?.to_string();

    let records = lines
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            // Header is line 1, so the first data line is line 2
            Some(CoordinateRecord::from_line(i + 2, line))
        })
        .collect();

    Some(TabularFile { header, records })
}

/// Render a header and rows as file text, one tab-joined row per line
#[must_use]
pub fn render_tabular_text(header: &str, records: &[CoordinateRecord]) -> String {
    let mut out = String::with_capacity(header.len() + 1 + records.len() * 64);
    out.push_str(header);
    out.push('\n');
    for record in records {
        out.push_str(&record.to_tsv_line());
        out.push('\n');
    }
    out
}

/// Mode of a newly created output file, before the process umask
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Write a header and rows to `path`.
///
/// The text goes to a temporary file next to the destination which is then
/// renamed over it, so a failure never leaves a partially written output. An
/// existing destination keeps its permissions; a new one gets `0o644`.
///
/// # Errors
///
/// Returns `WriteError` if the destination is read-only, its directory is not
/// writable, or the rename fails.
pub fn write_tabular_file(
    path: &Path,
    header: &str,
    records: &[CoordinateRecord],
) -> Result<(), WriteError> {
    let wrap = |source: std::io::Error| WriteError {
        path: path.to_path_buf(),
        source,
    };

    let existing = match std::fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(wrap(e)),
    };

    // The rename would replace a read-only file without asking
    if existing.as_ref().is_some_and(Permissions::readonly) {
        return Err(wrap(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "destination is read-only",
        )));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".gcp-filter");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(NEW_FILE_MODE));
    }
    let tmp = builder.tempfile_in(dir).map_err(wrap)?;

    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions).map_err(wrap)?;
    }

    {
        let mut writer = BufWriter::new(tmp.as_file());
        writer
            .write_all(render_tabular_text(header, records).as_bytes())
            .map_err(wrap)?;
        writer.flush().map_err(wrap)?;
    }
    tmp.persist(path).map_err(|e| wrap(e.error))?;

    debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
