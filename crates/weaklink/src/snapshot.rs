//! Loading connection exports.
//!
//! Inventory exports are JSON Lines files, one [`ConnectionRecord`] per line:
//!
//! ```text
//! {"from":"olt-1","to":"splitter-4","label":"fiber-22","status":"Up"}
//! {"from":"splitter-4","to":"ont-9","label":"drop-3","status":"Down","circuits":["c-17"]}
//! ```
//!
//! Loading is resilient: a bad line is skipped and reported as a
//! [`LoadWarning`] instead of failing the whole file.

use crate::domain::ConnectionRecord;
use crate::error::Result;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A non-fatal problem found while loading an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// Line is not a valid connection record
    ///
    /// **Effect**: the line is skipped.
    MalformedJson {
        /// 1-based line number
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// Record has an empty `from` or `to` key
    ///
    /// **Effect**: the line is skipped.
    MissingEndpoint {
        /// 1-based line number
        line_number: usize,
    },

    /// Record has no operational status
    ///
    /// **Effect**: the record is kept but is not traversable.
    MissingStatus {
        /// 1-based line number
        line_number: usize,
    },
}

impl LoadWarning {
    /// 1-based line the warning refers to.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. }
            | Self::MissingEndpoint { line_number }
            | Self::MissingStatus { line_number } => *line_number,
        }
    }
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed record: {error}")
            }
            Self::MissingEndpoint { line_number } => {
                write!(f, "line {line_number}: record has an empty endpoint key")
            }
            Self::MissingStatus { line_number } => {
                write!(f, "line {line_number}: record has no status, treated as not up")
            }
        }
    }
}

/// Read a JSON Lines connection export.
///
/// Blank lines are ignored. Records without a status are kept as not
/// traversable and reported. Returns the parsed records in file order together
/// with a warning for every skipped line.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the file cannot be opened or read.
pub fn load_connections(path: &Path) -> Result<(Vec<ConnectionRecord>, Vec<LoadWarning>)> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<ConnectionRecord>(trimmed) {
            Ok(record) if record.from.as_str().is_empty() || record.to.as_str().is_empty() => {
                warnings.push(LoadWarning::MissingEndpoint { line_number });
            }
            Ok(record) => {
                if record.is_status_missing() {
                    warnings.push(LoadWarning::MissingStatus { line_number });
                }
                records.push(record);
            }
            Err(e) => warnings.push(LoadWarning::MalformedJson {
                line_number,
                error: e.to_string(),
            }),
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            path = %path.display(),
            skipped = warnings.len(),
            "skipped invalid lines in connection export"
        );
    }
    tracing::debug!(path = %path.display(), records = records.len(), "loaded connections");

    Ok((records, warnings))
}
