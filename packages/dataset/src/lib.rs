#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident dataset loading and request filtering.
//!
//! [`Dataset::load`] reads the accident CSV into typed
//! [`AccidentRecord`]s. Every request gets its own freshly loaded
//! [`Dataset`], which [`filter::apply`] then narrows using a
//! [`FilterCriteria`] parsed from untrusted form input.

pub mod filter;
pub mod load;
pub mod parsing;

use std::path::PathBuf;

use accident_map_accident_models::AccidentRecord;

pub use filter::{FilterCriteria, apply};

/// Errors that make the dataset unavailable.
///
/// Loading is all-or-nothing: any of these aborts the whole load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The CSV file could not be opened.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV stream itself is malformed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
    },

    /// A row contains a value that cannot be coerced.
    #[error("Invalid row on line {line}: {message}")]
    InvalidRow {
        /// 1-based CSV line number.
        line: u64,
        /// Description of what went wrong.
        message: String,
    },
}

/// Errors produced while parsing filter input from a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// A date bound is not a `YYYY-MM-DD` date.
    #[error("Invalid {field} '{value}': expected a date in YYYY-MM-DD format")]
    InvalidDate {
        /// Form field name.
        field: &'static str,
        /// Raw submitted value.
        value: String,
    },

    /// The road filter is not a finite number.
    #[error("Invalid road filter '{value}': expected a number")]
    InvalidRoadId {
        /// Raw submitted value.
        value: String,
    },
}

/// An owned, ordered set of accident records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<AccidentRecord>,
}

impl Dataset {
    /// Wraps already-parsed records.
    #[must_use]
    pub const fn new(records: Vec<AccidentRecord>) -> Self {
        Self { records }
    }

    /// Returns the records in load order.
    #[must_use]
    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    /// Consumes the dataset, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<AccidentRecord> {
        self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, AccidentRecord> {
        self.records.iter()
    }
}

impl From<Vec<AccidentRecord>> for Dataset {
    fn from(records: Vec<AccidentRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a AccidentRecord;
    type IntoIter = std::slice::Iter<'a, AccidentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
