#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Year-over-year aggregation over road layout count tables.
//!
//! [`percent_change`] turns a [`YearlyCategoryTable`] into a
//! [`PercentChangeSeries`]. Unknown counts propagate as `None` instead of
//! being treated as zero. The fixed reference table behind the chart page
//! lives in [`reference`].

pub mod reference;

use accident_map_analytics_models::{
    CategoryChange, PercentChangeSeries, YearChange, YearlyCategoryTable,
};
use thiserror::Error;

/// Errors that can occur while loading count tables.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Reading a table file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table is not valid TOML or has the wrong shape.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A year key is not an integer.
    #[error("Invalid year '{value}'")]
    InvalidYear {
        /// The offending key.
        value: String,
    },

    /// A category key is not a known road layout.
    #[error("Unknown road layout '{value}'")]
    UnknownCategory {
        /// The offending key.
        value: String,
    },
}

/// Computes the year-over-year percentage change for every category row.
///
/// Each year column is compared against the previous column:
/// `(current - previous) / previous * 100`. The first column, columns where
/// either count is unknown, and columns whose previous count is zero all
/// yield `None`.
#[must_use]
pub fn percent_change(table: &YearlyCategoryTable) -> PercentChangeSeries {
    let years: Vec<i32> = table.years().collect();

    let categories = table
        .categories()
        .map(|category| {
            let changes = years
                .iter()
                .enumerate()
                .map(|(i, &year)| {
                    let percent_change = i.checked_sub(1).and_then(|prev| {
                        let previous = table.get(years[prev], category)?;
                        let current = table.get(year, category)?;
                        change_between(previous, current)
                    });
                    YearChange {
                        year,
                        percent_change,
                    }
                })
                .collect();

            CategoryChange { category, changes }
        })
        .collect();

    PercentChangeSeries { years, categories }
}

#[allow(clippy::cast_precision_loss)]
fn change_between(previous: u64, current: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 - previous as f64) / previous as f64 * 100.0)
}
