#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Yearly layout count tables and percent-change series.
//!
//! A [`YearlyCategoryTable`] is a sparse year-by-category count matrix. A
//! cell that was never inserted is *unknown*, which is distinct from a
//! recorded count of zero.

use std::collections::{BTreeMap, BTreeSet};

use accident_map_accident_models::LayoutCategory;
use serde::{Deserialize, Serialize};

/// Accident counts keyed by year (columns) and road layout (rows).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearlyCategoryTable {
    years: BTreeSet<i32>,
    counts: BTreeMap<LayoutCategory, BTreeMap<i32, u64>>,
}

impl YearlyCategoryTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a year column, even if no category has a count for it.
    pub fn insert_year(&mut self, year: i32) {
        self.years.insert(year);
    }

    /// Records the count for `category` in `year`, replacing any previous
    /// value.
    pub fn insert(&mut self, year: i32, category: LayoutCategory, count: u64) {
        self.years.insert(year);
        self.counts.entry(category).or_default().insert(year, count);
    }

    /// Returns the recorded count, or `None` when the cell is unknown.
    #[must_use]
    pub fn get(&self, year: i32, category: LayoutCategory) -> Option<u64> {
        self.counts.get(&category)?.get(&year).copied()
    }

    /// Year columns in ascending order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.iter().copied()
    }

    /// Category rows in taxonomy order. Only categories with at least one
    /// recorded count are listed.
    pub fn categories(&self) -> impl Iterator<Item = LayoutCategory> + '_ {
        self.counts.keys().copied()
    }

    /// Whether the table has no year columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

impl FromIterator<(i32, LayoutCategory, u64)> for YearlyCategoryTable {
    fn from_iter<I: IntoIterator<Item = (i32, LayoutCategory, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (year, category, count) in iter {
            table.insert(year, category, count);
        }
        table
    }
}

/// Year-over-year change for a single year column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearChange {
    /// Year column.
    pub year: i32,
    /// Percentage change from the previous year column, `None` when either
    /// count is unknown or there is no previous column.
    pub percent_change: Option<f64>,
}

/// Percentage changes for a single road layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChange {
    /// Road layout.
    pub category: LayoutCategory,
    /// One entry per year column, ascending.
    pub changes: Vec<YearChange>,
}

/// Year-over-year percentage changes for every category of a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentChangeSeries {
    /// Year columns, ascending.
    pub years: Vec<i32>,
    /// One row per category, in taxonomy order.
    pub categories: Vec<CategoryChange>,
}

impl PercentChangeSeries {
    /// Looks up the change for `category` in `year`.
    ///
    /// The outer `Option` is `None` when the row or column does not exist.
    #[must_use]
    pub fn change(&self, category: LayoutCategory, year: i32) -> Option<Option<f64>> {
        self.categories
            .iter()
            .find(|row| row.category == category)?
            .changes
            .iter()
            .find(|c| c.year == year)
            .map(|c| c.percent_change)
    }
}
