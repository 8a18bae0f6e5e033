//! Date-range and road filters applied to a loaded [`Dataset`].

use accident_map_accident_models::AccidentRecord;
use chrono::NaiveDate;

use crate::parsing::{parse_finite, parse_form_date};
use crate::{Dataset, FilterError};

/// Parsed, validated filter parameters.
///
/// Both predicates are optional and compose conjunctively.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterCriteria {
    /// Inclusive `(start, end)` date bounds.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Exact federal highway number to match.
    pub road_id: Option<f64>,
}

impl FilterCriteria {
    /// Builds criteria from raw form input.
    ///
    /// Blank fields count as absent. The date range only applies when both
    /// bounds are given; a lone bound is still validated but otherwise
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if a supplied date is not `YYYY-MM-DD` or the
    /// road filter is not a finite number.
    pub fn parse(
        start_date: Option<&str>,
        end_date: Option<&str>,
        br_filter: Option<&str>,
    ) -> Result<Self, FilterError> {
        let start = non_blank(start_date)
            .map(|s| parse_date_field("start_date", s))
            .transpose()?;
        let end = non_blank(end_date)
            .map(|s| parse_date_field("end_date", s))
            .transpose()?;

        let date_range = match (start, end) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            (start, end) => {
                log::debug!("Ignoring partial date range start={start:?} end={end:?}");
                None
            }
        };

        let road_id = non_blank(br_filter)
            .map(|s| {
                parse_finite(s).ok_or_else(|| FilterError::InvalidRoadId {
                    value: s.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            date_range,
            road_id,
        })
    }

    /// Whether no predicate is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.date_range.is_none() && self.road_id.is_none()
    }

    /// Whether `record` satisfies every set predicate.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn matches(&self, record: &AccidentRecord) -> bool {
        if let Some((start, end)) = self.date_range
            && (record.date < start || record.date > end)
        {
            return false;
        }

        if let Some(road_id) = self.road_id
            && record.road_id != Some(road_id)
        {
            return false;
        }

        true
    }
}

/// Narrows `dataset` to the records matching `criteria`.
///
/// With no predicates set the dataset is returned as-is. An empty result is
/// a valid outcome.
#[must_use]
pub fn apply(dataset: Dataset, criteria: &FilterCriteria) -> Dataset {
    if criteria.is_empty() {
        return dataset;
    }

    let before = dataset.len();
    let mut records = dataset.into_records();
    records.retain(|record| criteria.matches(record));

    log::debug!(
        "Filter {criteria:?} kept {} of {before} records",
        records.len()
    );

    Dataset::new(records)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date_field(field: &'static str, value: &str) -> Result<NaiveDate, FilterError> {
    parse_form_date(value).ok_or_else(|| FilterError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
