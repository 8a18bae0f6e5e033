//! Reference road layout counts, loaded from TOML.
//!
//! The default table is baked into the binary via [`include_str!`]. An
//! operator can point the server at a replacement file with the same
//! layout:
//!
//! ```toml
//! [years.2017]
//! "Reta" = 158
//! "Curva" = 57
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use accident_map_accident_models::LayoutCategory;
use accident_map_analytics_models::YearlyCategoryTable;
use serde::Deserialize;

use crate::AnalyticsError;

/// Reference table embedded at compile time.
const REFERENCE_TOML: &str = include_str!("../reference/tracado_via.toml");

#[derive(Debug, Deserialize)]
struct TableFile {
    years: BTreeMap<String, BTreeMap<String, u64>>,
}

/// Parses the embedded 2017–2022 reference table.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the embedded TOML is malformed.
pub fn reference_table() -> Result<YearlyCategoryTable, AnalyticsError> {
    parse_table(REFERENCE_TOML)
}

/// Reads and parses a table file.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the file cannot be read or parsed.
pub fn load_table(path: &Path) -> Result<YearlyCategoryTable, AnalyticsError> {
    let contents = std::fs::read_to_string(path)?;
    let table = parse_table(&contents)?;
    log::debug!(
        "Loaded reference table from {} ({} years)",
        path.display(),
        table.years().count()
    );
    Ok(table)
}

/// Parses a table from its TOML source.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the TOML is malformed, a year key is not an
/// integer, or a category key is not a known road layout.
pub fn parse_table(toml_str: &str) -> Result<YearlyCategoryTable, AnalyticsError> {
    let file: TableFile = toml::from_str(toml_str)?;
    let mut table = YearlyCategoryTable::new();

    for (year_key, counts) in file.years {
        let year: i32 = year_key
            .trim()
            .parse()
            .map_err(|_| AnalyticsError::InvalidYear {
                value: year_key.clone(),
            })?;
        table.insert_year(year);

        for (label, count) in counts {
            let category: LayoutCategory =
                label
                    .parse()
                    .map_err(|_| AnalyticsError::UnknownCategory {
                        value: label.clone(),
                    })?;
            table.insert(year, category, count);
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::percent_change;

    #[test]
    fn embedded_table_parses() {
        let table = reference_table().unwrap();
        assert_eq!(
            table.years().collect::<Vec<_>>(),
            [2017, 2018, 2019, 2020, 2021, 2022]
        );
        assert_eq!(table.categories().count(), LayoutCategory::all().len());
    }

    #[test]
    fn embedded_table_has_known_counts() {
        let table = reference_table().unwrap();
        assert_eq!(table.get(2017, LayoutCategory::Reta), Some(158));
        assert_eq!(table.get(2022, LayoutCategory::NaoInformado), Some(90));
        assert_eq!(table.get(2020, LayoutCategory::Tunel), Some(2));
        assert_eq!(table.get(2018, LayoutCategory::Ponte), None);
        assert_eq!(table.get(2021, LayoutCategory::Viaduto), None);
    }

    #[test]
    fn reference_ponte_changes_are_unknown_after_gaps() {
        let series = percent_change(&reference_table().unwrap());
        assert_eq!(series.change(LayoutCategory::Ponte, 2017), Some(None));
        assert_eq!(series.change(LayoutCategory::Ponte, 2018), Some(None));
        assert_eq!(series.change(LayoutCategory::Ponte, 2019), Some(None));
        let reta = series.change(LayoutCategory::Reta, 2022).flatten().unwrap();
        assert!((reta - 86.956_521_7).abs() < 1e-6, "{reta}");
    }

    #[test]
    fn rejects_unknown_category() {
        let err = parse_table("[years.2017]\n\"Estrada\" = 3\n").unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownCategory { value } if value == "Estrada"));
    }

    #[test]
    fn rejects_non_integer_year() {
        let err = parse_table("[years.recent]\n\"Reta\" = 3\n").unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidYear { .. }));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            parse_table("years = 3"),
            Err(AnalyticsError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_table(Path::new("/nonexistent/table.toml")).unwrap_err();
        assert!(matches!(err, AnalyticsError::Io(_)));
    }
}
