//! CSV loader for the accident dataset.
//!
//! Columns are matched by header name. `date`, `latitude`, `longitude` and
//! `br` are required; `tracado_via` is optional and any other column is
//! ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use accident_map_accident_models::AccidentRecord;
use serde::Deserialize;

use crate::parsing::{parse_finite, parse_record_date};
use crate::{Dataset, LoadError};

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: &[&str] = &["date", "latitude", "longitude", "br"];

/// Row as it appears in the CSV, before type coercion.
#[derive(Debug, Deserialize)]
struct RawAccidentRow {
    date: String,
    latitude: String,
    longitude: String,
    br: String,
    #[serde(default)]
    tracado_via: String,
}

impl Dataset {
    /// Loads the accident CSV at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be opened, a required column
    /// is missing, or any row fails to coerce.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_reader(file)?;

        log::debug!(
            "Loaded {} accident records from {}",
            dataset.len(),
            path.display()
        );

        Ok(dataset)
    }

    /// Parses accident records from any CSV byte stream.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if a required column is missing or any row
    /// fails to coerce.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();

        for &column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(LoadError::MissingColumn { column });
            }
        }

        let mut records = Vec::new();

        for result in reader.records() {
            let row = result?;
            let line = row.position().map_or(0, csv::Position::line);
            let raw: RawAccidentRow = row.deserialize(Some(&headers))?;
            let record =
                coerce_row(raw).map_err(|message| LoadError::InvalidRow { line, message })?;
            records.push(record);
        }

        Ok(Self::new(records))
    }
}

/// Coerces a raw row into a typed record.
fn coerce_row(raw: RawAccidentRow) -> Result<AccidentRecord, String> {
    let date = parse_record_date(&raw.date)
        .ok_or_else(|| format!("unparseable date '{}'", raw.date))?;

    let latitude = parse_finite(&raw.latitude)
        .ok_or_else(|| format!("invalid latitude '{}'", raw.latitude))?;

    let longitude = parse_finite(&raw.longitude)
        .ok_or_else(|| format!("invalid longitude '{}'", raw.longitude))?;

    let road_id = if raw.br.is_empty() {
        None
    } else {
        Some(parse_finite(&raw.br).ok_or_else(|| format!("invalid br '{}'", raw.br))?)
    };

    Ok(AccidentRecord {
        date,
        latitude,
        longitude,
        road_id,
        layout: raw.tracado_via,
    })
}
