//! Loading of the animal standards and feed composition tables.
//!
//! Both tables are CSV files with a header row. The header is checked against
//! the record's known columns before any row is deserialized, so a missing or
//! unexpected column fails up front instead of on first use.

use crate::domain::model::{AnimalStandard, Feed};
use crate::domain::ports::Storage;
use crate::utils::error::{RationError, Result};
use serde::de::DeserializeOwned;

/// The two reference tables, loaded once per invocation and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub standards: Vec<AnimalStandard>,
    pub feeds: Vec<Feed>,
}

impl ReferenceData {
    pub fn new(standards: Vec<AnimalStandard>, feeds: Vec<Feed>) -> Self {
        Self { standards, feeds }
    }

    pub fn load<S: Storage>(storage: &S, standards_path: &str, feeds_path: &str) -> Result<Self> {
        // Both locations must exist before either is parsed.
        let standards_raw = storage.read_file(standards_path)?;
        let feeds_raw = storage.read_file(feeds_path)?;

        let standards = parse_table::<AnimalStandard>(
            standards_path,
            &standards_raw,
            AnimalStandard::REQUIRED_COLUMNS,
            AnimalStandard::OPTIONAL_COLUMNS,
        )?;
        let feeds = parse_table::<Feed>(
            feeds_path,
            &feeds_raw,
            Feed::REQUIRED_COLUMNS,
            Feed::OPTIONAL_COLUMNS,
        )?;

        tracing::debug!(
            "Loaded {} animal standards from {} and {} feeds from {}",
            standards.len(),
            standards_path,
            feeds.len(),
            feeds_path
        );

        Ok(Self::new(standards, feeds))
    }
}

/// Parses CSV bytes into typed rows, validating the header first.
///
/// Every field is trimmed, which gives identifiers their canonical form.
pub fn parse_table<T: DeserializeOwned>(
    path: &str,
    data: &[u8],
    required: &[&str],
    optional: &[&str],
) -> Result<Vec<T>> {
    let parse_error = |message: String| RationError::Parse {
        path: path.to_string(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| parse_error(e.to_string()))?
        .clone();
    validate_headers(&headers, required, optional).map_err(parse_error)?;

    let mut rows = Vec::new();
    for record in reader.deserialize::<T>() {
        rows.push(record.map_err(|e| parse_error(e.to_string()))?);
    }
    Ok(rows)
}

fn validate_headers(
    headers: &csv::StringRecord,
    required: &[&str],
    optional: &[&str],
) -> std::result::Result<(), String> {
    let present: Vec<&str> = headers.iter().collect();

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !present.contains(column))
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing required column(s): {}", missing.join(", ")));
    }

    let unknown: Vec<&str> = present
        .iter()
        .copied()
        .filter(|column| !required.contains(column) && !optional.contains(column))
        .collect();
    if !unknown.is_empty() {
        return Err(format!("unexpected column(s): {}", unknown.join(", ")));
    }

    let mut seen = Vec::with_capacity(present.len());
    for column in &present {
        if seen.contains(column) {
            return Err(format!("duplicate column: {}", column));
        }
        seen.push(*column);
    }

    Ok(())
}
