//! Delimited-line grammar helpers shared by the record codecs.
//!
//! One record per line, fields separated by [`DELIMITER`]. The grammar has
//! no escaping, so field validation rejects values containing the delimiter
//! before they ever reach a table.

use crate::error::StoreError;

/// Field separator within a record line.
pub(crate) const DELIMITER: char = ',';

/// Splits a line into its raw fields.
pub(crate) fn split_fields(line: &str) -> Vec<&str> {
    line.split(DELIMITER).collect()
}

/// Joins encoded fields into one record line.
pub(crate) fn join_fields(fields: &[String]) -> String {
    fields.join(",")
}

/// Builds a `MalformedRecord` error for the given record kind.
pub(crate) fn malformed(kind: &'static str, reason: impl Into<String>) -> StoreError {
    StoreError::MalformedRecord {
        kind,
        reason: reason.into(),
    }
}

/// Parses a non-negative integer field.
pub(crate) fn parse_int<T>(
    kind: &'static str,
    field: &'static str,
    raw: &str,
) -> Result<T, StoreError>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    raw.parse::<T>().map_err(|_| {
        malformed(
            kind,
            format!("field '{}' is not a non-negative integer: '{}'", field, raw),
        )
    })
}

/// Parses a finite, non-negative real field.
pub(crate) fn parse_real(
    kind: &'static str,
    field: &'static str,
    raw: &str,
) -> Result<f32, StoreError> {
    let value = raw.parse::<f32>().map_err(|_| {
        malformed(
            kind,
            format!("field '{}' is not a number: '{}'", field, raw),
        )
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(malformed(
            kind,
            format!("field '{}' must be a finite non-negative number: '{}'", field, raw),
        ));
    }
    Ok(value)
}
