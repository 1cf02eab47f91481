//! Utility functions for SQLite storage operations.
//!
//! Dates are stored as `YYYY-MM-DD` text and timestamps as fixed-width RFC 3339
//! text in UTC, so lexical order in SQL matches chronological order.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::errors::StorageError;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        StorageError::SerializationError(format!("Invalid {} '{}': {}", field, value, e))
    })
}

pub fn parse_optional_date(
    value: Option<&str>,
    field: &str,
) -> Result<Option<NaiveDate>, StorageError> {
    value.map(|v| parse_date(v, field)).transpose()
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            StorageError::SerializationError(format!("Invalid {} '{}': {}", field, value, e))
        })
}

/// Parses a stored enum tag, naming the column in the error.
pub fn parse_tag<T>(
    value: &str,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, StorageError> {
    parse(value).ok_or_else(|| {
        StorageError::SerializationError(format!("Unknown {} '{}'", field, value))
    })
}
