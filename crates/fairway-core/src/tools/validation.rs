//! Input validation for tool arguments
//!
//! Every tool checks its arguments before a request spec is built, so a
//! rejected invocation never reaches the network.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use thiserror::Error;

use crate::identifiers::Identifier;
use crate::shaper::Pagination;

/// Longest accepted name for events, divisions and rounds
pub const MAX_NAME_LEN: usize = 255;

/// Page size bounds for list endpoints
pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Formats accepted by result endpoints
pub const RESULT_FORMATS: [&str; 3] = ["json", "html", "xml"];

/// A rejected tool invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be a positive integer.")]
    NonPositiveId { field: &'static str },

    #[error("{field} must be in YYYY-MM-DD format, got '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("{field} must be a time in HH:MM or hh:mm AM/PM format, got '{value}'")]
    InvalidTime { field: &'static str, value: String },

    #[error("Invalid email format: '{value}'")]
    InvalidEmail { value: String },

    #[error("{field} cannot be empty")]
    Blank { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("players[{index}] must be a player id or a player object")]
    InvalidPlayer { index: usize },

    #[error("{field} must contain at least one entry")]
    EmptyList { field: &'static str },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("No fields provided to update.")]
    NoFields,

    #[error("format must be one of: {}", RESULT_FORMATS.join(", "))]
    InvalidFormat { value: String },

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Unknown tool '{name}'")]
    UnknownTool { name: String },
}

pub fn positive_id(field: &'static str, id: &Identifier) -> Result<(), ValidationError> {
    if id.is_positive() {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveId { field })
    }
}

pub fn optional_positive_id(field: &'static str, id: Option<&Identifier>) -> Result<(), ValidationError> {
    id.map_or(Ok(()), |id| positive_id(field, id))
}

/// Calendar date in `YYYY-MM-DD` form
pub fn date(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let well_formed = value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        })
    }
}

pub fn optional_date(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |value| date(field, value))
}

/// Wall-clock time as `HH:MM` or `hh:mm AM/PM`
pub fn time_of_day(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let parsed = NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%I:%M %p"));
    parsed.map(|_| ()).map_err(|_| ValidationError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    match email_pattern() {
        Some(pattern) if pattern.is_match(value) => Ok(()),
        _ => Err(ValidationError::InvalidEmail {
            value: value.to_string(),
        }),
    }
}

pub fn optional_email(value: Option<&str>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), email)
}

/// Non-blank text of bounded length
pub fn name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

pub fn optional_name(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |value| name(field, value))
}

pub fn non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Blank { field })
    } else {
        Ok(())
    }
}

pub fn non_empty<T>(field: &'static str, items: &[T]) -> Result<(), ValidationError> {
    if items.is_empty() {
        Err(ValidationError::EmptyList { field })
    } else {
        Ok(())
    }
}

/// Clamp paging arguments: limit defaults to the maximum page size and is
/// kept within bounds, negative offsets become zero.
pub fn page(limit: Option<i64>, offset: Option<i64>) -> Pagination {
    let limit = limit
        .unwrap_or(MAX_PAGE_SIZE)
        .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    Pagination::new(offset as u64, Some(limit as u32))
}

/// One of [`RESULT_FORMATS`], case-insensitive, defaulting to json
pub fn result_format(value: Option<&str>) -> Result<&'static str, ValidationError> {
    let requested = value.unwrap_or("json").trim().to_ascii_lowercase();
    RESULT_FORMATS
        .iter()
        .copied()
        .find(|format| *format == requested)
        .ok_or_else(|| ValidationError::InvalidFormat {
            value: value.unwrap_or_default().to_string(),
        })
}
