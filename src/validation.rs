use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    OffsetDateTime, PrimitiveDateTime,
};

pub const MISSING: &str = "Missing data for required field.";
pub const NOT_NULL: &str = "Field may not be null.";
pub const NOT_STRING: &str = "Not a valid string.";
pub const NOT_EMAIL: &str = "Not a valid email address.";
pub const NOT_DATETIME: &str = "Not a valid datetime.";
pub const UNKNOWN_FIELD: &str = "Unknown field.";
pub const INVALID_INPUT: &str = "Invalid input type.";

/// Field name -> messages, serialized as the `errors` object of a 400.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// ISO-8601 timestamp; a value without an offset is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
        .or_else(|_| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(|dt| dt.assume_utc()))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("captain@harbor.io"));
        assert!(!is_valid_email("captain"));
        assert!(!is_valid_email("captain@harbor"));
        assert!(!is_valid_email("cap tain@harbor.io"));
    }

    #[test]
    fn parses_offset_and_naive_timestamps() {
        assert_eq!(
            parse_timestamp("2024-05-01T12:30:00Z"),
            Some(datetime!(2024-05-01 12:30:00 UTC))
        );
        assert_eq!(
            parse_timestamp("2024-05-01T14:30:00+02:00"),
            Some(datetime!(2024-05-01 14:30:00 +2))
        );
        assert_eq!(
            parse_timestamp("2024-05-01T12:30:00"),
            Some(datetime!(2024-05-01 12:30:00 UTC))
        );
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn field_errors_collect_per_field() {
        let mut errors = FieldErrors::new();
        assert!(errors.clone().into_result(()).is_ok());
        errors.add("name", MISSING);
        errors.add("name", NOT_STRING);
        assert_eq!(errors.get("name").unwrap().len(), 2);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["name"][0], MISSING);
        assert!(errors.into_result(()).is_err());
    }
}
