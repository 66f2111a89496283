//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, ScoreError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    EmptyField,
    ScoreOutOfRange,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::ScoreOutOfRange => "score_out_of_range",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: &str, code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {field}"),
    )
}

pub(crate) fn empty_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        ErrorCode::EmptyField,
        format!("{field} must not be empty"),
    )
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} has an unsupported value")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidValue.as_str(),
    }))
}

pub(crate) fn score_error(error: &ScoreError) -> Error {
    field_error(
        error.attribute.as_str(),
        ErrorCode::ScoreOutOfRange,
        error.to_string(),
    )
}

/// Unwrap a required body field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Attribute, ErrorCode as DomainCode};
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    fn missing_field_carries_field_and_code() {
        let error = missing_field_error(FieldName::new("name"));
        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(error.message(), "missing required field: name");
        assert_eq!(detail(&error, "field"), Some("name"));
        assert_eq!(detail(&error, "code"), Some("missing_field"));
    }

    #[rstest]
    fn score_errors_name_the_attribute() {
        let error = score_error(&ScoreError {
            attribute: Attribute::Umami,
            value: 11.0,
        });
        assert_eq!(detail(&error, "field"), Some("umami"));
        assert_eq!(detail(&error, "code"), Some("score_out_of_range"));
    }

    #[rstest]
    fn require_passes_present_values_through() {
        assert_eq!(require(Some(3), FieldName::new("teaId")).ok(), Some(3));
        assert!(require::<i64>(None, FieldName::new("teaId")).is_err());
    }
}
