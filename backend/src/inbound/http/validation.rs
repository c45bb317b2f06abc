//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejected field is reported as `invalid_request` with a
//! `{"field", "code"}` details object so clients can highlight the input.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{CredentialValidationError, Error, TaskStatus, WorkspaceValidationError};

/// Validation error codes raised by the HTTP layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidStatus,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidStatus => "invalid_status",
        }
    }
}

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    field_error(
        field,
        ErrorCode::MissingField.as_str(),
        format!("missing required field: {field}"),
    )
}

pub(crate) fn credential_error(err: CredentialValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

pub(crate) fn workspace_error(err: WorkspaceValidationError) -> Error {
    let code = match err {
        WorkspaceValidationError::EmptyName => "empty_name",
        WorkspaceValidationError::NameTooLong { .. } => "name_too_long",
    };
    field_error("name", code, err.to_string())
}

pub(crate) fn parse_status(value: Option<String>) -> Result<TaskStatus, Error> {
    let value = value.ok_or_else(|| missing_field_error("status"))?;
    TaskStatus::from_str(value.trim()).map_err(|_| {
        Error::invalid_request("status must be one of todo, in_progress, review, done")
            .with_details(json!({
                "field": "status",
                "value": value,
                "code": ErrorCode::InvalidStatus.as_str(),
            }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, PASSWORD_MIN};
    use rstest::rstest;

    #[rstest]
    fn credential_errors_name_field_and_code() {
        let err = credential_error(CredentialValidationError::PasswordTooShort {
            min: PASSWORD_MIN,
        });

        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "password", "code": "password_too_short"}))
        );
    }

    #[rstest]
    #[case("done", TaskStatus::Done)]
    #[case(" in_progress ", TaskStatus::InProgress)]
    fn known_statuses_parse(#[case] raw: &str, #[case] expected: TaskStatus) {
        assert_eq!(parse_status(Some(raw.to_owned())).expect("status"), expected);
    }

    #[rstest]
    fn unknown_status_echoes_value() {
        let err = parse_status(Some("archived".to_owned())).expect_err("unknown");
        let details = err.details().expect("details");
        assert_eq!(details["code"], "invalid_status");
        assert_eq!(details["value"], "archived");
    }

    #[rstest]
    fn absent_status_is_missing_field() {
        let err = parse_status(None).expect_err("missing");
        assert_eq!(err.details().expect("details")["code"], "missing_field");
    }
}
