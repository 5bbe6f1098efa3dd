// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use tipple_model::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    Unauthorized,
    NotFound,
    ValidationError,
    Conflict,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::NotFound => "NotFound",
            Self::ValidationError => "ValidationError",
            Self::Conflict => "Conflict",
            Self::Internal => "Internal",
        }
    }
}

/// Flat error envelope: `{"error": <code>, "message"?: .., "field"?: ..}`.
/// An unauthorized response body is exactly `{"error":"Unauthorized"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "error")]
    pub code: ApiErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    #[must_use]
    pub const fn unauthorized() -> Self {
        Self {
            code: ApiErrorCode::Unauthorized,
            message: None,
            field: None,
        }
    }

    #[must_use]
    pub fn not_found(what: &str) -> Self {
        Self {
            code: ApiErrorCode::NotFound,
            message: Some(format!("{what} not found")),
            field: None,
        }
    }

    #[must_use]
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::ValidationError,
            message: Some(message.into()),
            field: Some(field.to_string()),
        }
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::Conflict,
            message: Some(message.into()),
            field: None,
        }
    }

    #[must_use]
    pub const fn internal() -> Self {
        Self {
            code: ApiErrorCode::Internal,
            message: None,
            field: None,
        }
    }

    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self.code {
            ApiErrorCode::Unauthorized => 401,
            ApiErrorCode::NotFound => 404,
            ApiErrorCode::ValidationError | ApiErrorCode::Conflict => 422,
            ApiErrorCode::Internal => 500,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {msg}", self.code.as_str()),
            None => f.write_str(self.code.as_str()),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ParseError> for ApiError {
    fn from(value: ParseError) -> Self {
        Self::validation(value.field(), value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unauthorized_body_has_only_the_error_key() {
        let body = serde_json::to_value(ApiError::unauthorized()).expect("serialize");
        assert_eq!(body, json!({"error": "Unauthorized"}));
    }

    #[test]
    fn validation_body_carries_field_and_message() {
        let err = ApiError::validation("rating", "rating must be between 1 and 5");
        assert_eq!(err.http_status(), 422);
        let body = serde_json::to_value(&err).expect("serialize");
        assert_eq!(body["error"], "ValidationError");
        assert_eq!(body["field"], "rating");
    }

    #[test]
    fn parse_errors_map_to_field_level_validation() {
        let err: ApiError = tipple_model::Email::parse("nope").unwrap_err().into();
        assert_eq!(err.code, ApiErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("email"));
    }
}
