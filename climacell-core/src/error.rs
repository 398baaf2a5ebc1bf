use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by [`crate::Client::hourly_forecast`].
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The endpoint URL could not be built from the configured base URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The API key cannot be sent as an HTTP header value.
    #[error("Invalid API key: contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    /// The HTTP transport could not be initialized.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Sending the request or reading the response body failed.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body did not match the expected JSON shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API answered with a documented error body.
    #[error(transparent)]
    Api(#[from] ApiErrorResponse),

    /// The API answered with a status outside the documented set.
    #[error("Unexpected status code {0}")]
    UnexpectedStatus(u16),
}

impl ForecastError {
    /// HTTP status associated with this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ForecastError::Api(api) => Some(api.status_code),
            ForecastError::UnexpectedStatus(code) => Some(*code),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ForecastError::Network(e) if e.is_timeout())
    }
}

/// JSON error body returned by the API on 400, 401, 403 and 500.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Zero when the body omitted it and no HTTP status was back-filled.
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_code.as_deref() {
            Some(code) if !code.is_empty() => write!(
                f,
                "{} ({}) API error: {}",
                self.status_code, code, self.message
            ),
            _ => write!(f, "{} API error: {}", self.status_code, self.message),
        }
    }
}

impl std::error::Error for ApiErrorResponse {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_with_code() {
        let err = ApiErrorResponse {
            status_code: 401,
            error_code: Some("InvalidAPIKey".to_string()),
            message: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "401 (InvalidAPIKey) API error: bad key");
    }

    #[test]
    fn api_error_display_without_code() {
        let err = ApiErrorResponse {
            status_code: 500,
            error_code: None,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "500 API error: boom");
    }

    #[test]
    fn api_error_decodes_camel_case() {
        let err: ApiErrorResponse = serde_json::from_str(
            r#"{"statusCode":400,"errorCode":"BadRequest","message":"lat out of range"}"#,
        )
        .unwrap();

        assert_eq!(err.status_code, 400);
        assert_eq!(err.error_code.as_deref(), Some("BadRequest"));
        assert_eq!(err.message, "lat out of range");
    }

    #[test]
    fn api_error_missing_status_defaults_to_zero() {
        let err: ApiErrorResponse = serde_json::from_str(r#"{"message":"bad key"}"#).unwrap();
        assert_eq!(err.status_code, 0);
        assert_eq!(err.error_code, None);
    }

    #[test]
    fn forecast_error_status() {
        let api = ForecastError::Api(ApiErrorResponse {
            status_code: 403,
            error_code: None,
            message: "forbidden".to_string(),
        });
        assert_eq!(api.status(), Some(403));
        assert_eq!(api.to_string(), "403 API error: forbidden");

        let unexpected = ForecastError::UnexpectedStatus(418);
        assert_eq!(unexpected.status(), Some(418));
        assert!(unexpected.to_string().contains("418"));

        let invalid = ForecastError::InvalidEndpoint("relative URL without a base".into());
        assert_eq!(invalid.status(), None);
        assert!(!invalid.is_timeout());
    }
}
