//! Error handling for the control module

use crate::logging::LogLevel;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    /// The server answered with something that is not the expected JSON.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Network error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server rejected the request.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },
}

impl ControlError {
    pub async fn from_response(response: reqwest::Response) -> ControlError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ControlError::Http {
            status,
            message: error_message(&body),
        }
    }

    /// Log level used when this error is shown in the activity log.
    pub fn log_level(&self) -> LogLevel {
        match self {
            // Credentials missing or wrong - the user has to act
            ControlError::Http { status, .. } if *status == 401 => LogLevel::Error,
            ControlError::Http { status, .. } if *status == 403 => LogLevel::Error,

            // Server-side trouble - usually temporary
            ControlError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Network issues and odd payloads
            _ => LogLevel::Warn,
        }
    }
}

/// FastAPI-style servers wrap errors as `{"detail": "..."}`; prefer that text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(r#"{"detail":"Incorrect username or password"}"#),
            "Incorrect username or password"
        );
        assert_eq!(error_message("Internal Server Error\n"), "Internal Server Error");
        assert_eq!(
            error_message(r#"{"detail":[{"loc":["body"]}]}"#),
            r#"{"detail":[{"loc":["body"]}]}"#
        );
    }

    #[test]
    fn test_auth_failures_are_errors() {
        let unauthorized = ControlError::Http {
            status: 401,
            message: "Incorrect username or password".to_string(),
        };
        assert_eq!(unauthorized.log_level(), LogLevel::Error);
        assert_eq!(
            unauthorized.to_string(),
            "HTTP error with status 401: Incorrect username or password"
        );

        let unavailable = ControlError::Http {
            status: 503,
            message: String::new(),
        };
        assert_eq!(unavailable.log_level(), LogLevel::Warn);
    }
}
