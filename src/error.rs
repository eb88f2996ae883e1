use crate::assistant::AssistantError;
use crate::config::ConfigError;
use crate::eligibility::{BatchImportError, InvalidInput};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Eligibility(InvalidInput),
    Batch(BatchImportError),
    Assistant(AssistantError),
    Output(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Eligibility(err) => write!(f, "invalid input: {}", err),
            AppError::Batch(err) => write!(f, "batch import error: {}", err),
            AppError::Assistant(err) => write!(f, "assistant error: {}", err),
            AppError::Output(err) => write!(f, "failed to render output: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Eligibility(err) => Some(err),
            AppError::Batch(err) => Some(err),
            AppError::Assistant(err) => Some(err),
            AppError::Output(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Eligibility(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Batch(_) => StatusCode::BAD_REQUEST,
            AppError::Assistant(AssistantError::EmptyMessage) => StatusCode::BAD_REQUEST,
            AppError::Assistant(AssistantError::InvalidInput(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Assistant(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Output(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn invalid_field(&self) -> Option<&'static str> {
        match self {
            AppError::Eligibility(err)
            | AppError::Assistant(AssistantError::InvalidInput(err)) => Some(err.field().key()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.invalid_field() {
            Some(field) => Json(json!({ "error": self.to_string(), "field": field })),
            None => Json(json!({ "error": self.to_string() })),
        };
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<InvalidInput> for AppError {
    fn from(value: InvalidInput) -> Self {
        Self::Eligibility(value)
    }
}

impl From<BatchImportError> for AppError {
    fn from(value: BatchImportError) -> Self {
        Self::Batch(value)
    }
}

impl From<AssistantError> for AppError {
    fn from(value: AssistantError) -> Self {
        Self::Assistant(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{GenerationError, ModelSelectionError};
    use crate::eligibility::InputField;

    #[test]
    fn invalid_input_maps_to_unprocessable_entity() {
        let err = AppError::from(InvalidInput::Missing(InputField::LoanAmount));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.invalid_field(), Some("loan_amount"));
    }

    #[test]
    fn provider_failures_map_to_bad_gateway() {
        let exhausted = AppError::from(AssistantError::from(ModelSelectionError::Exhausted));
        assert_eq!(exhausted.status(), StatusCode::BAD_GATEWAY);

        let empty = AppError::from(AssistantError::from(GenerationError::EmptyReply {
            model: "gemini-1.5".to_string(),
        }));
        assert_eq!(empty.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(empty.invalid_field(), None);
    }

    #[test]
    fn empty_messages_map_to_bad_request() {
        let err = AppError::from(AssistantError::EmptyMessage);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn configuration_errors_are_internal() {
        let err = AppError::from(ConfigError::MissingApiKey);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("configuration error"));
    }
}
