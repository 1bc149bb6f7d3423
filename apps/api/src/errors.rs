use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request input (missing, too short or too long text).
    #[error("{0}")]
    Validation(String),

    /// Upload rejected before extraction: malformed form data or a file that
    /// fails the resume file checks.
    #[error("{message}")]
    InvalidUpload {
        message: String,
        details: Vec<String>,
        warnings: Vec<String>,
    },

    #[error("Text extraction failed")]
    Extraction {
        details: Vec<String>,
        warnings: Vec<String>,
    },

    /// Missing credential or other server-side misconfiguration.
    #[error("{0}")]
    Configuration(String),

    #[error("AI analysis failed: {0}")]
    Llm(String),

    /// The model answered but its output is not a usable analysis.
    #[error("Failed to parse analysis results - invalid AI response format")]
    ResponseShape(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Uniform failure body shared by every endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: &'static str,
    pub status_code: u16,
    pub retryable: bool,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidUpload { .. } => StatusCode::BAD_REQUEST,
            AppError::Extraction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_)
            | AppError::Llm(_)
            | AppError::ResponseShape(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidUpload { .. } => "INVALID_UPLOAD",
            AppError::Extraction { .. } => "EXTRACTION_FAILED",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Llm(_) => "AI_SERVICE_ERROR",
            AppError::ResponseShape(_) => "PARSING_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether a manual retry of the same request can reasonably succeed.
    /// Nothing on the server retries automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Llm(_) | AppError::ResponseShape(_) | AppError::Internal(_)
        )
    }

    pub fn to_body(&self) -> ErrorBody {
        let (details, warnings) = match self {
            AppError::InvalidUpload {
                details, warnings, ..
            }
            | AppError::Extraction { details, warnings } => (
                Some(details.clone()),
                (!warnings.is_empty()).then(|| warnings.clone()),
            ),
            _ => (None, None),
        };

        let error = match self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        };

        ErrorBody {
            success: false,
            error,
            code: self.code(),
            status_code: self.status().as_u16(),
            retryable: self.is_retryable(),
            timestamp: Utc::now().to_rfc3339(),
            details,
            warnings,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(msg) => tracing::warn!("Rejected request: {msg}"),
            AppError::InvalidUpload {
                message, details, ..
            } => tracing::warn!("Rejected upload: {message} {details:?}"),
            AppError::Extraction { details, .. } => {
                tracing::warn!("Text extraction failed: {details:?}")
            }
            AppError::Configuration(msg) => tracing::error!("Configuration error: {msg}"),
            AppError::Llm(msg) => tracing::error!("LLM error: {msg}"),
            AppError::ResponseShape(detail) => {
                tracing::error!("Unusable analysis response: {detail}")
            }
            AppError::NotFound(msg) => tracing::debug!("Not found: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }

        (self.status(), Json(self.to_body())).into_response()
    }
}
