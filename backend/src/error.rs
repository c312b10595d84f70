//! Error handling for the Field Trial Analytics Platform
//!
//! Provides consistent error responses in English and Portuguese

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::AnalysisError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_pt: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Session errors
    #[error("Session limit reached")]
    SessionLimitReached,

    #[error("Comparison set has not been built")]
    ComparisonsNotBuilt,

    // Engine contract violations
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_pt,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_pt: message_pt.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_pt: format!("{} não encontrado", resource),
                    field: None,
                },
            ),
            AppError::SessionLimitReached => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "SESSION_LIMIT_REACHED".to_string(),
                    message_en: "The maximum number of concurrent analysis sessions is in use"
                        .to_string(),
                    message_pt: "O número máximo de sessões de análise simultâneas está em uso"
                        .to_string(),
                    field: None,
                },
            ),
            AppError::ComparisonsNotBuilt => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "COMPARISONS_NOT_BUILT".to_string(),
                    message_en: "Run the head-to-head analysis before requesting results"
                        .to_string(),
                    message_pt: "Execute a análise head to head antes de consultar os resultados"
                        .to_string(),
                    field: None,
                },
            ),
            AppError::Analysis(err) => analysis_error_detail(err),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_pt: "Ocorreu um erro interno no servidor".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Map engine contract violations to HTTP error details.
fn analysis_error_detail(err: &AnalysisError) -> (StatusCode, ErrorDetail) {
    match err {
        AnalysisError::DuplicateCultivar { site, cultivar } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorDetail {
                code: "DUPLICATE_CULTIVAR".to_string(),
                message_en: format!(
                    "Cultivar '{}' appears more than once at site '{}'; deduplicate upstream",
                    cultivar, site
                ),
                message_pt: format!(
                    "O cultivar '{}' aparece mais de uma vez no local '{}'; remova as duplicatas na origem",
                    cultivar, site
                ),
                field: Some("records".to_string()),
            },
        ),
        AnalysisError::SelfComparison { cultivar } => (
            StatusCode::BAD_REQUEST,
            ErrorDetail {
                code: "SELF_COMPARISON".to_string(),
                message_en: format!("Cultivar '{}' cannot be compared against itself", cultivar),
                message_pt: format!(
                    "O cultivar '{}' não pode ser comparado com ele mesmo",
                    cultivar
                ),
                field: Some("check".to_string()),
            },
        ),
        AnalysisError::InvalidToleranceBand { lo, hi } => (
            StatusCode::BAD_REQUEST,
            ErrorDetail {
                code: "INVALID_TOLERANCE_BAND".to_string(),
                message_en: format!(
                    "Invalid tolerance band: lower bound {} exceeds upper bound {}",
                    lo, hi
                ),
                message_pt: format!(
                    "Faixa de tolerância inválida: o limite inferior {} é maior que o superior {}",
                    lo, hi
                ),
                field: Some("tolerance".to_string()),
            },
        ),
        AnalysisError::InvalidTopN => (
            StatusCode::BAD_REQUEST,
            ErrorDetail {
                code: "INVALID_TOP_N".to_string(),
                message_en: "top_n must be at least 1".to_string(),
                message_pt: "O número de cultivares Top deve ser pelo menos 1".to_string(),
                field: Some("top_n".to_string()),
            },
        ),
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
