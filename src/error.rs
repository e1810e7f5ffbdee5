use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::formulary::FormularyImportError;
use crate::workflows::triage::ConfigError as EngineConfigError;
use crate::workflows::triage::TriageServiceError;
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
    Engine(EngineConfigError),
    Triage(TriageServiceError),
    Formulary(FormularyImportError),
    Json(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Engine(err) => write!(f, "engine configuration error: {}", err),
            AppError::Triage(err) => write!(f, "triage error: {}", err),
            AppError::Formulary(err) => write!(f, "formulary import error: {}", err),
            AppError::Json(err) => write!(f, "invalid json payload: {}", err),
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
            AppError::Engine(err) => Some(err),
            AppError::Triage(err) => Some(err),
            AppError::Formulary(err) => Some(err),
            AppError::Json(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Formulary(_) | AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Engine(_)
            | AppError::Triage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
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

impl From<EngineConfigError> for AppError {
    fn from(value: EngineConfigError) -> Self {
        Self::Engine(value)
    }
}

impl From<TriageServiceError> for AppError {
    fn from(value: TriageServiceError) -> Self {
        Self::Triage(value)
    }
}

impl From<FormularyImportError> for AppError {
    fn from(value: FormularyImportError) -> Self {
        Self::Formulary(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
