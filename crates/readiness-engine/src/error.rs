use crate::assessment::{AnswerImportError, DefinitionError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Definition(DefinitionError),
    AnswerImport(AnswerImportError),
    Io(std::io::Error),
    Json(serde_json::Error),
    /// A command referenced a step the wizard does not define.
    UnknownStep(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Definition(err) => write!(f, "definition error: {}", err),
            AppError::AnswerImport(err) => write!(f, "answer import error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::UnknownStep(step) => write!(f, "unknown wizard step '{}'", step),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Definition(err) => Some(err),
            AppError::AnswerImport(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::UnknownStep(_) => None,
        }
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

impl From<DefinitionError> for AppError {
    fn from(value: DefinitionError) -> Self {
        Self::Definition(value)
    }
}

impl From<AnswerImportError> for AppError {
    fn from(value: AnswerImportError) -> Self {
        Self::AnswerImport(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
