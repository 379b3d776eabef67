use crate::assessment::DEFAULT_MAX_CONDITION_DEPTH;
use crate::scoring::{ScoringProfile, UnknownProfile};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub assessment: AssessmentSettings,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let definition_path = env::var("READINESS_DEFINITION_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let scoring_profile = match env::var("READINESS_SCORING_PROFILE") {
            Ok(value) => value
                .parse::<ScoringProfile>()
                .map_err(|source| ConfigError::InvalidProfile { source })?,
            Err(_) => ScoringProfile::Standard,
        };

        let max_condition_depth = match env::var("READINESS_MAX_CONDITION_DEPTH") {
            Ok(value) => parse_depth(&value)?,
            Err(_) => DEFAULT_MAX_CONDITION_DEPTH,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            assessment: AssessmentSettings {
                definition_path,
                scoring_profile,
                max_condition_depth,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_depth(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(depth) if depth >= 1 => Ok(depth),
        _ => Err(ConfigError::InvalidMaxDepth {
            value: value.to_string(),
        }),
    }
}

/// Where the wizard comes from and how it is scored.
#[derive(Debug, Clone)]
pub struct AssessmentSettings {
    /// JSON definition to load instead of the built-in blueprint.
    pub definition_path: Option<PathBuf>,
    pub scoring_profile: ScoringProfile,
    pub max_condition_depth: usize,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidProfile { source: UnknownProfile },
    InvalidMaxDepth { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidProfile { source } => {
                write!(f, "READINESS_SCORING_PROFILE is invalid: {source}")
            }
            ConfigError::InvalidMaxDepth { value } => write!(
                f,
                "READINESS_MAX_CONDITION_DEPTH must be a positive integer (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidProfile { source } => Some(source),
            ConfigError::InvalidMaxDepth { .. } => None,
        }
    }
}
