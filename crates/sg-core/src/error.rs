//! Error types for sg-core

use thiserror::Error;

/// Configuration and fixture-description errors.
///
/// Everything here is detected before any row is written.
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Fixture references a model the schema does not declare
    #[error("[C003] Unknown model '{model}'")]
    UnknownModel { model: String },

    /// C004: Row name used more than once in a load
    #[error("[C004] Duplicate row name '{name}' (declared under {first} and {second})")]
    DuplicateRow {
        name: String,
        first: String,
        second: String,
    },

    /// C005: Empty model or row name
    #[error("[C005] {kind} must not be empty")]
    EmptyName { kind: &'static str },

    /// C006: Schema definition is inconsistent
    #[error("[C006] Invalid schema for model '{model}': {reason}")]
    InvalidSchema { model: String, reason: String },

    /// C007: Fixture file has the wrong shape
    #[error("[C007] Malformed fixtures in {origin}: {reason}")]
    MalformedFixtures { origin: String, reason: String },

    /// C008: IO error with file path context
    #[error("[C008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C009: YAML parse error
    #[error("[C009] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// C010: JSON parse error
    #[error("[C010] JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
