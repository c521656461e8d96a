//! Error types for dry-core

use thiserror::Error;

/// Core error type for Dryflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Manifest file not found
    #[error("[E004] Manifest not found: {path}")]
    ManifestNotFound { path: String },

    /// E005: Manifest could not be deserialized
    #[error("[E005] Failed to parse manifest {path}: {message}")]
    ManifestParseError { path: String, message: String },

    /// E006: Node referenced by id is not in the manifest
    #[error("[E006] Node not found: {id}")]
    NodeNotFound { id: String },

    /// E007: Circular dependency detected
    #[error("[E007] Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// E008: Empty identifier where a non-empty one is required
    #[error("[E008] Empty name in {context}")]
    EmptyName { context: String },

    /// E009: IO error
    #[error("[E009] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E010: IO error with file path context
    #[error("[E010] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
