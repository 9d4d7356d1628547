//! Error types for layer configuration

use thiserror::Error;

/// Layer errors
///
/// Drawing and transform queries never fail; these only surface when raw
/// values or serialized configuration are converted into layer settings.
#[derive(Debug, Error)]
pub enum LayerError {
    /// Raw sort mode code outside the known range
    #[error("Invalid sort mode: {0}")]
    InvalidSortMode(u32),

    /// Unknown capability name
    #[error("Invalid capability: {0}")]
    InvalidCapability(String),

    /// Configuration values out of range
    #[error("Invalid layer configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for layer operations
pub type Result<T> = std::result::Result<T, LayerError>;
