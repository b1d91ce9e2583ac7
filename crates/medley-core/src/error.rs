//! Error types for the Medley agent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operation::OperationResult;

/// A shared error type for the entire Medley workspace.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum MedleyError {
    /// The inbound message is missing required data (e.g., the pre-validated
    /// authorization context). Fatal for the task it belongs to.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A downstream generation call failed.
    #[error("{operation} generation failed: {message}")]
    Generation { operation: String, message: String },

    /// A sub-operation of a combined request failed. Results obtained before
    /// the failure are carried for diagnostics; they are never billed.
    #[error("Combined generation failed: {message}")]
    CombinedGeneration {
        message: String,
        partial: Vec<OperationResult>,
    },

    /// The pricing collaborator was unavailable or returned malformed data.
    ///
    /// Callers in the cost model recover from this variant locally; it must
    /// never fail a task.
    #[error("Pricing error: {0}")]
    Pricing(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MedleyError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Generation error for the named operation
    pub fn generation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generation {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a Pricing error
    pub fn pricing(message: impl Into<String>) -> Self {
        Self::Pricing(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Pricing error
    pub fn is_pricing(&self) -> bool {
        matches!(self, Self::Pricing(_))
    }

    /// The `errorType` string attached to a failed status update.
    ///
    /// Validation failures are surfaced as `processing_error` so that callers
    /// cannot distinguish a misconfigured task from any other processing
    /// fault (they are not billing failures).
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Validation(_) => "processing_error",
            Self::Generation { .. } => "generation_error",
            Self::CombinedGeneration { .. } => "combined_generation_error",
            Self::Pricing(_) => "pricing_error",
            Self::Config(_) => "configuration_error",
            Self::Serialization(_) => "serialization_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Partial results carried by a combined-generation failure, if any.
    pub fn partial_results(&self) -> Option<&[OperationResult]> {
        match self {
            Self::CombinedGeneration { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MedleyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for MedleyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Internal(format!("HTTP error: {}", err))
    }
}

/// A type alias for `Result<T, MedleyError>`.
pub type Result<T> = std::result::Result<T, MedleyError>;
