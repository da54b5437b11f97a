// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ledger error types with consistent machine-readable codes.

use serde::Serialize;

/// Errors produced by ledger mutations and batch storage.
///
/// Every variant is a deterministic function of the input: a failed
/// mutation never leaves a partially cascaded ledger behind.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Activity not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// JSON error body for callers that surface errors to a UI or a pipe.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LedgerError {
    /// Stable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "validation_error",
            LedgerError::Conflict(_) => "conflict",
            LedgerError::NotFound(_) => "not_found",
            LedgerError::Storage(_) => "storage_error",
            LedgerError::Config(_) => "config_error",
        }
    }

    /// Whether the caller can resolve this error by confirming a cascading
    /// delete (delete the owning addition instead of its reading).
    pub fn is_conflict(&self) -> bool {
        matches!(self, LedgerError::Conflict(_))
    }

    pub fn to_response(&self) -> ErrorResponse {
        let details = match self {
            LedgerError::Validation(msg)
            | LedgerError::Conflict(msg)
            | LedgerError::NotFound(msg) => Some(msg.clone()),
            LedgerError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                Some(msg.clone())
            }
            LedgerError::Config(err) => Some(err.to_string()),
        };

        ErrorResponse {
            error: self.code().to_string(),
            details,
        }
    }
}

impl From<validator::ValidationErrors> for LedgerError {
    fn from(errors: validator::ValidationErrors) -> Self {
        LedgerError::Validation(errors.to_string())
    }
}

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
