//! Error types for the LawCorp core.
//!
//! Only infrastructure failures are errors. Authorization denials and
//! validation failures are [`crate::Outcome`] values and never reach this
//! type. Credential material is never included in error messages.

use crate::delegation::ExchangeError;

/// Fault types covering storage, identity, and downstream operations.
#[derive(Debug, thiserror::Error)]
pub enum FirmError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Write conflict on {entity}: modified by a concurrent writer, retry the operation")]
    WriteConflict { entity: String },

    #[error("Invalid changeset: {0}")]
    InvalidChangeset(String),

    #[error("Credential exchange failed: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Document service unavailable: {message}")]
    Downstream { message: String, retryable: bool },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FirmError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::WriteConflict { .. } => true,
            Self::Exchange(e) => e.is_retryable(),
            Self::Downstream { retryable, .. } => *retryable,
            Self::StorageError(_) | Self::Io(_) => true,
            _ => false,
        }
    }

    /// Stable machine-readable tag, used in protocol error data.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) | Self::InvalidToken(_) => "unauthenticated",
            Self::NotFound(_) => "not_found",
            Self::WriteConflict { .. } => "write_conflict",
            Self::InvalidChangeset(_) => "invalid_changeset",
            Self::Exchange(ExchangeError::ConsentRequired { .. }) => "consent_required",
            Self::Exchange(_) => "credential_exchange",
            Self::Downstream { .. } => "downstream",
            Self::StorageError(_)
            | Self::SerializationError(_)
            | Self::InvalidFileFormat(_)
            | Self::Io(_) => "storage",
            Self::Config(_) => "config",
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, FirmError>;
