//! Result values for operations that can be refused.
//!
//! A denial or a validation failure is an expected answer, not a fault.
//! Handlers return `Result<Outcome<T>>`: the outer `Result` carries
//! infrastructure failures, the `Outcome` carries the business answer.

use serde::Serialize;

/// Message returned when a caller is not assigned to the case it asked for.
pub const NOT_ASSIGNED: &str = "Access denied: you are not assigned to this case.";

/// Business-level answer from an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation succeeded.
    Ok(T),
    /// The caller is not permitted. The message never echoes protected data.
    Denied(String),
    /// The request is malformed or violates a business rule.
    Invalid(String),
    /// The target does not exist.
    NotFound(String),
}

impl<T> Outcome<T> {
    pub fn denied(message: impl Into<String>) -> Self {
        Self::Denied(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Denial for a case the caller has no assignment on.
    pub fn not_assigned() -> Self {
        Self::Denied(NOT_ASSIGNED.to_string())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Stable tag used in tool error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ok(_) => "ok",
            Self::Denied(_) => "access_denied",
            Self::Invalid(_) => "validation",
            Self::NotFound(_) => "not_found",
        }
    }

    /// The refusal message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Denied(m) | Self::Invalid(m) | Self::NotFound(m) => Some(m),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Ok(v) => Outcome::Ok(f(v)),
            Self::Denied(m) => Outcome::Denied(m),
            Self::Invalid(m) => Outcome::Invalid(m),
            Self::NotFound(m) => Outcome::NotFound(m),
        }
    }

    /// Fallible `map`; refusals pass through untouched.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> std::result::Result<U, E>) -> std::result::Result<Outcome<U>, E> {
        Ok(match self {
            Self::Ok(v) => Outcome::Ok(f(v)?),
            Self::Denied(m) => Outcome::Denied(m),
            Self::Invalid(m) => Outcome::Invalid(m),
            Self::NotFound(m) => Outcome::NotFound(m),
        })
    }
}

/// JSON body for a refused tool call: `{ "error": ..., "kind": ... }`.
#[derive(Debug, Serialize)]
pub struct RefusalBody<'a> {
    pub error: &'a str,
    pub kind: &'a str,
}
