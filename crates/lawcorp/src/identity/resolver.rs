//! Credential → firm identity.

use super::context::{Caller, FirmIdentity};
use super::token::TokenValidator;
use crate::config::ServerConfig;
use crate::delegation::{bearer_token, InboundCredential};
use crate::error::Result;
use crate::storage::{FirmData, SubjectMatch};

/// Resolves callers against the firm directory.
///
/// Without a validator the resolver is in demo mode and every call is
/// [`Caller::Demo`].
#[derive(Clone, Default)]
pub struct IdentityResolver {
    validator: Option<TokenValidator>,
}

impl IdentityResolver {
    pub fn demo() -> Self {
        Self { validator: None }
    }

    pub fn new(validator: TokenValidator) -> Self {
        Self {
            validator: Some(validator),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        match &config.auth {
            Some(auth) => Ok(Self::new(TokenValidator::from_config(auth)?)),
            None => Ok(Self::demo()),
        }
    }

    pub fn is_demo(&self) -> bool {
        self.validator.is_none()
    }

    /// Resolve an `Authorization` header value.
    ///
    /// A missing or invalid credential, or a subject with no single active
    /// person behind it, yields [`Caller::Unauthenticated`].
    pub fn resolve(&self, authorization: Option<&str>, data: &FirmData) -> Caller {
        let Some(validator) = &self.validator else {
            return Caller::Demo;
        };
        let Some(token) = authorization.and_then(bearer_token) else {
            return unauthenticated("no bearer credential presented");
        };
        let subject = match validator.validate(token) {
            Ok(subject) => subject,
            Err(e) => {
                log::info!("credential rejected: {e}");
                return unauthenticated(e.to_string());
            }
        };

        let person = match data.active_person_by_subject(&subject) {
            SubjectMatch::Unique(person) => person,
            SubjectMatch::Missing => {
                log::info!("no active firm member for subject {subject}");
                return unauthenticated("no active firm member for this credential");
            }
            SubjectMatch::Ambiguous => {
                log::warn!("subject {subject} maps to more than one active person");
                return unauthenticated("credential maps to more than one firm member");
            }
        };

        log::debug!(
            "resolved subject {subject} to person {} ({})",
            person.id,
            person.role
        );
        Caller::Identified {
            identity: FirmIdentity::from_person(subject.clone(), person, data),
            credential: InboundCredential::new(token, subject),
        }
    }
}

fn unauthenticated(reason: impl Into<String>) -> Caller {
    Caller::Unauthenticated {
        reason: reason.into(),
    }
}
