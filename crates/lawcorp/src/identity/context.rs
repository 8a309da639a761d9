//! Request-scoped identity projections.

use serde::Serialize;

use crate::delegation::InboundCredential;
use crate::error::{FirmError, Result};
use crate::model::{CaseId, FirmRole, Person, PersonId, PracticeGroupId};
use crate::policy::{profile_for, RoleProfile};
use crate::storage::FirmData;

/// Person id the demo caller acts as.
pub const DEMO_PERSON_ID: PersonId = PersonId(1);
pub const DEMO_DISPLAY_NAME: &str = "Demo Partner";

/// What handlers need to know about the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationContext {
    pub person_id: PersonId,
    pub display_name: String,
    pub role: FirmRole,
    pub is_partner: bool,
    pub is_attorney: bool,
}

impl OperationContext {
    pub fn for_person(person: &Person) -> Self {
        let profile = profile_for(person.role);
        Self {
            person_id: person.id,
            display_name: person.display_name(),
            role: person.role,
            is_partner: profile.partner,
            is_attorney: profile.attorney,
        }
    }

    /// The anonymous partner used when no identity provider is configured.
    pub fn demo() -> Self {
        Self {
            person_id: DEMO_PERSON_ID,
            display_name: DEMO_DISPLAY_NAME.to_string(),
            role: FirmRole::Partner,
            is_partner: true,
            is_attorney: true,
        }
    }

    pub fn profile(&self) -> &'static RoleProfile {
        profile_for(self.role)
    }
}

/// The resolved firm member behind a credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirmIdentity {
    pub subject: String,
    pub person_id: PersonId,
    pub display_name: String,
    pub role: FirmRole,
    pub practice_group_id: Option<PracticeGroupId>,
    pub assigned_case_ids: Vec<CaseId>,
    pub supervisor_id: Option<PersonId>,
}

impl FirmIdentity {
    pub fn from_person(subject: impl Into<String>, person: &Person, data: &FirmData) -> Self {
        Self {
            subject: subject.into(),
            person_id: person.id,
            display_name: person.display_name(),
            role: person.role,
            practice_group_id: person.practice_group_id,
            assigned_case_ids: data.assigned_case_ids(person.id),
            supervisor_id: person.supervisor_id,
        }
    }

    pub fn context(&self) -> OperationContext {
        let profile = profile_for(self.role);
        OperationContext {
            person_id: self.person_id,
            display_name: self.display_name.clone(),
            role: self.role,
            is_partner: profile.partner,
            is_attorney: profile.attorney,
        }
    }
}

/// Who is calling.
#[derive(Debug, Clone)]
pub enum Caller {
    /// Demo mode: handlers act as the demo partner, filters see no identity.
    Demo,
    Identified {
        identity: FirmIdentity,
        credential: InboundCredential,
    },
    /// An identity provider is configured but the credential did not
    /// resolve. Handlers fail closed.
    Unauthenticated { reason: String },
}

impl Caller {
    /// The identity the protocol filters act on. `None` means pass through.
    pub fn identity(&self) -> Option<&FirmIdentity> {
        match self {
            Self::Identified { identity, .. } => Some(identity),
            _ => None,
        }
    }

    pub fn credential(&self) -> Option<&InboundCredential> {
        match self {
            Self::Identified { credential, .. } => Some(credential),
            _ => None,
        }
    }

    /// Handler context, or `Unauthenticated` when resolution failed.
    pub fn context(&self) -> Result<OperationContext> {
        match self {
            Self::Demo => Ok(OperationContext::demo()),
            Self::Identified { identity, .. } => Ok(identity.context()),
            Self::Unauthenticated { reason } => Err(FirmError::Unauthenticated(reason.clone())),
        }
    }
}
