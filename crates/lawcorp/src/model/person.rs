//! Firm personnel.
//!
//! Every person who can sign in has exactly one `Person` row regardless of
//! role. Role-specific attributes hang off the optional [`RoleDetails`]
//! satellite record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::parse_named;

/// Unique identifier for a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u64);

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The six firm roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirmRole {
    Partner,
    Associate,
    OfCounsel,
    Paralegal,
    LegalAssistant,
    Intern,
}

impl FirmRole {
    pub const ALL: [FirmRole; 6] = [
        FirmRole::Partner,
        FirmRole::Associate,
        FirmRole::OfCounsel,
        FirmRole::Paralegal,
        FirmRole::LegalAssistant,
        FirmRole::Intern,
    ];

    /// Stable name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Partner => "Partner",
            Self::Associate => "Associate",
            Self::OfCounsel => "OfCounsel",
            Self::Paralegal => "Paralegal",
            Self::LegalAssistant => "LegalAssistant",
            Self::Intern => "Intern",
        }
    }

    /// Case-insensitive parse of a role name.
    pub fn parse(s: &str) -> Option<Self> {
        parse_named(s, &Self::ALL, Self::as_str)
    }
}

impl std::fmt::Display for FirmRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes only attorneys carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttorneyDetails {
    pub bar_number: String,
    pub hourly_rate: f64,
}

/// Attributes only interns carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternDetails {
    pub school: String,
    pub program_end: Option<NaiveDate>,
}

/// 1:1 satellite record for role-specific attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleDetails {
    Attorney(AttorneyDetails),
    Intern(InternDetails),
}

/// A member of the firm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: FirmRole,
    pub practice_group_id: Option<super::PracticeGroupId>,
    /// Reporting line for legal assistants and interns.
    pub supervisor_id: Option<PersonId>,
    /// Subject claim issued by the identity provider. `None` for people who
    /// have never signed in.
    pub external_subject: Option<String>,
    pub hire_date: NaiveDate,
    pub active: bool,
    #[serde(default)]
    pub details: Option<RoleDetails>,
}

impl Person {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
