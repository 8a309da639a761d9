//! Cases, clients, practice groups, assignments and timeline events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::parse_named;
use super::person::PersonId;

// ── Identifiers ──────────────────────────────────────────────────────────────

/// Unique identifier for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(pub u64);

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

/// Unique identifier for a practice group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PracticeGroupId(pub u64);

// ── Reference data ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeGroup {
    pub id: PracticeGroupId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientKind {
    Individual,
    Organization,
}

impl ClientKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Organization => "Organization",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        parse_named(s, &[Self::Individual, Self::Organization], Self::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    pub name: String,
    pub kind: ClientKind,
    pub industry: Option<String>,
}

// ── Case ─────────────────────────────────────────────────────────────────────

/// Lifecycle status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    Active,
    OnHold,
    Closed,
    Settled,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 4] = [
        CaseStatus::Active,
        CaseStatus::OnHold,
        CaseStatus::Closed,
        CaseStatus::Settled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::OnHold => "OnHold",
            Self::Closed => "Closed",
            Self::Settled => "Settled",
        }
    }

    /// Case-insensitive parse of a status name.
    pub fn parse(s: &str) -> Option<Self> {
        parse_named(s, &Self::ALL, Self::as_str)
    }

    /// Closed and Settled stamp the close date when entered.
    pub fn is_closing(self) -> bool {
        matches!(self, Self::Closed | Self::Settled)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A legal matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    /// Matter number. The document service correlates documents by this key.
    pub case_number: String,
    pub title: String,
    pub description: String,
    pub status: CaseStatus,
    pub practice_group_id: PracticeGroupId,
    pub client_id: u64,
    pub court_name: Option<String>,
    pub judge_name: Option<String>,
    pub open_date: NaiveDate,
    pub close_date: Option<NaiveDate>,
    pub estimated_value: f64,
    /// Bumped by every committed status change.
    #[serde(default)]
    pub version: u64,
}

// ── Assignment ───────────────────────────────────────────────────────────────

/// A person's role on a particular case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentRole {
    Lead,
    Supporting,
    Reviewer,
}

impl AssignmentRole {
    pub const ALL: [AssignmentRole; 3] = [
        AssignmentRole::Lead,
        AssignmentRole::Supporting,
        AssignmentRole::Reviewer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Supporting => "Supporting",
            Self::Reviewer => "Reviewer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        parse_named(s, &Self::ALL, Self::as_str)
    }
}

impl std::fmt::Display for AssignmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Links a person to a case. Unique per (case, person).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub case_id: CaseId,
    pub person_id: PersonId,
    pub role: AssignmentRole,
    pub assigned_date: NaiveDate,
}

// ── Timeline ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    StatusChange,
    Assignment,
    Note,
    Filing,
    Hearing,
    Deadline,
    DocumentAdded,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::StatusChange,
        EventType::Assignment,
        EventType::Note,
        EventType::Filing,
        EventType::Hearing,
        EventType::Deadline,
        EventType::DocumentAdded,
        EventType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StatusChange => "StatusChange",
            Self::Assignment => "Assignment",
            Self::Note => "Note",
            Self::Filing => "Filing",
            Self::Hearing => "Hearing",
            Self::Deadline => "Deadline",
            Self::DocumentAdded => "DocumentAdded",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        parse_named(s, &Self::ALL, Self::as_str)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry on a case's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: EventId,
    pub case_id: CaseId,
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
    pub created_by: PersonId,
    /// Attorney-client privileged. Hidden from non-attorneys.
    #[serde(default)]
    pub privileged: bool,
}
