//! Firm data model: people, cases, assignments, timeline events.
//!
//! These are the records the storage layer persists. Request-scoped
//! projections (operation context, firm identity) live in
//! [`crate::identity`] and are never stored.

pub mod case;
pub mod person;

pub use case::{
    Assignment, AssignmentRole, Case, CaseId, CaseStatus, Client, ClientKind, EventId, EventType,
    PracticeGroup, PracticeGroupId, TimelineEvent,
};
pub use person::{AttorneyDetails, FirmRole, InternDetails, Person, PersonId, RoleDetails};

pub use crate::audit::{AuditId, AuditRecord};

/// Parse an enum name case-insensitively against a list of variants.
pub(crate) fn parse_named<T: Copy>(input: &str, variants: &[T], name: fn(T) -> &'static str) -> Option<T> {
    let needle = input.trim();
    variants
        .iter()
        .copied()
        .find(|v| name(*v).eq_ignore_ascii_case(needle))
}
