//! Atomic units of change.
//!
//! A changeset bundles row-version expectations, the writes themselves and
//! the one audit entry describing them. The store applies all of it or none
//! of it.

use chrono::NaiveDate;

use crate::audit::{AuditEntry, AuditId};
use crate::model::{
    Assignment, Case, CaseId, CaseStatus, Client, Person, PersonId, PracticeGroup, TimelineEvent,
};

/// A precondition checked before any write is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// The case row is still at `version`.
    CaseVersion { case_id: CaseId, version: u64 },
}

/// A single write. `Insert*` records with id 0 get the next free id at
/// commit; a non-zero id is kept if unused. `AppendEvent` always gets a
/// fresh id.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    InsertPracticeGroup(PracticeGroup),
    InsertClient(Client),
    InsertCase(Case),
    InsertPerson(Person),
    SetPersonActive {
        person_id: PersonId,
        active: bool,
    },
    /// Bumps the case row version. `close_date` is only written when set.
    SetCaseStatus {
        case_id: CaseId,
        status: CaseStatus,
        close_date: Option<NaiveDate>,
    },
    /// Insert, or update the role of the existing (case, person) row.
    UpsertAssignment(Assignment),
    /// Timestamped with the commit time.
    AppendEvent(TimelineEvent),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    pub(crate) expectations: Vec<Expectation>,
    pub(crate) changes: Vec<Change>,
    pub(crate) audit: Option<AuditEntry>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_case_version(mut self, case_id: CaseId, version: u64) -> Self {
        self.expectations
            .push(Expectation::CaseVersion { case_id, version });
        self
    }

    pub fn change(mut self, change: Change) -> Self {
        self.changes.push(change);
        self
    }

    pub fn audit(mut self, entry: AuditEntry) -> Self {
        self.audit = Some(entry);
        self
    }
}

/// What a successful commit produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReceipt {
    /// Ids assigned to inserted records, in change order.
    pub inserted_ids: Vec<u64>,
    pub audit_id: AuditId,
}

impl CommitReceipt {
    pub fn first_inserted(&self) -> Option<u64> {
        self.inserted_ids.first().copied()
    }
}
