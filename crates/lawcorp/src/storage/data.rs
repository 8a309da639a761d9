//! The firm data set and the rules for applying a changeset to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::changeset::{Change, Changeset, CommitReceipt, Expectation};
use crate::audit::{AuditId, AuditRecord};
use crate::error::{FirmError, Result};
use crate::model::{
    Assignment, Case, CaseId, Client, EventId, Person, PersonId, PracticeGroup, PracticeGroupId,
    TimelineEvent,
};

/// Result of looking up a person by external subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubjectMatch<'a> {
    Missing,
    Unique(&'a Person),
    /// More than one active person carries the subject.
    Ambiguous,
}

/// Everything the store holds. Readers get an immutable, shared copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirmData {
    #[serde(default)]
    pub practice_groups: Vec<PracticeGroup>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub cases: Vec<Case>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
    #[serde(default)]
    pub audit: Vec<AuditRecord>,
}

// ── Queries ──────────────────────────────────────────────────────────────────

impl FirmData {
    pub fn case(&self, id: CaseId) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn case_by_number(&self, case_number: &str) -> Option<&Case> {
        self.cases
            .iter()
            .find(|c| c.case_number.eq_ignore_ascii_case(case_number))
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    /// The active person carrying `subject`, if exactly one does.
    pub fn active_person_by_subject(&self, subject: &str) -> SubjectMatch<'_> {
        let mut matches = self
            .people
            .iter()
            .filter(|p| p.active && p.external_subject.as_deref() == Some(subject));
        match (matches.next(), matches.next()) {
            (None, _) => SubjectMatch::Missing,
            (Some(person), None) => SubjectMatch::Unique(person),
            (Some(_), Some(_)) => SubjectMatch::Ambiguous,
        }
    }

    pub fn practice_group(&self, id: PracticeGroupId) -> Option<&PracticeGroup> {
        self.practice_groups.iter().find(|g| g.id == id)
    }

    pub fn practice_group_by_name(&self, name: &str) -> Option<&PracticeGroup> {
        self.practice_groups
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    pub fn client(&self, id: u64) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn assignment(&self, case_id: CaseId, person_id: PersonId) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.case_id == case_id && a.person_id == person_id)
    }

    pub fn assignments_for_case(&self, case_id: CaseId) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(move |a| a.case_id == case_id)
    }

    /// Sorted ids of every case `person_id` is assigned to.
    pub fn assigned_case_ids(&self, person_id: PersonId) -> Vec<CaseId> {
        let mut ids: Vec<CaseId> = self
            .assignments
            .iter()
            .filter(|a| a.person_id == person_id)
            .map(|a| a.case_id)
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn lead_for_case(&self, case_id: CaseId) -> Option<&Person> {
        self.assignments_for_case(case_id)
            .find(|a| a.role == crate::model::AssignmentRole::Lead)
            .and_then(|a| self.person(a.person_id))
    }

    /// Timeline events for a case, oldest first.
    pub fn events_for_case(&self, case_id: CaseId) -> Vec<&TimelineEvent> {
        let mut events: Vec<&TimelineEvent> =
            self.events.iter().filter(|e| e.case_id == case_id).collect();
        events.sort_by_key(|e| (e.occurred_at, e.id));
        events
    }

    pub fn last_audit(&self) -> Option<&AuditRecord> {
        self.audit.last()
    }
}

// ── Apply ────────────────────────────────────────────────────────────────────

/// Keep a requested non-zero id if it is free, otherwise take the next one.
fn assign_id<T>(requested: u64, items: &[T], id: impl Fn(&T) -> u64) -> Result<u64> {
    if requested == 0 {
        return Ok(items.iter().map(id).max().unwrap_or(0) + 1);
    }
    if items.iter().any(|item| id(item) == requested) {
        return Err(invalid(format!("id {requested} already in use")));
    }
    Ok(requested)
}

fn invalid(message: impl Into<String>) -> FirmError {
    FirmError::InvalidChangeset(message.into())
}

impl FirmData {
    /// Apply a changeset in place. On error `self` may be partially
    /// modified; callers apply to a private copy and discard it on failure.
    pub(crate) fn apply(&mut self, changeset: Changeset, now: DateTime<Utc>) -> Result<CommitReceipt> {
        let Changeset {
            expectations,
            changes,
            audit,
        } = changeset;

        if changes.is_empty() {
            return Err(invalid("changeset has no changes"));
        }
        let Some(audit) = audit else {
            return Err(invalid("mutating changeset carries no audit record"));
        };

        for expectation in &expectations {
            match *expectation {
                Expectation::CaseVersion { case_id, version } => {
                    let case = self
                        .case(case_id)
                        .ok_or_else(|| FirmError::NotFound(format!("case {case_id}")))?;
                    if case.version != version {
                        return Err(FirmError::WriteConflict {
                            entity: format!("case {case_id}"),
                        });
                    }
                }
            }
        }

        let mut inserted = Vec::new();
        for change in changes {
            if let Some(id) = self.apply_change(change, now)? {
                inserted.push(id);
            }
        }

        let id = AuditId(self.last_audit().map(|r| r.id.0).unwrap_or(0) + 1);
        let previous = self.last_audit().map(|r| r.record_hash.clone());
        let record = audit.seal(id, now, previous);
        self.audit.push(record);

        Ok(CommitReceipt {
            inserted_ids: inserted,
            audit_id: id,
        })
    }

    fn apply_change(&mut self, change: Change, now: DateTime<Utc>) -> Result<Option<u64>> {
        match change {
            Change::InsertPracticeGroup(mut group) => {
                if self.practice_group_by_name(&group.name).is_some() {
                    return Err(invalid(format!("practice group '{}' exists", group.name)));
                }
                group.id = PracticeGroupId(assign_id(group.id.0, &self.practice_groups, |g| g.id.0)?);
                let id = group.id.0;
                self.practice_groups.push(group);
                Ok(Some(id))
            }
            Change::InsertClient(mut client) => {
                client.id = assign_id(client.id, &self.clients, |c| c.id)?;
                let id = client.id;
                self.clients.push(client);
                Ok(Some(id))
            }
            Change::InsertCase(mut case) => {
                if self.case_by_number(&case.case_number).is_some() {
                    return Err(invalid(format!("case number '{}' exists", case.case_number)));
                }
                if self.practice_group(case.practice_group_id).is_none() {
                    return Err(invalid("case references an unknown practice group"));
                }
                if self.client(case.client_id).is_none() {
                    return Err(invalid("case references an unknown client"));
                }
                case.id = CaseId(assign_id(case.id.0, &self.cases, |c| c.id.0)?);
                case.version = 0;
                let id = case.id.0;
                self.cases.push(case);
                Ok(Some(id))
            }
            Change::InsertPerson(mut person) => {
                if let Some(subject) = person.external_subject.as_deref() {
                    if self
                        .people
                        .iter()
                        .any(|p| p.external_subject.as_deref() == Some(subject))
                    {
                        return Err(invalid("external subject already linked to a person"));
                    }
                }
                if let Some(group) = person.practice_group_id {
                    if self.practice_group(group).is_none() {
                        return Err(invalid("person references an unknown practice group"));
                    }
                }
                if let Some(supervisor) = person.supervisor_id {
                    if self.person(supervisor).is_none() {
                        return Err(invalid("person references an unknown supervisor"));
                    }
                }
                person.id = PersonId(assign_id(person.id.0, &self.people, |p| p.id.0)?);
                let id = person.id.0;
                self.people.push(person);
                Ok(Some(id))
            }
            Change::SetPersonActive { person_id, active } => {
                let person = self
                    .people
                    .iter_mut()
                    .find(|p| p.id == person_id)
                    .ok_or_else(|| FirmError::NotFound(format!("person {person_id}")))?;
                person.active = active;
                Ok(None)
            }
            Change::SetCaseStatus {
                case_id,
                status,
                close_date,
            } => {
                let case = self
                    .cases
                    .iter_mut()
                    .find(|c| c.id == case_id)
                    .ok_or_else(|| FirmError::NotFound(format!("case {case_id}")))?;
                case.status = status;
                if close_date.is_some() {
                    case.close_date = close_date;
                }
                case.version += 1;
                Ok(None)
            }
            Change::UpsertAssignment(assignment) => {
                if self.case(assignment.case_id).is_none() {
                    return Err(invalid("assignment references an unknown case"));
                }
                if self.person(assignment.person_id).is_none() {
                    return Err(invalid("assignment references an unknown person"));
                }
                let existing = self.assignments.iter().position(|a| {
                    a.case_id == assignment.case_id && a.person_id == assignment.person_id
                });
                match existing {
                    Some(i) => self.assignments[i].role = assignment.role,
                    None => self.assignments.push(assignment),
                }
                Ok(None)
            }
            Change::AppendEvent(mut event) => {
                if self.case(event.case_id).is_none() {
                    return Err(invalid("event references an unknown case"));
                }
                event.id = EventId(assign_id(0, &self.events, |e| e.id.0)?);
                event.occurred_at = now;
                let id = event.id.0;
                self.events.push(event);
                Ok(Some(id))
            }
        }
    }
}
