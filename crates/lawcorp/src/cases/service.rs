use crate::audit::{AuditEntry, Channel};
use crate::error::Result;
use crate::identity::OperationContext;
use crate::model::{
    Assignment, AssignmentRole, Case, CaseId, CaseStatus, EventId, EventType, PersonId,
    TimelineEvent,
};
use crate::outcome::Outcome;
use crate::storage::{Change, Changeset, FirmData, FirmStore};
use crate::time;

use super::access::{can_change_status, can_view_case, can_view_event, visible_cases};
use super::lifecycle::{illegal_transition_message, invalid_status_message, is_legal};
use super::types::*;

const MAX_PAGE_SIZE: u32 = 100;

/// Filters for [`CaseService::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCases {
    /// Substring of title, description or case number.
    pub query: Option<String>,
    pub status: Option<String>,
    /// Substring of the practice group name.
    pub practice_group: Option<String>,
    pub assigned_to: Option<PersonId>,
    /// Inclusive `yyyy-MM-dd` bounds on the open date.
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for SearchCases {
    fn default() -> Self {
        Self {
            query: None,
            status: None,
            practice_group: None,
            assigned_to: None,
            date_from: None,
            date_to: None,
            page: 1,
            page_size: 20,
        }
    }
}

/// Case operations over a [`FirmStore`].
pub struct CaseService<'a> {
    store: &'a dyn FirmStore,
    channel: Channel,
}

fn not_found(case_id: CaseId) -> String {
    format!("Case {case_id} not found.")
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl<'a> CaseService<'a> {
    pub fn new(store: &'a dyn FirmStore) -> Self {
        Self {
            store,
            channel: Channel::Mcp,
        }
    }

    /// Channel recorded on audit entries. Defaults to `mcp`.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    fn audit(&self, ctx: &OperationContext, action: &str, case_id: CaseId) -> AuditEntry {
        AuditEntry::new(action, "Case", case_id, self.channel).actor(ctx.person_id, ctx.role)
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn search(&self, ctx: &OperationContext, req: &SearchCases) -> Result<Outcome<CasePage>> {
        let status = match non_blank(&req.status) {
            Some(s) => match CaseStatus::parse(s) {
                Some(status) => Some(status),
                None => return Ok(Outcome::invalid(invalid_status_message(s))),
            },
            None => None,
        };
        let mut bounds = [None, None];
        for (slot, (name, value)) in bounds
            .iter_mut()
            .zip([("date_from", &req.date_from), ("date_to", &req.date_to)])
        {
            if let Some(raw) = non_blank(value) {
                match time::parse_date(raw) {
                    Some(date) => *slot = Some(date),
                    None => {
                        return Ok(Outcome::invalid(format!(
                            "Invalid {name} '{raw}'. Expected yyyy-MM-dd."
                        )))
                    }
                }
            }
        }
        let [date_from, date_to] = bounds;
        let page_size = req.page_size.clamp(1, MAX_PAGE_SIZE);
        let page = req.page.max(1);

        let data = self.store.snapshot();
        let query = non_blank(&req.query);
        let group = non_blank(&req.practice_group);

        let mut matches: Vec<&Case> = visible_cases(ctx, &data)
            .filter(|c| {
                query.map_or(true, |q| {
                    contains_ci(&c.title, q)
                        || contains_ci(&c.description, q)
                        || contains_ci(&c.case_number, q)
                })
            })
            .filter(|c| status.map_or(true, |s| c.status == s))
            .filter(|c| {
                group.map_or(true, |g| {
                    data.practice_group(c.practice_group_id)
                        .is_some_and(|pg| contains_ci(&pg.name, g))
                })
            })
            .filter(|c| {
                req.assigned_to
                    .map_or(true, |p| data.assignment(c.id, p).is_some())
            })
            .filter(|c| date_from.map_or(true, |d| c.open_date >= d))
            .filter(|c| date_to.map_or(true, |d| c.open_date <= d))
            .collect();
        matches.sort_by(|a, b| b.open_date.cmp(&a.open_date).then(a.id.cmp(&b.id)));

        let total_count = matches.len();
        let skip = ((page - 1) as usize).saturating_mul(page_size as usize);
        let results = matches
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .map(|c| summarize(&data, c))
            .collect();

        Ok(Outcome::Ok(CasePage {
            results,
            page,
            page_size,
            total_count,
            has_more: (page as usize) * (page_size as usize) < total_count,
        }))
    }

    pub fn get(&self, ctx: &OperationContext, case_id: CaseId) -> Result<Outcome<CaseDetail>> {
        let data = self.store.snapshot();
        let Some(case) = data.case(case_id) else {
            return Ok(Outcome::not_found(not_found(case_id)));
        };
        if !can_view_case(ctx, &data, case_id) {
            log::info!("person {} denied case {case_id}", ctx.person_id);
            return Ok(Outcome::not_assigned());
        }

        let team = data
            .assignments_for_case(case_id)
            .filter_map(|a| {
                let person = data.person(a.person_id)?;
                Some(TeamMember {
                    person_id: person.id,
                    name: person.display_name(),
                    email: person.email.clone(),
                    role: a.role.to_string(),
                    since: time::display_date(&a.assigned_date),
                })
            })
            .collect();

        Ok(Outcome::Ok(CaseDetail {
            id: case.id,
            case_number: case.case_number.clone(),
            title: case.title.clone(),
            description: case.description.clone(),
            status: case.status.to_string(),
            practice_group: practice_group_name(&data, case),
            client: data.client(case.client_id).map(|c| ClientInfo {
                id: c.id,
                name: c.name.clone(),
                kind: c.kind.as_str().to_string(),
                industry: c.industry.clone(),
            }),
            court: case.court_name.as_ref().map(|name| CourtInfo {
                name: name.clone(),
                judge: case.judge_name.clone(),
            }),
            open_date: time::display_date(&case.open_date),
            close_date: case.close_date.as_ref().map(time::display_date),
            estimated_value: case.estimated_value,
            team,
        }))
    }

    pub fn timeline(
        &self,
        ctx: &OperationContext,
        case_id: CaseId,
        event_type: Option<&str>,
    ) -> Result<Outcome<Timeline>> {
        let data = self.store.snapshot();
        if data.case(case_id).is_none() {
            return Ok(Outcome::not_found(not_found(case_id)));
        }
        if !can_view_case(ctx, &data, case_id) {
            return Ok(Outcome::not_assigned());
        }
        let filter = match event_type.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => match EventType::parse(raw) {
                Some(t) => Some(t),
                None => {
                    let valid: Vec<&str> = EventType::ALL.iter().map(|t| t.as_str()).collect();
                    return Ok(Outcome::invalid(format!(
                        "Invalid event type '{raw}'. Valid values: {}.",
                        valid.join(", ")
                    )));
                }
            },
            None => None,
        };

        let events: Vec<TimelineEntry> = data
            .events_for_case(case_id)
            .into_iter()
            .filter(|e| filter.map_or(true, |t| e.event_type == t))
            .filter(|e| can_view_event(ctx, e))
            .map(|e| TimelineEntry {
                id: e.id,
                event_type: e.event_type.to_string(),
                title: e.title.clone(),
                description: e.description.clone(),
                date: time::display_timestamp(&e.occurred_at),
                created_by_id: e.created_by,
                is_privileged: e.privileged,
            })
            .collect();

        Ok(Outcome::Ok(Timeline {
            case_id,
            event_count: events.len(),
            events,
        }))
    }

    // ── Writes ───────────────────────────────────────────────────────────────

    pub fn add_note(
        &self,
        ctx: &OperationContext,
        case_id: CaseId,
        content: &str,
        privileged: bool,
    ) -> Result<Outcome<NoteAdded>> {
        if !ctx.profile().may_add_notes {
            return Ok(Outcome::denied(
                "You do not have permission to add notes to cases.",
            ));
        }
        let content = content.trim();
        if content.is_empty() {
            return Ok(Outcome::invalid("Note content must not be empty."));
        }
        let data = self.store.snapshot();
        if data.case(case_id).is_none() {
            return Ok(Outcome::not_found(not_found(case_id)));
        }
        if !can_view_case(ctx, &data, case_id) {
            return Ok(Outcome::not_assigned());
        }

        let event = new_event(case_id, EventType::Note, "Note", content, ctx.person_id, privileged);
        let changeset = Changeset::new()
            .change(Change::AppendEvent(event))
            .audit(self.audit(ctx, "AddNote", case_id).detail(format!(
                "Note added by {}. Privileged: {privileged}.",
                ctx.display_name
            )));
        let receipt = self.store.commit(changeset)?;
        let event_id = EventId(receipt.first_inserted().unwrap_or_default());

        Ok(Outcome::Ok(NoteAdded {
            success: true,
            case_id,
            event_id,
            is_privileged: privileged,
            message: format!("Note added to case {case_id}."),
        }))
    }

    /// Move a case along the lifecycle. Checks run in order: the case
    /// exists, the caller can see it, the target parses, the edge exists,
    /// and the caller is a partner or the case's Lead.
    pub fn update_status(
        &self,
        ctx: &OperationContext,
        case_id: CaseId,
        new_status: &str,
        reason: Option<&str>,
    ) -> Result<Outcome<StatusChanged>> {
        let data = self.store.snapshot();
        let Some(case) = data.case(case_id) else {
            return Ok(Outcome::not_found(not_found(case_id)));
        };
        if !can_view_case(ctx, &data, case_id) {
            return Ok(Outcome::not_assigned());
        }
        let Some(target) = CaseStatus::parse(new_status) else {
            return Ok(Outcome::invalid(invalid_status_message(new_status)));
        };
        let previous = case.status;
        if !is_legal(previous, target) {
            return Ok(Outcome::invalid(illegal_transition_message(previous, target)));
        }
        if !can_change_status(ctx, &data, case_id) {
            log::info!(
                "person {} may not change status of case {case_id}",
                ctx.person_id
            );
            return Ok(Outcome::denied(
                "Only the lead attorney or a partner can update case status.",
            ));
        }

        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        let description = reason.map(str::to_string).unwrap_or_else(|| {
            format!("Case status updated from {previous} to {target}.")
        });
        let changeset = Changeset::new()
            .expect_case_version(case_id, case.version)
            .change(Change::SetCaseStatus {
                case_id,
                status: target,
                close_date: target.is_closing().then(time::today),
            })
            .change(Change::AppendEvent(new_event(
                case_id,
                EventType::StatusChange,
                &format!("Status changed to {target}"),
                &description,
                ctx.person_id,
                false,
            )))
            .audit(self.audit(ctx, "UpdateStatus", case_id).detail(format!(
                "Status: {previous} -> {target}. Reason: {}.",
                reason.unwrap_or("not provided")
            )));
        self.store.commit(changeset)?;
        log::info!("case {case_id} moved {previous} -> {target} by person {}", ctx.person_id);

        Ok(Outcome::Ok(StatusChanged {
            success: true,
            case_id,
            previous_status: previous.to_string(),
            new_status: target.to_string(),
            message: format!("Case {case_id} status updated to {target}."),
        }))
    }

    /// Assign a person to a case, or change the role of an existing
    /// assignment.
    pub fn assign(
        &self,
        ctx: &OperationContext,
        case_id: CaseId,
        person_id: PersonId,
        role: &str,
    ) -> Result<Outcome<AssignmentMade>> {
        if !ctx.profile().may_assign {
            return Ok(Outcome::denied("Only partners can assign users to cases."));
        }
        let Some(role) = AssignmentRole::parse(role) else {
            return Ok(Outcome::invalid(format!(
                "Invalid role '{role}'. Valid values: Lead, Supporting, Reviewer."
            )));
        };
        let data = self.store.snapshot();
        if data.case(case_id).is_none() {
            return Ok(Outcome::not_found(not_found(case_id)));
        }
        let Some(assignee) = data.person(person_id) else {
            return Ok(Outcome::not_found(format!("User {person_id} not found.")));
        };
        let name = assignee.display_name();
        if !assignee.active {
            return Ok(Outcome::invalid(format!(
                "{name} is inactive and cannot be assigned to cases."
            )));
        }

        let action = if data.assignment(case_id, person_id).is_some() {
            AssignAction::Reassigned
        } else {
            AssignAction::Assigned
        };
        let verb = action.as_str();
        let changeset = Changeset::new()
            .change(Change::UpsertAssignment(Assignment {
                case_id,
                person_id,
                role,
                assigned_date: time::today(),
            }))
            .change(Change::AppendEvent(new_event(
                case_id,
                EventType::Assignment,
                &format!("User {verb}: {name}"),
                &format!("{name} {verb} as {role}."),
                ctx.person_id,
                false,
            )))
            .audit(
                self.audit(ctx, "AssignUser", case_id)
                    .detail(format!("{name} (ID {person_id}) {verb} as {role}.")),
            );
        self.store.commit(changeset)?;

        Ok(Outcome::Ok(AssignmentMade {
            success: true,
            case_id,
            user_id: person_id,
            assignee: name.clone(),
            role: role.to_string(),
            action,
            message: format!("{name} has been {verb} as {role} on case {case_id}."),
        }))
    }
}

fn new_event(
    case_id: CaseId,
    event_type: EventType,
    title: &str,
    description: &str,
    created_by: PersonId,
    privileged: bool,
) -> TimelineEvent {
    TimelineEvent {
        id: EventId(0),
        case_id,
        event_type,
        title: title.to_string(),
        description: description.to_string(),
        occurred_at: time::now(),
        created_by,
        privileged,
    }
}

fn practice_group_name(data: &FirmData, case: &Case) -> String {
    data.practice_group(case.practice_group_id)
        .map(|g| g.name.clone())
        .unwrap_or_default()
}

fn summarize(data: &FirmData, case: &Case) -> CaseSummary {
    CaseSummary {
        id: case.id,
        case_number: case.case_number.clone(),
        title: case.title.clone(),
        status: case.status.to_string(),
        practice_group: practice_group_name(data, case),
        client_name: data
            .client(case.client_id)
            .map(|c| c.name.clone())
            .unwrap_or_default(),
        open_date: time::display_date(&case.open_date),
        estimated_value: case.estimated_value,
        lead_attorney: data.lead_for_case(case.id).map(|p| p.display_name()),
    }
}
