//! Case tools.

use lawcorp::model::{CaseId, PersonId};
use lawcorp::{CaseService, OperationContext, Outcome, Result, SearchCases};
use serde_json::Value;

use crate::args::{arg, optional_bool, optional_id, optional_str, optional_u32, required_id, required_str};
use crate::server::render;

pub(crate) fn search(cases: &CaseService, ctx: &OperationContext, args: &Value) -> Result<Outcome<Value>> {
    let defaults = SearchCases::default();
    let request = SearchCases {
        query: arg!(optional_str(args, "query")),
        status: arg!(optional_str(args, "status")),
        practice_group: arg!(optional_str(args, "practice_group")),
        assigned_to: arg!(optional_id(args, "assigned_to")).map(PersonId),
        date_from: arg!(optional_str(args, "date_from")),
        date_to: arg!(optional_str(args, "date_to")),
        page: arg!(optional_u32(args, "page")).unwrap_or(defaults.page),
        page_size: arg!(optional_u32(args, "page_size")).unwrap_or(defaults.page_size),
    };
    render(cases.search(ctx, &request))
}

pub(crate) fn get(cases: &CaseService, ctx: &OperationContext, args: &Value) -> Result<Outcome<Value>> {
    let case_id = CaseId(arg!(required_id(args, "case_id")));
    render(cases.get(ctx, case_id))
}

pub(crate) fn timeline(cases: &CaseService, ctx: &OperationContext, args: &Value) -> Result<Outcome<Value>> {
    let case_id = CaseId(arg!(required_id(args, "case_id")));
    let event_type = arg!(optional_str(args, "event_type"));
    render(cases.timeline(ctx, case_id, event_type.as_deref()))
}

pub(crate) fn add_note(cases: &CaseService, ctx: &OperationContext, args: &Value) -> Result<Outcome<Value>> {
    let case_id = CaseId(arg!(required_id(args, "case_id")));
    let content = arg!(required_str(args, "content"));
    let privileged = arg!(optional_bool(args, "is_privileged")).unwrap_or(false);
    render(cases.add_note(ctx, case_id, &content, privileged))
}

pub(crate) fn update_status(cases: &CaseService, ctx: &OperationContext, args: &Value) -> Result<Outcome<Value>> {
    let case_id = CaseId(arg!(required_id(args, "case_id")));
    let new_status = arg!(required_str(args, "new_status"));
    let reason = arg!(optional_str(args, "reason"));
    render(cases.update_status(ctx, case_id, &new_status, reason.as_deref()))
}

pub(crate) fn assign_user(cases: &CaseService, ctx: &OperationContext, args: &Value) -> Result<Outcome<Value>> {
    let case_id = CaseId(arg!(required_id(args, "case_id")));
    let user_id = PersonId(arg!(required_id(args, "user_id")));
    let role = arg!(required_str(args, "role"));
    render(cases.assign(ctx, case_id, user_id, &role))
}
