//! Row and field rules for cases and timelines.

use crate::identity::OperationContext;
use crate::model::{Case, CaseId, TimelineEvent};
use crate::policy::CaseScope;
use crate::storage::FirmData;

/// Whether the caller may see `case_id` at all.
pub fn can_view_case(ctx: &OperationContext, data: &FirmData, case_id: CaseId) -> bool {
    match ctx.profile().case_scope {
        CaseScope::All => true,
        CaseScope::Assigned => data.assignment(case_id, ctx.person_id).is_some(),
    }
}

/// Every case the caller may see, in storage order.
pub fn visible_cases<'a>(
    ctx: &'a OperationContext,
    data: &'a FirmData,
) -> impl Iterator<Item = &'a Case> + 'a {
    data.cases
        .iter()
        .filter(move |c| can_view_case(ctx, data, c.id))
}

/// Whether the caller may see a timeline event. Privileged entries are for
/// attorneys only.
pub fn can_view_event(ctx: &OperationContext, event: &TimelineEvent) -> bool {
    !event.privileged || ctx.profile().privileged_timeline
}

/// The caller is a partner or the case's Lead.
pub fn can_change_status(ctx: &OperationContext, data: &FirmData, case_id: CaseId) -> bool {
    ctx.is_partner
        || data
            .assignment(case_id, ctx.person_id)
            .is_some_and(|a| a.role == crate::model::AssignmentRole::Lead)
}
