//! Operation results. Serialized in camelCase for the protocol surface.

use serde::Serialize;

use crate::model::{CaseId, EventId, PersonId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    pub id: CaseId,
    pub case_number: String,
    pub title: String,
    pub status: String,
    pub practice_group: String,
    pub client_name: String,
    pub open_date: String,
    pub estimated_value: f64,
    pub lead_attorney: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CasePage {
    pub results: Vec<CaseSummary>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtInfo {
    pub name: String,
    pub judge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub person_id: PersonId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub since: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetail {
    pub id: CaseId,
    pub case_number: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub practice_group: String,
    pub client: Option<ClientInfo>,
    pub court: Option<CourtInfo>,
    pub open_date: String,
    pub close_date: Option<String>,
    pub estimated_value: f64,
    pub team: Vec<TeamMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub created_by_id: PersonId,
    pub is_privileged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub case_id: CaseId,
    pub event_count: usize,
    pub events: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteAdded {
    pub success: bool,
    pub case_id: CaseId,
    pub event_id: EventId,
    pub is_privileged: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChanged {
    pub success: bool,
    pub case_id: CaseId,
    pub previous_status: String,
    pub new_status: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignAction {
    Assigned,
    Reassigned,
}

impl AssignAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Reassigned => "reassigned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentMade {
    pub success: bool,
    pub case_id: CaseId,
    pub user_id: PersonId,
    pub assignee: String,
    pub role: String,
    pub action: AssignAction,
    pub message: String,
}
