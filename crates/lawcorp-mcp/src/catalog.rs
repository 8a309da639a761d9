//! Tool catalog: names, descriptions, and input schemas.

use lawcorp::policy::operations;
use serde_json::{json, Value};

/// The canonical operation name for a (case-insensitive) tool name.
pub(crate) fn canonical(name: &str) -> Option<&'static str> {
    let name = name.trim();
    operations::ALL
        .iter()
        .copied()
        .find(|op| op.eq_ignore_ascii_case(name))
}

fn id_property(description: &str) -> Value {
    json!({"type": "integer", "minimum": 1, "description": description})
}

/// Every tool the server exposes, in catalog order.
pub(crate) fn tools() -> Vec<Value> {
    vec![
        json!({
            "name": operations::CASES_SEARCH,
            "description": "Search cases visible to you. Partners see every case; other roles see cases they are assigned to. Ordered by open date, newest first.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Text matched against title, description, and case number"},
                    "status": {"type": "string", "description": "Active, OnHold, Closed, or Settled"},
                    "practice_group": {"type": "string", "description": "Practice group name (partial match)"},
                    "assigned_to": id_property("Only cases this person is assigned to"),
                    "date_from": {"type": "string", "description": "Opened on or after (yyyy-MM-dd)"},
                    "date_to": {"type": "string", "description": "Opened on or before (yyyy-MM-dd)"},
                    "page": {"type": "integer", "minimum": 1, "default": 1},
                    "page_size": {"type": "integer", "minimum": 1, "maximum": 100, "default": 20}
                }
            }
        }),
        json!({
            "name": operations::CASES_GET,
            "description": "Full case detail with client, court, and team.",
            "inputSchema": {
                "type": "object",
                "required": ["case_id"],
                "properties": {"case_id": id_property("Case id")}
            }
        }),
        json!({
            "name": operations::CASES_GET_TIMELINE,
            "description": "Chronological case events. Privileged notes are shown to attorneys only.",
            "inputSchema": {
                "type": "object",
                "required": ["case_id"],
                "properties": {
                    "case_id": id_property("Case id"),
                    "event_type": {"type": "string", "description": "Filter: StatusChange, Note, Assignment, Filing, Hearing, Deadline, DocumentAdded, Other"}
                }
            }
        }),
        json!({
            "name": operations::CASES_ADD_NOTE,
            "description": "Add a note to a case timeline. Attorneys only.",
            "inputSchema": {
                "type": "object",
                "required": ["case_id", "content"],
                "properties": {
                    "case_id": id_property("Case id"),
                    "content": {"type": "string", "description": "Note text"},
                    "is_privileged": {"type": "boolean", "default": false, "description": "Attorney-client privileged note"}
                }
            }
        }),
        json!({
            "name": operations::CASES_UPDATE_STATUS,
            "description": "Move a case to a new status. Allowed: Active to OnHold, Closed, or Settled; OnHold to Active. Lead attorney or partner only.",
            "inputSchema": {
                "type": "object",
                "required": ["case_id", "new_status"],
                "properties": {
                    "case_id": id_property("Case id"),
                    "new_status": {"type": "string", "description": "Active, OnHold, Closed, or Settled"},
                    "reason": {"type": "string", "description": "Recorded on the timeline"}
                }
            }
        }),
        json!({
            "name": operations::CASES_ASSIGN_USER,
            "description": "Assign a firm member to a case, or change their role on it. Partners only.",
            "inputSchema": {
                "type": "object",
                "required": ["case_id", "user_id", "role"],
                "properties": {
                    "case_id": id_property("Case id"),
                    "user_id": id_property("Person to assign"),
                    "role": {"type": "string", "description": "Lead, Supporting, or Reviewer"}
                }
            }
        }),
        json!({
            "name": operations::DOCUMENTS_SEARCH,
            "description": "Search the document management system on your behalf.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search text"},
                    "document_type": {"type": "string"},
                    "case_id": id_property("Only documents for this case"),
                    "author_id": id_property("Only documents by this author"),
                    "page": {"type": "integer", "minimum": 1, "default": 1},
                    "page_size": {"type": "integer", "minimum": 1, "maximum": 100, "default": 20}
                }
            }
        }),
        json!({
            "name": operations::DOCUMENTS_GET,
            "description": "Fetch one document. Privileged content may be redacted for your role.",
            "inputSchema": {
                "type": "object",
                "required": ["document_id"],
                "properties": {"document_id": id_property("Document id")}
            }
        }),
        json!({
            "name": operations::DOCUMENTS_LIST_BY_CASE,
            "description": "List documents filed under a case's matter number.",
            "inputSchema": {
                "type": "object",
                "required": ["case_id"],
                "properties": {
                    "case_id": id_property("Case id"),
                    "document_type": {"type": "string"},
                    "status": {"type": "string", "description": "Document status, e.g. Draft or Final"}
                }
            }
        }),
    ]
}
