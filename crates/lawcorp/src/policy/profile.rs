//! Role profiles, the single role → capability table.

use serde::Serialize;

use super::operations::*;
use crate::model::FirmRole;

/// Which cases a role can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseScope {
    /// Every case in the firm.
    All,
    /// Only cases the person holds an assignment on.
    Assigned,
}

/// How privileged documents from the document service are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegedDocuments {
    /// Listed and readable.
    Full,
    /// Listed with a redaction flag; content replaced on read.
    Redacted,
    /// Dropped from listings; reads are denied.
    Withheld,
}

/// Everything a role is allowed to do.
#[derive(Debug, Clone, Serialize)]
pub struct RoleProfile {
    pub role: FirmRole,
    pub operations: &'static [&'static str],
    pub case_scope: CaseScope,
    pub attorney: bool,
    pub partner: bool,
    /// Sees privileged timeline notes.
    pub privileged_timeline: bool,
    pub privileged_documents: PrivilegedDocuments,
    pub may_assign: bool,
    pub may_add_notes: bool,
}

impl RoleProfile {
    /// Case-insensitive membership test. Unknown names are never allowed.
    pub fn allows(&self, operation: &str) -> bool {
        let operation = operation.trim();
        self.operations
            .iter()
            .any(|op| op.eq_ignore_ascii_case(operation))
    }

    /// The role's operations, sorted case-insensitively.
    pub fn sorted_operations(&self) -> Vec<&'static str> {
        let mut ops = self.operations.to_vec();
        ops.sort_by_key(|op| op.to_ascii_lowercase());
        ops
    }
}

// ── Table ────────────────────────────────────────────────────────────────────

const PARTNER_OPS: &[&str] = &[
    CASES_SEARCH,
    CASES_GET,
    CASES_GET_TIMELINE,
    CASES_ADD_NOTE,
    CASES_UPDATE_STATUS,
    CASES_ASSIGN_USER,
    DOCUMENTS_SEARCH,
    DOCUMENTS_GET,
    DOCUMENTS_LIST_BY_CASE,
];

const ASSOCIATE_OPS: &[&str] = &[
    CASES_SEARCH,
    CASES_GET,
    CASES_GET_TIMELINE,
    CASES_ADD_NOTE,
    CASES_UPDATE_STATUS,
    DOCUMENTS_SEARCH,
    DOCUMENTS_GET,
    DOCUMENTS_LIST_BY_CASE,
];

// OfCounsel and Paralegal share a set; they differ in flags.
const CASE_WORKER_OPS: &[&str] = &[
    CASES_SEARCH,
    CASES_GET,
    CASES_GET_TIMELINE,
    CASES_ADD_NOTE,
    DOCUMENTS_SEARCH,
    DOCUMENTS_GET,
    DOCUMENTS_LIST_BY_CASE,
];

const LEGAL_ASSISTANT_OPS: &[&str] = &[
    CASES_SEARCH,
    CASES_GET,
    CASES_GET_TIMELINE,
    DOCUMENTS_SEARCH,
    DOCUMENTS_GET,
    DOCUMENTS_LIST_BY_CASE,
];

const INTERN_OPS: &[&str] = &[
    CASES_SEARCH,
    CASES_GET,
    DOCUMENTS_SEARCH,
    DOCUMENTS_GET,
    DOCUMENTS_LIST_BY_CASE,
];

static PROFILES: [RoleProfile; 6] = [
    RoleProfile {
        role: FirmRole::Partner,
        operations: PARTNER_OPS,
        case_scope: CaseScope::All,
        attorney: true,
        partner: true,
        privileged_timeline: true,
        privileged_documents: PrivilegedDocuments::Full,
        may_assign: true,
        may_add_notes: true,
    },
    RoleProfile {
        role: FirmRole::Associate,
        operations: ASSOCIATE_OPS,
        case_scope: CaseScope::Assigned,
        attorney: true,
        partner: false,
        privileged_timeline: true,
        privileged_documents: PrivilegedDocuments::Full,
        may_assign: false,
        may_add_notes: true,
    },
    RoleProfile {
        role: FirmRole::OfCounsel,
        operations: CASE_WORKER_OPS,
        case_scope: CaseScope::Assigned,
        attorney: true,
        partner: false,
        privileged_timeline: true,
        privileged_documents: PrivilegedDocuments::Full,
        may_assign: false,
        may_add_notes: true,
    },
    RoleProfile {
        role: FirmRole::Paralegal,
        operations: CASE_WORKER_OPS,
        case_scope: CaseScope::Assigned,
        attorney: false,
        partner: false,
        privileged_timeline: false,
        privileged_documents: PrivilegedDocuments::Withheld,
        may_assign: false,
        may_add_notes: false,
    },
    RoleProfile {
        role: FirmRole::LegalAssistant,
        operations: LEGAL_ASSISTANT_OPS,
        case_scope: CaseScope::Assigned,
        attorney: false,
        partner: false,
        privileged_timeline: false,
        privileged_documents: PrivilegedDocuments::Withheld,
        may_assign: false,
        may_add_notes: false,
    },
    RoleProfile {
        role: FirmRole::Intern,
        operations: INTERN_OPS,
        case_scope: CaseScope::Assigned,
        attorney: false,
        partner: false,
        privileged_timeline: false,
        privileged_documents: PrivilegedDocuments::Redacted,
        may_assign: false,
        may_add_notes: false,
    },
];

/// Look up the profile for a role.
pub fn profile_for(role: FirmRole) -> &'static RoleProfile {
    match role {
        FirmRole::Partner => &PROFILES[0],
        FirmRole::Associate => &PROFILES[1],
        FirmRole::OfCounsel => &PROFILES[2],
        FirmRole::Paralegal => &PROFILES[3],
        FirmRole::LegalAssistant => &PROFILES[4],
        FirmRole::Intern => &PROFILES[5],
    }
}
