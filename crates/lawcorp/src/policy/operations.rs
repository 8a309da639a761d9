//! Operation names exposed as tools.

pub const CASES_SEARCH: &str = "cases_search";
pub const CASES_GET: &str = "cases_get";
pub const CASES_GET_TIMELINE: &str = "cases_get_timeline";
pub const CASES_ADD_NOTE: &str = "cases_add_note";
pub const CASES_UPDATE_STATUS: &str = "cases_update_status";
pub const CASES_ASSIGN_USER: &str = "cases_assign_user";
pub const DOCUMENTS_SEARCH: &str = "documents_search";
pub const DOCUMENTS_GET: &str = "documents_get";
pub const DOCUMENTS_LIST_BY_CASE: &str = "documents_list_by_case";

/// Every operation the server exposes, in catalog order.
pub const ALL: [&str; 9] = [
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
