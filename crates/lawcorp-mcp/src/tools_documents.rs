//! Document tools. The caller's credential is exchanged before every call.

use lawcorp::model::CaseId;
use lawcorp::{DocumentOperations, DocumentQuery, InboundCredential, OperationContext, Outcome, Result};
use serde_json::Value;

use crate::args::{arg, optional_id, optional_str, optional_u32, required_id};
use crate::server::render;

pub(crate) fn search(
    docs: &DocumentOperations,
    ctx: &OperationContext,
    credential: Option<&InboundCredential>,
    args: &Value,
) -> Result<Outcome<Value>> {
    let defaults = DocumentQuery::default();
    let query = DocumentQuery {
        query: arg!(optional_str(args, "query")),
        document_type: arg!(optional_str(args, "document_type")),
        case_id: arg!(optional_id(args, "case_id")),
        author_id: arg!(optional_id(args, "author_id")),
        page: arg!(optional_u32(args, "page")).unwrap_or(defaults.page).max(1),
        page_size: arg!(optional_u32(args, "page_size"))
            .unwrap_or(defaults.page_size)
            .clamp(1, 100),
        ..defaults
    };
    render(docs.search(ctx, credential, &query))
}

pub(crate) fn get(
    docs: &DocumentOperations,
    ctx: &OperationContext,
    credential: Option<&InboundCredential>,
    args: &Value,
) -> Result<Outcome<Value>> {
    let document_id = arg!(required_id(args, "document_id"));
    render(docs.get(ctx, credential, document_id))
}

pub(crate) fn list_by_case(
    docs: &DocumentOperations,
    ctx: &OperationContext,
    credential: Option<&InboundCredential>,
    args: &Value,
) -> Result<Outcome<Value>> {
    let case_id = CaseId(arg!(required_id(args, "case_id")));
    let document_type = arg!(optional_str(args, "document_type"));
    let status = arg!(optional_str(args, "status"));
    render(docs.list_by_case(ctx, credential, case_id, document_type, status))
}
