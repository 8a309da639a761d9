//! Document operations: credential exchange, the downstream call, and the
//! local privilege rules applied to what comes back.

use crate::cases::access::can_view_case;
use crate::delegation::{CredentialExchange, DownstreamToken, InboundCredential, PlaceholderExchange};
use crate::error::Result;
use crate::identity::OperationContext;
use crate::model::CaseId;
use crate::outcome::Outcome;
use crate::policy::PrivilegedDocuments;
use crate::storage::FirmStore;

use super::client::{DocumentService, DOCUMENT_DENIED};
use super::types::{DocumentDetail, DocumentPage, DocumentQuery, REDACTED_CONTENT};

/// Page size used when listing a case's documents.
const CASE_LIST_PAGE_SIZE: u32 = 100;

pub struct DocumentOperations<'a> {
    store: &'a dyn FirmStore,
    exchange: &'a dyn CredentialExchange,
    service: &'a dyn DocumentService,
    scopes: &'a [String],
}

impl<'a> DocumentOperations<'a> {
    pub fn new(
        store: &'a dyn FirmStore,
        exchange: &'a dyn CredentialExchange,
        service: &'a dyn DocumentService,
        scopes: &'a [String],
    ) -> Self {
        Self {
            store,
            exchange,
            service,
            scopes,
        }
    }

    /// Trade the caller's credential for a downstream token. Without a
    /// credential (demo mode) the placeholder is used.
    fn token(&self, credential: Option<&InboundCredential>) -> Result<DownstreamToken> {
        match credential {
            Some(inbound) => Ok(self.exchange.exchange(inbound, self.scopes)?),
            None => Ok(PlaceholderExchange.issue(self.scopes)),
        }
    }

    pub fn search(
        &self,
        ctx: &OperationContext,
        credential: Option<&InboundCredential>,
        query: &DocumentQuery,
    ) -> Result<Outcome<DocumentPage>> {
        let token = self.token(credential)?;
        let outcome = self.service.search(&token, query)?;
        Ok(outcome.map(|page| filter_page(ctx, page)))
    }

    pub fn get(
        &self,
        ctx: &OperationContext,
        credential: Option<&InboundCredential>,
        document_id: u64,
    ) -> Result<Outcome<DocumentDetail>> {
        let token = self.token(credential)?;
        let mut detail = match self.service.get(&token, document_id)? {
            Outcome::Ok(detail) => detail,
            refused => return Ok(refused),
        };
        if detail.is_privileged {
            match ctx.profile().privileged_documents {
                PrivilegedDocuments::Full => {}
                PrivilegedDocuments::Redacted => {
                    detail.content = Some(REDACTED_CONTENT.to_string());
                    detail.is_redacted = true;
                }
                PrivilegedDocuments::Withheld => {
                    log::info!(
                        "withholding privileged document {document_id} from person {}",
                        ctx.person_id
                    );
                    return Ok(Outcome::denied(DOCUMENT_DENIED));
                }
            }
        }
        Ok(Outcome::Ok(detail))
    }

    /// Documents filed under a case's matter number. The caller must be
    /// able to see the case.
    pub fn list_by_case(
        &self,
        ctx: &OperationContext,
        credential: Option<&InboundCredential>,
        case_id: CaseId,
        document_type: Option<String>,
        status: Option<String>,
    ) -> Result<Outcome<DocumentPage>> {
        let matter_number = {
            let data = self.store.snapshot();
            let Some(case) = data.case(case_id) else {
                return Ok(Outcome::not_found(format!("Case {case_id} not found.")));
            };
            if !can_view_case(ctx, &data, case_id) {
                return Ok(Outcome::not_assigned());
            }
            case.case_number.clone()
        };
        let query = DocumentQuery {
            matter_number: Some(matter_number),
            document_type,
            status,
            page: 1,
            page_size: CASE_LIST_PAGE_SIZE,
            ..DocumentQuery::default()
        };
        self.search(ctx, credential, &query)
    }
}

fn filter_page(ctx: &OperationContext, mut page: DocumentPage) -> DocumentPage {
    match ctx.profile().privileged_documents {
        PrivilegedDocuments::Full => {}
        PrivilegedDocuments::Redacted => {
            for doc in page.results.iter_mut().filter(|d| d.is_privileged) {
                doc.is_redacted = true;
            }
        }
        PrivilegedDocuments::Withheld => {
            let before = page.results.len();
            page.results.retain(|d| !d.is_privileged);
            let dropped = (before - page.results.len()) as u64;
            page.total_count = page.total_count.saturating_sub(dropped);
        }
    }
    page
}
