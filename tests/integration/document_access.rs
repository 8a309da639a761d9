//! Integration test: document operations behind credential exchange.
//!
//! Every role lists and reads documents for a case through the token cache
//! and a recording document service. Checks privileged filtering per role,
//! that the downstream only ever sees exchanged tokens, and the HTTP client
//! against a wiremock document service.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{Duration, Utc};
use tokio::runtime::{Builder, Runtime};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;
use lawcorp::config::DownstreamConfig;
use lawcorp::documents::{DOCUMENT_DENIED, REDACTED_CONTENT};
use lawcorp::FirmStore;
use lawcorp::{
    CredentialExchange, DocumentDetail, DocumentOperations, DocumentPage, DocumentQuery,
    DocumentService, DocumentSummary, DownstreamToken, ExchangeError, FirmError,
    HttpDocumentService, InboundCredential, Outcome, TokenCache,
};

// ── Fakes ─────────────────────────────────────────────────────────────────────

/// Issues `obo-<subject>` tokens and counts calls.
#[derive(Default)]
struct BrokerStub {
    calls: AtomicUsize,
    consent_missing: bool,
}

impl CredentialExchange for BrokerStub {
    fn exchange(
        &self,
        inbound: &InboundCredential,
        scopes: &[String],
    ) -> Result<DownstreamToken, ExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.consent_missing {
            return Err(ExchangeError::ConsentRequired {
                scopes: scopes.join(" "),
                reason: "AADSTS65001".into(),
            });
        }
        Ok(DownstreamToken::new(
            format!("obo-{}", inbound.subject()),
            scopes.to_vec(),
            Utc::now() + Duration::hours(1),
        ))
    }
}

struct DocumentStore {
    docs: Vec<DocumentDetail>,
    seen_auth: Mutex<Vec<String>>,
    seen_queries: Mutex<Vec<DocumentQuery>>,
}

impl DocumentStore {
    fn new() -> Self {
        Self {
            docs: vec![
                detail(100, "Engagement letter", false),
                detail(101, "Litigation strategy memo", true),
                detail(102, "Deposition outline", true),
            ],
            seen_auth: Mutex::new(Vec::new()),
            seen_queries: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.seen_auth.lock().unwrap().len()
    }
}

impl DocumentService for DocumentStore {
    fn search(&self, token: &DownstreamToken, query: &DocumentQuery) -> lawcorp::Result<Outcome<DocumentPage>> {
        self.seen_auth.lock().unwrap().push(token.authorization());
        self.seen_queries.lock().unwrap().push(query.clone());
        let results: Vec<DocumentSummary> = self
            .docs
            .iter()
            .filter(|d| query.matter_number.is_none() || d.case_number == query.matter_number)
            .map(summary)
            .collect();
        Ok(Outcome::Ok(DocumentPage {
            total_count: results.len() as u64,
            results,
            page: query.page,
            page_size: query.page_size,
            has_more: false,
        }))
    }

    fn get(&self, token: &DownstreamToken, document_id: u64) -> lawcorp::Result<Outcome<DocumentDetail>> {
        self.seen_auth.lock().unwrap().push(token.authorization());
        Ok(match self.docs.iter().find(|d| d.id == document_id) {
            Some(d) => Outcome::Ok(d.clone()),
            None => Outcome::not_found(format!("Document {document_id} not found.")),
        })
    }
}

fn detail(id: u64, title: &str, privileged: bool) -> DocumentDetail {
    DocumentDetail {
        id,
        title: title.into(),
        document_type: "Memo".into(),
        status: "Final".into(),
        content: Some(format!("Body of {title}")),
        author_name: Some("Sam Ortiz".into()),
        author_id: Some(ASSOCIATE.0),
        case_id: Some(ACTIVE_CASE.0),
        case_number: Some(ACTIVE_MATTER.into()),
        is_privileged: privileged,
        is_redacted: false,
        created_date: "2024-03-01T10:00:00Z".into(),
        modified_date: None,
    }
}

fn summary(d: &DocumentDetail) -> DocumentSummary {
    DocumentSummary {
        id: d.id,
        title: d.title.clone(),
        document_type: d.document_type.clone(),
        status: d.status.clone(),
        author_name: d.author_name.clone(),
        case_id: d.case_id,
        case_number: d.case_number.clone(),
        is_privileged: d.is_privileged,
        is_redacted: false,
        created_date: d.created_date.clone(),
        modified_date: d.modified_date.clone(),
    }
}

fn scopes() -> Vec<String> {
    vec!["api://document-service/Documents.Read".to_string()]
}

// ── Role behaviour ────────────────────────────────────────────────────────────

#[test]
fn case_documents_follow_privileged_rules_per_role() {
    let firm = Firm::seeded();
    let (broker, docs, scopes) = (BrokerStub::default(), DocumentStore::new(), scopes());
    let ops = DocumentOperations::new(&firm.store, &broker, &docs, &scopes);

    // (person, listed ids, redacted ids)
    let expectations: [(lawcorp::PersonId, &[u64], &[u64]); 6] = [
        (PARTNER, &[100, 101, 102], &[]),
        (ASSOCIATE, &[100, 101, 102], &[]),
        (COUNSEL, &[100, 101, 102], &[]),
        (INTERN, &[100, 101, 102], &[101, 102]),
        (PARALEGAL, &[100], &[]),
        (ASSISTANT, &[100], &[]),
    ];

    for (person, listed, redacted) in expectations {
        let caller = firm.caller(&subject_of(person));
        let ctx = caller.context().unwrap();
        let page = ops
            .list_by_case(&ctx, caller.credential(), ACTIVE_CASE, None, None)
            .unwrap()
            .ok()
            .unwrap();
        let ids: Vec<u64> = page.results.iter().map(|d| d.id).collect();
        assert_eq!(ids, listed, "{}", ctx.role);
        assert_eq!(page.total_count, listed.len() as u64, "{}", ctx.role);
        let flagged: Vec<u64> = page
            .results
            .iter()
            .filter(|d| d.is_redacted)
            .map(|d| d.id)
            .collect();
        assert_eq!(flagged, redacted, "{}", ctx.role);
    }

    let queries = docs.seen_queries.lock().unwrap();
    assert!(queries
        .iter()
        .all(|q| q.matter_number.as_deref() == Some(ACTIVE_MATTER) && q.page_size == 100));
}

#[test]
fn privileged_document_reads_per_role() {
    let firm = Firm::seeded();
    let (broker, docs, scopes) = (BrokerStub::default(), DocumentStore::new(), scopes());
    let ops = DocumentOperations::new(&firm.store, &broker, &docs, &scopes);

    let read = |person| {
        let caller = firm.caller(&subject_of(person));
        ops.get(&caller.context().unwrap(), caller.credential(), 101)
            .unwrap()
    };

    let full = read(ASSOCIATE).ok().unwrap();
    assert_eq!(full.content.as_deref(), Some("Body of Litigation strategy memo"));
    assert!(!full.is_redacted);

    let redacted = read(INTERN).ok().unwrap();
    assert_eq!(redacted.content.as_deref(), Some(REDACTED_CONTENT));
    assert!(redacted.is_redacted);
    assert_eq!(redacted.title, "Litigation strategy memo");

    for person in [PARALEGAL, ASSISTANT] {
        let denied = read(person);
        assert_eq!(denied, Outcome::Denied(DOCUMENT_DENIED.to_string()));
    }

    // Non-privileged documents are readable by everyone.
    let caller = firm.caller(&subject_of(PARALEGAL));
    let open = ops
        .get(&caller.context().unwrap(), caller.credential(), 100)
        .unwrap();
    assert!(open.is_ok());
}

#[test]
fn unassigned_caller_never_reaches_the_document_service() {
    let firm = Firm::seeded();
    let (broker, docs, scopes) = (BrokerStub::default(), DocumentStore::new(), scopes());
    let ops = DocumentOperations::new(&firm.store, &broker, &docs, &scopes);

    let caller = firm.caller(&subject_of(ASSOCIATE));
    let outcome = ops
        .list_by_case(&caller.context().unwrap(), caller.credential(), UNSTAFFED_CASE, None, None)
        .unwrap();
    assert!(outcome.is_denied());
    assert_eq!(docs.calls(), 0);
    assert_eq!(broker.calls.load(Ordering::SeqCst), 0);
}

// ── Credential exchange ───────────────────────────────────────────────────────

#[test]
fn downstream_sees_cached_exchanged_tokens_only() {
    let firm = Firm::seeded();
    let broker = TokenCache::new(BrokerStub::default());
    let (docs, scopes) = (DocumentStore::new(), scopes());
    let ops = DocumentOperations::new(&firm.store, &broker, &docs, &scopes);

    let authorization = bearer(&subject_of(ASSOCIATE));
    let caller = firm
        .resolver
        .resolve(Some(authorization.as_str()), &firm.store.snapshot());
    let ctx = caller.context().unwrap();
    for _ in 0..3 {
        ops.search(&ctx, caller.credential(), &DocumentQuery::default())
            .unwrap();
    }
    ops.get(&ctx, caller.credential(), 100).unwrap();

    assert_eq!(broker.len(), 1);
    let seen = docs.seen_auth.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|a| a == "Bearer obo-oid-2"));
    assert!(seen.iter().all(|a| *a != authorization));
}

#[test]
fn missing_consent_is_a_fault_not_a_denial() {
    let firm = Firm::seeded();
    let broker = BrokerStub {
        consent_missing: true,
        ..BrokerStub::default()
    };
    let (docs, scopes) = (DocumentStore::new(), scopes());
    let ops = DocumentOperations::new(&firm.store, &broker, &docs, &scopes);

    let caller = firm.caller(&subject_of(PARTNER));
    let err = ops
        .list_by_case(&caller.context().unwrap(), caller.credential(), ACTIVE_CASE, None, None)
        .unwrap_err();
    assert!(matches!(
        err,
        FirmError::Exchange(ExchangeError::ConsentRequired { .. })
    ));
    assert!(!err.is_retryable());
    assert_eq!(docs.calls(), 0);
}

// ── HTTP client ───────────────────────────────────────────────────────────────

/// A wiremock document service driven from blocking tests.
struct DocumentApi {
    server: MockServer,
    runtime: Runtime,
}

impl DocumentApi {
    fn start(mock: Mock) -> Self {
        let runtime = Builder::new_current_thread().enable_all().build().unwrap();
        let server = runtime.block_on(MockServer::start());
        runtime.block_on(mock.mount(&server));
        Self { server, runtime }
    }

    fn service(&self) -> HttpDocumentService {
        HttpDocumentService::new(&DownstreamConfig {
            base_url: self.server.uri(),
            scopes: scopes(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn request_count(&self) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .map_or(0, |r| r.len())
    }
}

fn json(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.to_owned(), "application/json")
}

#[test]
fn http_client_lists_case_documents_with_exchanged_token() {
    let firm = Firm::seeded();
    let api = DocumentApi::start(
        Mock::given(method("GET"))
            .and(path("/api/documents"))
            .and(query_param("matterNumber", ACTIVE_MATTER))
            .and(query_param("pageSize", "100"))
            .and(header("authorization", "Bearer obo-oid-4"))
            .respond_with(json(
                200,
                r#"{"results":[{"id":7,"title":"Complaint","documentType":"Pleading","status":"Filed","caseNumber":"LC-2024-042","isPrivileged":false,"createdDate":"2024-02-03"}],"page":1,"pageSize":100,"totalCount":1,"hasMore":false}"#,
            )),
    );
    let service = api.service();
    let (broker, scopes) = (BrokerStub::default(), scopes());
    let ops = DocumentOperations::new(&firm.store, &broker, &service, &scopes);

    let caller = firm.caller(&subject_of(PARALEGAL));
    let page = ops
        .list_by_case(&caller.context().unwrap(), caller.credential(), ACTIVE_CASE, None, None)
        .unwrap()
        .ok()
        .unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].title, "Complaint");
    assert_eq!(api.request_count(), 1);
}

#[test]
fn http_client_maps_downstream_refusal() {
    let firm = Firm::seeded();
    let api = DocumentApi::start(
        Mock::given(path("/api/documents")).respond_with(json(403, r#"{"error":"forbidden"}"#)),
    );
    let service = api.service();
    let (broker, scopes) = (BrokerStub::default(), scopes());
    let ops = DocumentOperations::new(&firm.store, &broker, &service, &scopes);

    let caller = firm.caller(&subject_of(PARTNER));
    let outcome = ops
        .search(&caller.context().unwrap(), caller.credential(), &DocumentQuery::default())
        .unwrap();
    assert!(outcome.is_denied());
    assert_eq!(api.request_count(), 1);
}
