//! JSON-RPC dispatch for the LawCorp MCP server.
//!
//! Each request is resolved to a caller first. `tools/list` and `tools/call`
//! pass through the role filters, then tool handlers run against the store
//! or the document service with the caller's operation context.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use lawcorp::cases::lifecycle;
use lawcorp::config::{ServerConfig, DEFAULT_DOCUMENT_SCOPE};
use lawcorp::delegation::ExchangeError;
use lawcorp::model::CaseStatus;
use lawcorp::outcome::RefusalBody;
use lawcorp::policy::operations;
use lawcorp::{
    Caller, CaseService, CredentialExchange, DocumentOperations, DocumentService, FirmError,
    FirmStore, HttpDocumentService, IdentityResolver, JsonFileStore, MemoryStore,
    OnBehalfOfExchange, OperationContext, Outcome, PlaceholderExchange, RolePermissionMatrix,
    TokenCache, ToolPermissionPolicy,
};

use crate::{catalog, filters, tools_cases, tools_documents};

// ── Constants ─────────────────────────────────────────────────────────────────

/// MCP protocol version supported.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const RESOURCE_CASE_STATUSES: &str = "lawcorp://reference/case-statuses";
pub const RESOURCE_IDENTITY_ME: &str = "lawcorp://identity/me";

pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const UNAUTHENTICATED: i64 = -32001;
    pub const CONSENT_REQUIRED: i64 = -32002;
    pub const WRITE_CONFLICT: i64 = -32003;
    pub const BACKEND: i64 = -32004;
}

// ── JSON-RPC helpers ──────────────────────────────────────────────────────────

pub(crate) fn ok_result(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

fn tool_ok(id: Value, text: impl Into<String>) -> Value {
    ok_result(
        id,
        json!({
            "content": [{"type": "text", "text": text.into()}]
        }),
    )
}

fn tool_error(id: Value, text: impl Into<String>) -> Value {
    ok_result(
        id,
        json!({
            "content": [{"type": "text", "text": text.into()}],
            "isError": true
        }),
    )
}

pub(crate) fn rpc_error(id: Value, code: i64, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into()
        }
    })
}

/// Infrastructure fault as a JSON-RPC error with `{kind, retryable}` data.
fn fault_error(id: Value, err: &FirmError) -> Value {
    let code = match err {
        FirmError::Unauthenticated(_) | FirmError::InvalidToken(_) => codes::UNAUTHENTICATED,
        FirmError::Exchange(ExchangeError::ConsentRequired { .. }) => codes::CONSENT_REQUIRED,
        FirmError::WriteConflict { .. } => codes::WRITE_CONFLICT,
        _ => codes::BACKEND,
    };
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": err.to_string(),
            "data": {"kind": err.kind(), "retryable": err.is_retryable()}
        }
    })
}

fn pretty(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("serialization error: {e}"))
}

/// Serialize a handler's success payload; refusals pass through.
pub(crate) fn render<T: Serialize>(result: lawcorp::Result<Outcome<T>>) -> lawcorp::Result<Outcome<Value>> {
    result?.try_map(|value| {
        serde_json::to_value(value).map_err(|e| FirmError::SerializationError(e.to_string()))
    })
}

// ── MCP Server ────────────────────────────────────────────────────────────────

pub struct McpServer {
    store: Arc<dyn FirmStore>,
    resolver: IdentityResolver,
    policy: Box<dyn ToolPermissionPolicy>,
    exchange: Box<dyn CredentialExchange>,
    documents: Box<dyn DocumentService>,
    scopes: Vec<String>,
    /// Used when a request carries no `_meta.authorization`.
    default_authorization: Option<String>,
}

impl McpServer {
    pub fn new(
        store: Arc<dyn FirmStore>,
        resolver: IdentityResolver,
        documents: Box<dyn DocumentService>,
    ) -> Self {
        Self {
            store,
            resolver,
            policy: Box::new(RolePermissionMatrix),
            exchange: Box::new(PlaceholderExchange),
            documents,
            scopes: vec![DEFAULT_DOCUMENT_SCOPE.to_string()],
            default_authorization: None,
        }
    }

    pub fn with_exchange(mut self, exchange: Box<dyn CredentialExchange>) -> Self {
        self.exchange = exchange;
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn with_default_authorization(mut self, authorization: Option<String>) -> Self {
        self.default_authorization = authorization;
        self
    }

    /// Wire up store, identity provider, exchange and document client from
    /// configuration. Without an `exchange` section identified callers get
    /// the placeholder token.
    pub fn from_config(config: &ServerConfig) -> lawcorp::Result<Self> {
        let store: Arc<dyn FirmStore> = match &config.store.path {
            Some(path) => Arc::new(JsonFileStore::open_or_create(path.clone())?),
            None => Arc::new(MemoryStore::new()),
        };
        let resolver = IdentityResolver::from_config(config)?;
        let documents = Box::new(HttpDocumentService::new(&config.downstream)?);
        let exchange: Box<dyn CredentialExchange> = match &config.exchange {
            Some(exchange) => Box::new(TokenCache::new(OnBehalfOfExchange::new(exchange)?)),
            None => Box::new(PlaceholderExchange),
        };
        if resolver.is_demo() {
            tracing::warn!("no identity provider configured; running in demo mode");
        }
        Ok(Self::new(store, resolver, documents)
            .with_exchange(exchange)
            .with_scopes(config.downstream.scopes.clone()))
    }

    /// Route a JSON-RPC request to the appropriate handler. Returns
    /// `Value::Null` for notifications.
    pub fn handle_request(&self, request: Value) -> Value {
        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let method = match request.get("method").and_then(|m| m.as_str()) {
            Some(m) => m.to_string(),
            None => return rpc_error(id, codes::INVALID_REQUEST, "missing method"),
        };
        let params = request
            .get("params")
            .cloned()
            .unwrap_or(Value::Object(Default::default()));

        match method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => Value::Null,
            "tools/list" => self.handle_tools_list(id, &params),
            "tools/call" => self.handle_tools_call(id, &params),
            "resources/list" => self.handle_resources_list(id),
            "resources/read" => self.handle_resources_read(id, &params),
            "ping" => ok_result(id, json!({})),
            _ => rpc_error(id, codes::METHOD_NOT_FOUND, format!("method not found: {method}")),
        }
    }

    fn caller(&self, params: &Value) -> Caller {
        let authorization = params
            .get("_meta")
            .and_then(|m| m.get("authorization"))
            .and_then(|a| a.as_str())
            .or(self.default_authorization.as_deref());
        let data = self.store.snapshot();
        self.resolver.resolve(authorization, &data)
    }

    // ── initialize ────────────────────────────────────────────────────────────

    fn handle_initialize(&self, id: Value) -> Value {
        ok_result(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "resources": {}
                },
                "serverInfo": {
                    "name": "lawcorp-mcp",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    // ── tools/list ────────────────────────────────────────────────────────────

    fn handle_tools_list(&self, id: Value, params: &Value) -> Value {
        let caller = self.caller(params);
        let tools = filters::visible_tools(&*self.policy, caller.identity(), catalog::tools());
        ok_result(id, json!({ "tools": tools }))
    }

    // ── tools/call ────────────────────────────────────────────────────────────

    fn handle_tools_call(&self, id: Value, params: &Value) -> Value {
        let requested = match params.get("name").and_then(|n| n.as_str()) {
            Some(n) => n,
            None => return rpc_error(id, codes::INVALID_PARAMS, "missing tool name"),
        };
        let Some(tool) = catalog::canonical(requested) else {
            return rpc_error(id, codes::INVALID_PARAMS, format!("unknown tool: {requested}"));
        };
        let args = params.get("arguments").cloned().unwrap_or(json!({}));
        let _span = tracing::info_span!("tools/call", tool).entered();

        let caller = self.caller(params);
        if let Err(message) = filters::check_call(&*self.policy, caller.identity(), tool) {
            return refusal(id, &message, "access_denied");
        }
        let ctx = match caller.context() {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::info!(tool, "unauthenticated tool call: {e}");
                return fault_error(id, &e);
            }
        };

        tracing::debug!(tool, person = %ctx.person_id, "tool call");
        match self.dispatch(tool, &ctx, &caller, &args) {
            Ok(Outcome::Ok(payload)) => tool_ok(id, pretty(&payload)),
            Ok(refused) => {
                let message = refused.message().unwrap_or_default();
                refusal(id, message, refused.kind())
            }
            Err(e) => {
                tracing::warn!(tool, kind = e.kind(), "tool call failed: {e}");
                fault_error(id, &e)
            }
        }
    }

    fn dispatch(
        &self,
        tool: &str,
        ctx: &OperationContext,
        caller: &Caller,
        args: &Value,
    ) -> lawcorp::Result<Outcome<Value>> {
        let cases = CaseService::new(&*self.store);
        let docs = DocumentOperations::new(
            &*self.store,
            &*self.exchange,
            &*self.documents,
            &self.scopes,
        );
        let credential = caller.credential();
        match tool {
            operations::CASES_SEARCH => tools_cases::search(&cases, ctx, args),
            operations::CASES_GET => tools_cases::get(&cases, ctx, args),
            operations::CASES_GET_TIMELINE => tools_cases::timeline(&cases, ctx, args),
            operations::CASES_ADD_NOTE => tools_cases::add_note(&cases, ctx, args),
            operations::CASES_UPDATE_STATUS => tools_cases::update_status(&cases, ctx, args),
            operations::CASES_ASSIGN_USER => tools_cases::assign_user(&cases, ctx, args),
            operations::DOCUMENTS_SEARCH => tools_documents::search(&docs, ctx, credential, args),
            operations::DOCUMENTS_GET => tools_documents::get(&docs, ctx, credential, args),
            operations::DOCUMENTS_LIST_BY_CASE => {
                tools_documents::list_by_case(&docs, ctx, credential, args)
            }
            other => Ok(Outcome::invalid(format!("unknown tool: {other}"))),
        }
    }

    // ── resources ─────────────────────────────────────────────────────────────

    fn handle_resources_list(&self, id: Value) -> Value {
        ok_result(
            id,
            json!({
                "resources": [
                    {
                        "uri": RESOURCE_CASE_STATUSES,
                        "name": "Case Statuses",
                        "description": "Case statuses and the transitions allowed from each",
                        "mimeType": "application/json"
                    },
                    {
                        "uri": RESOURCE_IDENTITY_ME,
                        "name": "Current Identity",
                        "description": "Your firm identity and the tools you may call",
                        "mimeType": "application/json"
                    }
                ]
            }),
        )
    }

    fn handle_resources_read(&self, id: Value, params: &Value) -> Value {
        let uri = match params.get("uri").and_then(|v| v.as_str()) {
            Some(u) => u,
            None => return rpc_error(id, codes::INVALID_PARAMS, "missing resource uri"),
        };
        let body = match uri {
            RESOURCE_CASE_STATUSES => case_statuses(),
            RESOURCE_IDENTITY_ME => match self.identity_document(params) {
                Ok(body) => body,
                Err(e) => return fault_error(id, &e),
            },
            _ => return rpc_error(id, codes::INVALID_PARAMS, format!("unknown resource URI: {uri}")),
        };
        ok_result(
            id,
            json!({
                "contents": [{
                    "uri": uri,
                    "mimeType": "application/json",
                    "text": pretty(&body)
                }]
            }),
        )
    }

    fn identity_document(&self, params: &Value) -> lawcorp::Result<Value> {
        let caller = self.caller(params);
        let ctx = caller.context()?;
        let permitted = ctx.profile().sorted_operations();
        Ok(match caller.identity() {
            Some(identity) => json!({
                "mode": "authenticated",
                "identity": identity,
                "permittedOperations": self.policy.permitted_operations(identity),
            }),
            None => json!({
                "mode": "demo",
                "identity": ctx,
                "permittedOperations": permitted,
            }),
        })
    }
}

fn refusal(id: Value, message: &str, kind: &str) -> Value {
    tool_error(id, pretty(&RefusalBody { error: message, kind }))
}

fn case_statuses() -> Value {
    let statuses: Vec<Value> = CaseStatus::ALL
        .iter()
        .map(|&status| {
            json!({
                "status": status.as_str(),
                "terminal": lifecycle::is_terminal(status),
                "transitions": lifecycle::legal_targets(status)
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({ "statuses": statuses })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
