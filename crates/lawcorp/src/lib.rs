//! LawCorp: authorization and delegated-credential core for the firm's
//! MCP server.
//!
//! Resolves inbound bearer credentials into firm identities, decides which
//! operations each role may see and call, enforces row- and field-level
//! rules inside case and document operations, drives the case lifecycle,
//! and exchanges caller credentials for downstream-scoped ones.

pub mod audit;
pub mod cases;
pub mod config;
pub mod delegation;
pub mod documents;
pub mod error;
pub mod identity;
pub mod model;
pub mod outcome;
pub mod policy;
pub mod storage;
pub mod time;


// Re-export primary types
pub use error::{FirmError, Result};
pub use identity::{Caller, FirmIdentity, IdentityResolver, OperationContext};
pub use model::{
    Assignment, AssignmentRole, AuditRecord, Case, CaseId, CaseStatus, EventType, FirmRole,
    Person, PersonId, TimelineEvent,
};
pub use outcome::Outcome;
pub use policy::{RoleProfile, RolePermissionMatrix, ToolPermissionPolicy};
pub use storage::{Changeset, FirmStore, JsonFileStore, MemoryStore};
pub use cases::{CaseService, SearchCases};

// Re-export credential exchange types
pub use delegation::{
    CredentialExchange, DownstreamToken, ExchangeError, InboundCredential, OnBehalfOfExchange,
    PlaceholderExchange, TokenCache,
};

// Re-export document service types
pub use documents::{
    DocumentDetail, DocumentOperations, DocumentPage, DocumentQuery, DocumentService,
    DocumentSummary, HttpDocumentService,
};
