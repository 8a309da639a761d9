//! Document lookups against the firm's document management service.

mod access;
mod client;
mod types;

pub use access::DocumentOperations;
pub use client::{DocumentService, HttpDocumentService, DOCUMENT_DENIED, LIST_DENIED};
pub use types::{DocumentDetail, DocumentPage, DocumentQuery, DocumentSummary, REDACTED_CONTENT};
