//! Case operations.
//!
//! Search, read, timeline, notes, status changes and assignments. Every
//! operation takes the caller's [`OperationContext`](crate::OperationContext)
//! explicitly and applies the row and field rules inline.

pub mod access;
pub mod lifecycle;
mod service;
mod types;

pub use service::{CaseService, SearchCases};
pub use types::*;
