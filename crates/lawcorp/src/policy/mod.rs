//! Tool permission policy.
//!
//! One static table maps each firm role to the operations it may see and
//! call, plus the capability flags handlers consult for row- and field-level
//! rules. The protocol gate and the handlers read the same table.

pub mod operations;
pub mod permission;
pub mod profile;

pub use permission::{RolePermissionMatrix, ToolPermissionPolicy};
pub use profile::{profile_for, CaseScope, PrivilegedDocuments, RoleProfile};
