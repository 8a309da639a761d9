use crate::identity::FirmIdentity;

use super::profile::profile_for;

/// Which operations an identity may see and call.
///
/// Covers visibility and invocation eligibility only. Row and field rules
/// live with the handlers.
pub trait ToolPermissionPolicy: Send + Sync {
    /// Case-insensitive. Unknown operation names are never allowed.
    fn is_allowed(&self, operation: &str, identity: &FirmIdentity) -> bool;

    /// The identity's operations in lexicographic order.
    fn permitted_operations(&self, identity: &FirmIdentity) -> Vec<&'static str>;
}

/// The fixed role table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePermissionMatrix;

impl ToolPermissionPolicy for RolePermissionMatrix {
    fn is_allowed(&self, operation: &str, identity: &FirmIdentity) -> bool {
        profile_for(identity.role).allows(operation)
    }

    fn permitted_operations(&self, identity: &FirmIdentity) -> Vec<&'static str> {
        profile_for(identity.role).sorted_operations()
    }
}
