//! Protocol-level gates in front of the tool handlers.
//!
//! Both filters act only when the caller resolved to a firm identity. With
//! no identity (demo mode, or a credential that failed to resolve) they pass
//! through; unauthenticated calls are then refused by the handlers.

use lawcorp::{FirmIdentity, ToolPermissionPolicy};
use serde_json::Value;

/// Drop catalog entries the identity may not call.
pub(crate) fn visible_tools(
    policy: &dyn ToolPermissionPolicy,
    identity: Option<&FirmIdentity>,
    mut tools: Vec<Value>,
) -> Vec<Value> {
    let Some(identity) = identity else {
        return tools;
    };
    let permitted = policy.permitted_operations(identity);
    tools.retain(|tool| {
        tool["name"]
            .as_str()
            .is_some_and(|name| permitted.iter().any(|op| *op == name))
    });
    tools
}

/// `Err` carries the denial message for a tool the identity may not call.
pub(crate) fn check_call(
    policy: &dyn ToolPermissionPolicy,
    identity: Option<&FirmIdentity>,
    tool: &str,
) -> Result<(), String> {
    match identity {
        Some(identity) if !policy.is_allowed(tool, identity) => {
            tracing::info!(
                person = %identity.person_id,
                role = %identity.role,
                tool,
                "tool call blocked by role policy"
            );
            Err(format!(
                "Access denied: the '{}' role is not permitted to call '{tool}'.",
                identity.role
            ))
        }
        _ => Ok(()),
    }
}
