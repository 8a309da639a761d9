//! Identity resolution.
//!
//! Turns an inbound bearer credential into the firm identity every other
//! component consults. Nothing here is persisted; a resolution lives for
//! exactly one call.

mod context;
mod resolver;
mod token;

pub use context::{Caller, FirmIdentity, OperationContext, DEMO_DISPLAY_NAME, DEMO_PERSON_ID};
pub use resolver::IdentityResolver;
pub use token::TokenValidator;
