//! Delegated credential exchange.
//!
//! Document operations never forward the caller's inbound credential. They
//! trade it for a token scoped to the document service, either through the
//! OAuth 2.0 on-behalf-of flow or, in demo mode, a fixed placeholder.

mod cache;
mod credential;
mod exchange;
mod obo;
mod placeholder;

pub use cache::TokenCache;
pub use credential::{bearer_token, DownstreamToken, InboundCredential};
pub use exchange::{normalize_scopes, CredentialExchange, ExchangeError};
pub(crate) use obo::format_reqwest_error;
pub use obo::{OnBehalfOfExchange, OBO_GRANT_TYPE};
pub use placeholder::{PlaceholderExchange, PLACEHOLDER_TOKEN};
