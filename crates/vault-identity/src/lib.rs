//! Request identity for the vault API.
//!
//! Every inbound request is resolved by exactly one channel: a browser
//! session cookie checked against the auth provider, or a bearer JWT
//! verified against the provider's published key set. Anything else is
//! answered with a uniform 401 before a handler runs.

pub mod bearer;
pub mod config;
pub mod error;
pub mod jwks;
pub mod middleware;
pub mod resolver;
pub mod session;

pub use bearer::{BearerStrategy, Claims};
pub use config::IdentityConfig;
pub use error::{IdentityError, Rejection};
pub use jwks::KeySet;
pub use middleware::require_identity;
pub use resolver::{Identity, IdentityResolver, IdentitySource, IdentityStrategy};
pub use session::SessionStrategy;
