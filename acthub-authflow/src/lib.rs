//! Security core of the action bridge: inbound request authentication,
//! the encrypted continuation token that survives the third-party OAuth
//! redirect, and the token-endpoint exchange client.

pub mod authenticate;
pub mod exchange;
pub mod state_token;

// Convenient re-exports
pub use authenticate::Authenticator;
pub use exchange::{GrantRequest, OAuthClient, OAuthConfig, TokenGrant};
pub use state_token::{StatePayload, StateTokenCodec, StateTokenError};
