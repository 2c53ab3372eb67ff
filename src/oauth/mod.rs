//! Surface exposed to the external OAuth2 token-issuance engine.

pub mod engine;

pub use engine::{EngineStore, GrantType, RegisteredClient, SessionClaims};
