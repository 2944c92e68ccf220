//! Shared credential primitives for Vidora services.
//!
//! Exposes HS256 bearer-token issue/verify against a shared secret. Services
//! build a [`JwtKeys`] once at startup from configuration and pass it to
//! whatever needs to mint or check tokens.

pub mod jwt;

pub use jwt::{AuthError, Claims, JwtKeys};
