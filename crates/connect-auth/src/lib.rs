//! # connect-auth
//!
//! JWT credential handling. Token issuance belongs to the campus identity
//! provider; this crate verifies bearer credentials for the HTTP boundary
//! and WebSocket registration, and can mint tokens for tests and tooling.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
