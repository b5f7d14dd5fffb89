//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// JWT verification settings.
///
/// Token *issuance* belongs to the identity provider; this service only
/// needs the shared secret to verify bearer credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for JWT verification.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (used when minting tokens locally,
    /// e.g. in tests and tooling).
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_seconds: i64,
}

fn default_access_ttl() -> i64 {
    900
}
