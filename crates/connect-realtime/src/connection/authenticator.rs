//! Channel registration authentication.
//!
//! A connecting principal must present a verifiable bearer credential
//! before a channel is registered; anything else refuses the connection.

use std::sync::Arc;

use uuid::Uuid;

use connect_auth::jwt::JwtDecoder;
use connect_core::error::AppError;
use connect_entity::user::UserRole;

/// Identity extracted from a verified credential at registration time.
#[derive(Debug, Clone)]
pub struct AuthenticatedChannel {
    /// Principal ID.
    pub principal_id: Uuid,
    /// Principal role.
    pub role: UserRole,
    /// Username.
    pub username: String,
}

/// Authenticates WebSocket registrations using JWT tokens.
#[derive(Clone)]
pub struct WsAuthenticator {
    /// JWT decoder.
    decoder: Arc<JwtDecoder>,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator").finish()
    }
}

impl WsAuthenticator {
    /// Creates a new authenticator.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Verifies a token (typically from the upgrade query parameter).
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedChannel, AppError> {
        let claims = self.decoder.decode_access_token(token)?;

        Ok(AuthenticatedChannel {
            principal_id: claims.principal_id(),
            role: claims.role,
            username: claims.username,
        })
    }
}
