/// JWT issue/verify for Vidora services
///
/// Tokens are signed with HS256 against a shared secret. The key material is
/// owned by a [`JwtKeys`] value built once at startup and handed to the
/// service explicitly; there is no process-global key state.
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 24;

/// Signing algorithm for all Vidora tokens
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT claims carried by every Vidora access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type, currently always "access"
    pub token_type: String,
}

/// Errors from token generation or verification
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to generate token: {0}")]
    Generation(jsonwebtoken::errors::Error),

    /// Signature, structure, or expiry check failed. The message is safe to
    /// surface to callers.
    #[error("{0}")]
    Verification(jsonwebtoken::errors::Error),
}

// ============================================================================
// Keys
// ============================================================================

/// Encoding/decoding key pair derived from the shared secret
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    /// Derive both keys from the shared secret.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(JWT_ALGORITHM),
        }
    }

    /// Generate an access token for the given user.
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let expiry = now + Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS);

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            token_type: "access".to_string(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding)
            .map_err(AuthError::Generation)
    }

    /// Validate a token's signature and expiry, returning the decoded claims.
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation).map_err(AuthError::Verification)
    }
}
