//! Token Service
//!
//! Issues and validates HS256 access tokens. Tokens are stateless: validity
//! is decided by signature and expiry alone.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, Result};

/// Token signing configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HS256 secret
    pub secret_key: String,
    pub access_token_expiry_secs: i64,
}

impl AuthConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            access_token_expiry_secs: 30 * 60,
        }
    }

    pub fn with_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_secs = minutes.saturating_mul(60);
        self
    }
}

/// Access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct AuthService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn access_token_expiry_secs(&self) -> i64 {
        self.config.access_token_expiry_secs
    }

    /// Issue a token for `user_id` valid from now.
    pub fn generate_access_token(&self, user_id: &str) -> Result<String> {
        self.generate_access_token_at(user_id, Utc::now())
    }

    /// Issue a token as if at `issued_at`.
    pub fn generate_access_token_at(&self, user_id: &str, issued_at: DateTime<Utc>) -> Result<String> {
        let expires_at = Duration::try_seconds(self.config.access_token_expiry_secs)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| PlatformError::internal("Token expiry out of range"))?;
        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| PlatformError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Check signature and expiry and return the claims.
    pub fn validate_token(&self, token: &str) -> Result<AccessTokenClaims> {
        let data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let message = match e.kind() {
                    ErrorKind::ExpiredSignature => "Token expired",
                    ErrorKind::InvalidSignature => "Invalid token signature",
                    ErrorKind::InvalidAlgorithm => "Unsupported token algorithm",
                    _ => "Malformed token",
                };
                PlatformError::invalid_token(message)
            })?;

        if data.claims.sub.is_empty() {
            return Err(PlatformError::invalid_token("Token has no subject"));
        }
        Ok(data.claims)
    }

    /// Validate and return the subject (user id).
    pub fn verify(&self, token: &str) -> Result<String> {
        Ok(self.validate_token(token)?.sub)
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
