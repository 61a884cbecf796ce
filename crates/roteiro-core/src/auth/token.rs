use super::config::AuthConfig;
use crate::error::{RoteiroError, RoteiroResult};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub iat: u64,
    pub exp: u64,
}

/// Signs and verifies HS256 bearer tokens with the application secret.
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.clock_skew_leeway.as_secs();

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: config.token_ttl,
        }
    }

    pub fn issue(&self, user_id: &str) -> RoteiroResult<String> {
        let iat = unix_now();
        let claims = Claims {
            user_id: user_id.to_string(),
            iat,
            exp: iat + self.ttl.as_secs(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            RoteiroError::Token {
                message: e.to_string(),
            }
        })
    }

    /// Returns the user id carried by a valid token.
    pub fn verify(&self, token: &str) -> RoteiroResult<String> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(reason = "W_AUTH_TOKEN", error = %e, "bearer token rejected");
            RoteiroError::unauthorized(format!("JWT validation failed: {}", e))
        })?;

        if data.claims.user_id.is_empty() {
            return Err(RoteiroError::unauthorized("token has no userId claim"));
        }
        Ok(data.claims.user_id)
    }

    /// Resolves the caller from a raw `Authorization` header value.
    pub fn user_id_from_header(&self, header: Option<&str>) -> RoteiroResult<String> {
        let value = header.ok_or_else(|| RoteiroError::unauthorized("missing Authorization"))?;
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.is_empty() {
            return Err(RoteiroError::unauthorized("empty bearer token"));
        }
        self.verify(token)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
