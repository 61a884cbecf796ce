use crate::error::{RoteiroError, RoteiroResult};
use std::env;
use std::fmt;
use std::time::Duration;

/// Tokens stay valid for 30 days unless configured otherwise.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify bearer tokens.
    pub secret: String,
    pub token_ttl: Duration,
    pub clock_skew_leeway: Duration,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("clock_skew_leeway", &self.clock_skew_leeway)
            .finish()
    }
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>) -> RoteiroResult<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(RoteiroError::config("missing app secret"));
        }
        Ok(Self {
            secret,
            token_ttl: DEFAULT_TOKEN_TTL,
            clock_skew_leeway: Duration::from_secs(30),
        })
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Reads `APP_SECRET` (required) and `ROTEIRO_TOKEN_TTL_SECS`.
    pub fn from_env() -> RoteiroResult<Self> {
        let secret = env::var("APP_SECRET").unwrap_or_default();
        let mut cfg = Self::new(secret)?;

        if let Ok(v) = env::var("ROTEIRO_TOKEN_TTL_SECS") {
            match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.token_ttl = Duration::from_secs(secs),
                _ => {
                    return Err(RoteiroError::config(format!(
                        "ROTEIRO_TOKEN_TTL_SECS must be a positive integer, got '{}'",
                        v
                    )))
                }
            }
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn empty_secret_is_rejected() {
        let err = AuthConfig::new("  ").unwrap_err();
        assert!(matches!(err, RoteiroError::Config { .. }));
    }

    #[test]
    fn debug_output_hides_secret() {
        let cfg = AuthConfig::new("hunter2").unwrap();
        let dbg = format!("{:?}", cfg);
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn from_env_requires_app_secret() {
        env::remove_var("APP_SECRET");
        env::remove_var("ROTEIRO_TOKEN_TTL_SECS");
        assert!(AuthConfig::from_env().is_err());

        env::set_var("APP_SECRET", "s3cret");
        env::set_var("ROTEIRO_TOKEN_TTL_SECS", "60");
        let cfg = AuthConfig::from_env().unwrap();
        assert_eq!(cfg.secret, "s3cret");
        assert_eq!(cfg.token_ttl, Duration::from_secs(60));

        env::set_var("ROTEIRO_TOKEN_TTL_SECS", "soon");
        assert!(AuthConfig::from_env().is_err());

        env::remove_var("APP_SECRET");
        env::remove_var("ROTEIRO_TOKEN_TTL_SECS");
    }
}
