//! Error types shared by every Roteiro crate.

/// Roteiro errors.
///
/// The display text of the user-facing variants is what a client sees, so
/// it is kept identical across releases.
#[derive(Debug, thiserror::Error)]
pub enum RoteiroError {
    /// Missing or invalid bearer token.
    #[error("Unauthorised!")]
    Unauthorized { reason: String },

    /// Record does not exist or belongs to another user.
    #[error("Oops!")]
    Forbidden,

    /// Email argument fails the address check.
    #[error("Not a valid email address!")]
    InvalidEmail,

    /// Sign-up with an email that already has an account.
    #[error("Email already in use!")]
    EmailInUse,

    /// Sign-in with an email that has no account.
    #[error("Email is not in use!")]
    EmailNotInUse,

    /// Password does not match the stored hash.
    #[error("Incorrect password!")]
    IncorrectPassword,

    /// Arguments that cannot be shaped into a write.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// SQLite, row decoding or store task failure.
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Token could not be signed.
    #[error("token error: {message}")]
    Token { message: String },

    /// Argon2 failure or a lost hashing task.
    #[error("password hashing failed: {message}")]
    Hash { message: String },

    /// Missing or malformed setting.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl RoteiroError {
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Machine-readable code attached to GraphQL errors.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",

            Self::InvalidEmail
            | Self::EmailInUse
            | Self::EmailNotInUse
            | Self::IncorrectPassword
            | Self::InvalidInput { .. } => "BAD_USER_INPUT",

            Self::Storage { .. } | Self::Token { .. } | Self::Hash { .. } | Self::Config { .. } => {
                "INTERNAL"
            }
        }
    }

    /// Failures whose details must stay server-side.
    pub fn is_internal(&self) -> bool {
        self.code() == "INTERNAL"
    }

    /// Outcomes of sign-up/sign-in that are reported as result values.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidEmail | Self::EmailInUse | Self::EmailNotInUse | Self::IncorrectPassword
        )
    }
}

impl From<rusqlite::Error> for RoteiroError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RoteiroError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage {
            message: format!("column decode: {}", err),
        }
    }
}

/// Result type for Roteiro operations.
pub type RoteiroResult<T> = Result<T, RoteiroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages_are_stable() {
        assert_eq!(RoteiroError::Forbidden.to_string(), "Oops!");
        assert_eq!(
            RoteiroError::InvalidEmail.to_string(),
            "Not a valid email address!"
        );
        assert_eq!(
            RoteiroError::IncorrectPassword.to_string(),
            "Incorrect password!"
        );
        assert_eq!(
            RoteiroError::unauthorized("expired").to_string(),
            "Unauthorised!"
        );
    }

    #[test]
    fn codes_split_internal_from_client_errors() {
        assert_eq!(RoteiroError::unauthorized("x").code(), "UNAUTHENTICATED");
        assert_eq!(RoteiroError::Forbidden.code(), "FORBIDDEN");
        assert!(!RoteiroError::EmailInUse.is_internal());
        assert!(RoteiroError::config("missing").is_internal());
        assert!(RoteiroError::EmailNotInUse.is_credential_failure());
        assert!(!RoteiroError::Forbidden.is_credential_failure());
    }

    #[test]
    fn every_variant_maps_to_one_code() {
        let cases = [
            (RoteiroError::unauthorized("x"), "UNAUTHENTICATED"),
            (RoteiroError::Forbidden, "FORBIDDEN"),
            (RoteiroError::InvalidEmail, "BAD_USER_INPUT"),
            (RoteiroError::EmailInUse, "BAD_USER_INPUT"),
            (RoteiroError::EmailNotInUse, "BAD_USER_INPUT"),
            (RoteiroError::IncorrectPassword, "BAD_USER_INPUT"),
            (RoteiroError::invalid_input("x"), "BAD_USER_INPUT"),
            (
                RoteiroError::Storage {
                    message: "x".into(),
                },
                "INTERNAL",
            ),
            (
                RoteiroError::Token {
                    message: "x".into(),
                },
                "INTERNAL",
            ),
            (
                RoteiroError::Hash {
                    message: "x".into(),
                },
                "INTERNAL",
            ),
            (RoteiroError::config("x"), "INTERNAL"),
        ];
        for (err, code) in cases {
            assert_eq!(err.code(), code, "{:?}", err);
        }
    }
}
