//! Error types for the seed client.

/// Seed errors.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Endpoint or credentials missing or malformed.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Transport failure or non-success HTTP status.
    #[error("network error: {message}")]
    Network { message: String },

    /// The server answered with GraphQL errors.
    #[error("graphql error: {}", messages.join("; "))]
    Graphql { messages: Vec<String> },

    /// `authenticateUser` returned a failure result.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Response body did not have the expected shape.
    #[error("unexpected response: {message}")]
    Decode { message: String },
}

/// Result type for seed operations.
pub type SeedResult<T> = std::result::Result<T, SeedError>;

impl SeedError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for SeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SeedError::Decode {
                message: err.to_string(),
            }
        } else {
            SeedError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(err: serde_json::Error) -> Self {
        SeedError::Decode {
            message: err.to_string(),
        }
    }
}
