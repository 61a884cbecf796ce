//! Minimal GraphQL-over-HTTP client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::error::{SeedError, SeedResult};

const USER_AGENT_VALUE: &str = concat!("roteiro-seed/", env!("CARGO_PKG_VERSION"));

const AUTHENTICATE: &str = r#"
mutation Authenticate($email: String!, $password: String!) {
  authenticateUser(email: $email, password: $password) {
    __typename
    ... on AuthPayload { token }
    ... on AuthFailure { message }
  }
}"#;

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorBody>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum AuthOutcome {
    AuthPayload { token: String },
    AuthFailure { message: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticateData {
    authenticate_user: AuthOutcome,
}

/// Sends queries to one endpoint, optionally with a bearer token.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: reqwest::Client,
    endpoint: url::Url,
    token: Option<String>,
}

impl GraphqlClient {
    pub fn new(endpoint: &str) -> SeedResult<Self> {
        let endpoint = url::Url::parse(endpoint).map_err(|e| {
            SeedError::config(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(default_headers)
            .build()
            .map_err(|e| SeedError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Signs in and keeps the returned token for later requests.
    pub async fn authenticate(&mut self, email: &str, password: &str) -> SeedResult<()> {
        let data: AuthenticateData = self
            .request(
                AUTHENTICATE,
                json!({ "email": email, "password": password }),
            )
            .await?;

        match data.authenticate_user {
            AuthOutcome::AuthPayload { token } => {
                debug!(email, "authenticated");
                self.token = Some(token);
                Ok(())
            }
            AuthOutcome::AuthFailure { message } => Err(SeedError::Auth { message }),
        }
    }

    /// Runs one operation and decodes its `data` member.
    pub async fn request<T: DeserializeOwned>(&self, query: &str, variables: Value) -> SeedResult<T> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SeedError::Network {
                message: format!("HTTP {} from {}", status, self.endpoint),
            });
        }

        let body: GraphqlResponse = response.json().await?;
        if !body.errors.is_empty() {
            return Err(SeedError::Graphql {
                messages: body.errors.into_iter().map(|e| e.message).collect(),
            });
        }

        let data = body.data.ok_or_else(|| SeedError::Decode {
            message: "response has neither data nor errors".to_string(),
        })?;
        Ok(serde_json::from_value(data)?)
    }
}
