//! Sign-up, sign-in and password change.
//!
//! Credential failures are ordinary results (`AuthFailure`) rather than
//! GraphQL errors so a client can show the message directly.

use super::context::{blocking, caller, field_error, store, tokens, with_store, OrFieldError};
use super::types::User;
use async_graphql::{Context, Object, Result, SimpleObject, Union};
use roteiro_core::auth::{compare_password, hash_password, is_email, TokenAuthority};
use roteiro_core::{RoteiroError, RoteiroResult, Store};

#[derive(SimpleObject)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Debug, SimpleObject)]
pub struct AuthFailure {
    pub message: String,
    pub code: String,
}

impl From<RoteiroError> for AuthFailure {
    fn from(err: RoteiroError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Union)]
pub enum AuthResult {
    Success(AuthPayload),
    Failure(AuthFailure),
}

fn into_result(outcome: RoteiroResult<AuthPayload>) -> Result<AuthResult> {
    match outcome {
        Ok(payload) => Ok(AuthResult::Success(payload)),
        Err(err) if err.is_credential_failure() => {
            tracing::info!(reason = %err, "credential check failed");
            Ok(AuthResult::Failure(err.into()))
        }
        Err(err) => Err(field_error(err)),
    }
}

async fn hash_blocking(password: String) -> RoteiroResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| RoteiroError::Hash {
            message: e.to_string(),
        })?
}

async fn compare_blocking(password: String, hash: String) -> RoteiroResult<bool> {
    tokio::task::spawn_blocking(move || compare_password(&password, &hash))
        .await
        .map_err(|e| RoteiroError::Hash {
            message: e.to_string(),
        })
}

async fn sign_up(
    store: &Store,
    tokens: &TokenAuthority,
    email: &str,
    password: String,
) -> RoteiroResult<AuthPayload> {
    if !is_email(email) {
        return Err(RoteiroError::InvalidEmail);
    }
    let lookup = email.to_string();
    if blocking(store, move |store| store.user_by_email(&lookup))
        .await?
        .is_some()
    {
        return Err(RoteiroError::EmailInUse);
    }

    let hash = hash_blocking(password).await?;
    let email = email.to_string();
    let user = blocking(store, move |store| store.create_user(&email, &hash)).await?;
    let token = tokens.issue(&user.id)?;
    tracing::info!(user_id = %user.id, "user signed up");
    Ok(AuthPayload {
        token,
        user: User(user),
    })
}

async fn authenticate(
    store: &Store,
    tokens: &TokenAuthority,
    email: &str,
    password: String,
) -> RoteiroResult<AuthPayload> {
    if !is_email(email) {
        return Err(RoteiroError::InvalidEmail);
    }
    let lookup = email.to_string();
    let user = blocking(store, move |store| store.user_by_email(&lookup))
        .await?
        .ok_or(RoteiroError::EmailNotInUse)?;

    if !compare_blocking(password, user.password.clone()).await? {
        return Err(RoteiroError::IncorrectPassword);
    }

    let token = tokens.issue(&user.id)?;
    tracing::debug!(user_id = %user.id, "user authenticated");
    Ok(AuthPayload {
        token,
        user: User(user),
    })
}

#[derive(Debug, Default)]
pub struct AccountMutation;

#[Object]
impl AccountMutation {
    async fn sign_up_user(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<AuthResult> {
        into_result(sign_up(store(ctx)?, tokens(ctx)?, &email, password).await)
    }

    async fn authenticate_user(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<AuthResult> {
        into_result(authenticate(store(ctx)?, tokens(ctx)?, &email, password).await)
    }

    /// Replaces the caller's password hash.
    async fn change_password(&self, ctx: &Context<'_>, password: String) -> Result<bool> {
        let user_id = caller(ctx)?;
        let hash = hash_blocking(password).await.or_field_error()?;
        let id = user_id.clone();
        with_store(ctx, move |store| store.set_password(&id, &hash)).await?;
        tracing::info!(user_id = %user_id, "password changed");
        Ok(true)
    }
}
