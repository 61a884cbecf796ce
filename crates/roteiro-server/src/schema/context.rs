//! Request context helpers shared by every resolver.

use async_graphql::{Context, Error, ErrorExtensions};
use roteiro_core::auth::TokenAuthority;
use roteiro_core::{RoteiroError, RoteiroResult, Store};

/// Raw `Authorization` header of the current HTTP request.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationHeader(pub Option<String>);

pub(crate) fn store<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Store> {
    ctx.data::<Store>()
}

/// Runs `f` against a clone of `store` on the blocking pool.
///
/// rusqlite calls block and the connection sits behind a std mutex; neither
/// may run on an async worker.
pub(crate) async fn blocking<T, F>(store: &Store, f: F) -> RoteiroResult<T>
where
    F: FnOnce(&Store) -> RoteiroResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| RoteiroError::Storage {
            message: format!("store task failed: {}", e),
        })?
}

/// [`blocking`] with the request's store, mapped to a field error.
pub(crate) async fn with_store<T, F>(ctx: &Context<'_>, f: F) -> async_graphql::Result<T>
where
    F: FnOnce(&Store) -> RoteiroResult<T> + Send + 'static,
    T: Send + 'static,
{
    blocking(store(ctx)?, f).await.or_field_error()
}

pub(crate) fn tokens<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a TokenAuthority> {
    ctx.data::<TokenAuthority>()
}

/// Id of the authenticated caller; runs before any resolver logic.
pub(crate) fn caller(ctx: &Context<'_>) -> async_graphql::Result<String> {
    let header = ctx
        .data_opt::<AuthorizationHeader>()
        .and_then(|h| h.0.as_deref());
    tokens(ctx)?.user_id_from_header(header).or_field_error()
}

/// GraphQL field error carrying a `code` extension.
///
/// Internal failures are logged here and reach the client as a generic message.
pub(crate) fn field_error(err: RoteiroError) -> Error {
    let code = err.code();
    if err.is_internal() {
        tracing::error!(error = %err, "resolver failed");
        return Error::new("Internal server error").extend_with(|_, e| e.set("code", code));
    }
    if let RoteiroError::Unauthorized { reason } = &err {
        tracing::debug!(reason = %reason, "unauthenticated request");
    }
    Error::new(err.to_string()).extend_with(|_, e| e.set("code", code))
}

pub(crate) trait OrFieldError<T> {
    fn or_field_error(self) -> async_graphql::Result<T>;
}

impl<T> OrFieldError<T> for RoteiroResult<T> {
    fn or_field_error(self) -> async_graphql::Result<T> {
        self.map_err(field_error)
    }
}
