use crate::schema::{AuthorizationHeader, RoteiroSchema};
use async_graphql::http::GraphiQLSource;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use tracing::Instrument;

/// `POST /` and `POST /api` take GraphQL requests; `GET /` serves GraphiQL.
pub fn router(schema: RoteiroSchema) -> Router {
    Router::new()
        .route("/", get(graphiql).post(graphql))
        .route("/api", post(graphql))
        .route("/health", get(health))
        .with_state(schema)
}

async fn graphql(
    State(schema): State<RoteiroSchema>,
    headers: HeaderMap,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let span = tracing::info_span!(
        "graphql",
        operation = request.operation_name.as_deref().unwrap_or("-")
    );
    let response = schema
        .execute(request.data(AuthorizationHeader(authorization)))
        .instrument(span)
        .await;

    if response.is_err() {
        tracing::debug!(errors = response.errors.len(), "graphql request returned errors");
    }
    Json(response)
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/").finish())
}

async fn health() -> &'static str {
    "ok"
}

/// Binds `addr` and serves until ctrl-c.
pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
