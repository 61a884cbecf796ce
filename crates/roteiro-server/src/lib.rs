//! GraphQL API over the roteiro store, served with axum.

pub mod http;
pub mod schema;

pub use http::{router, serve};
pub use schema::{build_schema, AuthorizationHeader, RoteiroSchema};
