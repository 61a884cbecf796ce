//! Core of the Roteiro backend: credentials, ownership, write shaping and
//! the SQLite store the GraphQL resolvers delegate to.

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod model;
pub mod relation;
pub mod shape;
pub mod storage;

pub use error::{RoteiroError, RoteiroResult};
pub use storage::Store;
