pub mod positions;
pub(crate) mod rows;
pub mod schema;
pub mod store;
pub mod submissions;
pub mod tags;
pub mod topics;
pub mod transitions;
pub mod users;

pub use store::Store;
pub use transitions::Endpoint;

#[cfg(test)]
mod tests;
