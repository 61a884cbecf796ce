mod account;
mod context;
mod mutation;
mod query;
mod types;

pub use account::{AccountMutation, AuthFailure, AuthPayload, AuthResult};
pub use context::AuthorizationHeader;
pub use mutation::RecordMutation;
pub use query::QueryRoot;
pub use types::{Position, Submission, Tag, Topic, Transition, User};

use async_graphql::{EmptySubscription, MergedObject, Schema};
use roteiro_core::auth::TokenAuthority;
use roteiro_core::Store;

#[derive(MergedObject, Default)]
pub struct MutationRoot(RecordMutation, AccountMutation);

pub type RoteiroSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(store: Store, tokens: TokenAuthority) -> RoteiroSchema {
    Schema::build(QueryRoot, MutationRoot::default(), EmptySubscription)
        .data(store)
        .data(tokens)
        .finish()
}

/// Schema definition language for the API, without any runtime data attached.
pub fn sdl() -> String {
    Schema::build(QueryRoot, MutationRoot::default(), EmptySubscription)
        .finish()
        .sdl()
}
