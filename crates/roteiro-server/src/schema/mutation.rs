//! Record mutations.
//!
//! Every resolver runs the same pipeline: authenticate the caller, check
//! ownership of the addressed row (update/delete), shape the flat
//! arguments into write directives, check that every connected record is
//! also the caller's, then hand the write to the store. Everything after
//! authentication runs on the blocking pool.

use super::context::{caller, with_store};
use super::types::{Position, Submission, Tag, Topic, Transition};
use async_graphql::{Context, Object, Result, ID};
use roteiro_core::model::EntityKind;
use roteiro_core::shape::{self, WriteData};
use roteiro_core::{guard, RoteiroResult, Store};
use serde_json::{json, Value};

#[derive(Debug, Default)]
pub struct RecordMutation;

fn ids(list: Option<Vec<ID>>) -> Option<Vec<String>> {
    list.map(|ids| ids.into_iter().map(|id| id.0).collect())
}

fn create_data(store: &Store, user_id: &str, args: Value) -> RoteiroResult<WriteData> {
    let data = shape::clean(args)?.owned_by(user_id);
    guard::assert_refs_owned(store, &data, user_id)?;
    Ok(data)
}

/// Shapes an update. A `tags` list becomes a `{ set }` directive; the store
/// diffs it against the current links inside the write transaction.
fn update_data(
    store: &Store,
    kind: EntityKind,
    id: &str,
    user_id: &str,
    args: Value,
    tags: Option<Vec<ID>>,
) -> RoteiroResult<WriteData> {
    guard::assert_owner(store, kind, id, user_id)?;
    let mut data = shape::clean(args)?;
    if let Some(desired) = ids(tags) {
        data = data.with_tag_set(desired);
    }
    guard::assert_refs_owned(store, &data, user_id)?;
    Ok(data)
}

async fn delete_one(ctx: &Context<'_>, kind: EntityKind, id: ID) -> Result<ID> {
    let user_id = caller(ctx)?;
    let deleted = with_store(ctx, move |store| {
        guard::assert_owner(store, kind, &id, &user_id)?;
        let deleted = store.delete(kind, &id)?;
        tracing::info!(kind = %kind, id = %deleted, user_id = %user_id, "record deleted");
        Ok(deleted)
    })
    .await?;
    Ok(ID(deleted))
}

#[Object]
impl RecordMutation {
    async fn create_position(
        &self,
        ctx: &Context<'_>,
        name: String,
        notes: Option<Vec<String>>,
    ) -> Result<Position> {
        let user_id = caller(ctx)?;
        let args = json!({ "name": name, "notes": notes });
        let record = with_store(ctx, move |store| {
            store.create_position(&create_data(store, &user_id, args)?)
        })
        .await?;
        Ok(Position(record))
    }

    async fn update_position(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        notes: Option<Vec<String>>,
    ) -> Result<Position> {
        let user_id = caller(ctx)?;
        let args = json!({ "id": id.as_str(), "name": name, "notes": notes });
        let record = with_store(ctx, move |store| {
            let data = update_data(store, EntityKind::Position, &id, &user_id, args, None)?;
            store.update_position(&id, &data)
        })
        .await?;
        Ok(Position(record))
    }

    async fn delete_position(&self, ctx: &Context<'_>, id: ID) -> Result<ID> {
        delete_one(ctx, EntityKind::Position, id).await
    }

    async fn create_submission(
        &self,
        ctx: &Context<'_>,
        name: String,
        position: ID,
        steps: Option<Vec<String>>,
        notes: Option<Vec<String>>,
        tags: Option<Vec<ID>>,
    ) -> Result<Submission> {
        let user_id = caller(ctx)?;
        let args = json!({
            "name": name,
            "position": position.as_str(),
            "steps": steps,
            "notes": notes,
            "tags": ids(tags),
        });
        let record = with_store(ctx, move |store| {
            store.create_submission(&create_data(store, &user_id, args)?)
        })
        .await?;
        Ok(Submission(record))
    }

    async fn update_submission(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        position: Option<ID>,
        steps: Option<Vec<String>>,
        notes: Option<Vec<String>>,
        tags: Option<Vec<ID>>,
    ) -> Result<Submission> {
        let user_id = caller(ctx)?;
        let args = json!({
            "id": id.as_str(),
            "name": name,
            "position": position.map(|id| id.0),
            "steps": steps,
            "notes": notes,
        });
        let record = with_store(ctx, move |store| {
            let data = update_data(store, EntityKind::Submission, &id, &user_id, args, tags)?;
            store.update_submission(&id, &data)
        })
        .await?;
        Ok(Submission(record))
    }

    async fn delete_submission(&self, ctx: &Context<'_>, id: ID) -> Result<ID> {
        delete_one(ctx, EntityKind::Submission, id).await
    }

    async fn create_transition(
        &self,
        ctx: &Context<'_>,
        name: String,
        start_position: ID,
        end_position: ID,
        steps: Option<Vec<String>>,
        notes: Option<Vec<String>>,
        tags: Option<Vec<ID>>,
    ) -> Result<Transition> {
        let user_id = caller(ctx)?;
        let args = json!({
            "name": name,
            "startPosition": start_position.as_str(),
            "endPosition": end_position.as_str(),
            "steps": steps,
            "notes": notes,
            "tags": ids(tags),
        });
        let record = with_store(ctx, move |store| {
            store.create_transition(&create_data(store, &user_id, args)?)
        })
        .await?;
        Ok(Transition(record))
    }

    async fn update_transition(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        start_position: Option<ID>,
        end_position: Option<ID>,
        steps: Option<Vec<String>>,
        notes: Option<Vec<String>>,
        tags: Option<Vec<ID>>,
    ) -> Result<Transition> {
        let user_id = caller(ctx)?;
        let args = json!({
            "id": id.as_str(),
            "name": name,
            "startPosition": start_position.map(|id| id.0),
            "endPosition": end_position.map(|id| id.0),
            "steps": steps,
            "notes": notes,
        });
        let record = with_store(ctx, move |store| {
            let data = update_data(store, EntityKind::Transition, &id, &user_id, args, tags)?;
            store.update_transition(&id, &data)
        })
        .await?;
        Ok(Transition(record))
    }

    async fn delete_transition(&self, ctx: &Context<'_>, id: ID) -> Result<ID> {
        delete_one(ctx, EntityKind::Transition, id).await
    }

    async fn create_tag(&self, ctx: &Context<'_>, name: String) -> Result<Tag> {
        let user_id = caller(ctx)?;
        let args = json!({ "name": name });
        let record = with_store(ctx, move |store| {
            store.create_tag(&create_data(store, &user_id, args)?)
        })
        .await?;
        Ok(Tag(record))
    }

    async fn update_tag(&self, ctx: &Context<'_>, id: ID, name: Option<String>) -> Result<Tag> {
        let user_id = caller(ctx)?;
        let args = json!({ "id": id.as_str(), "name": name });
        let record = with_store(ctx, move |store| {
            let data = update_data(store, EntityKind::Tag, &id, &user_id, args, None)?;
            store.update_tag(&id, &data)
        })
        .await?;
        Ok(Tag(record))
    }

    async fn delete_tag(&self, ctx: &Context<'_>, id: ID) -> Result<ID> {
        delete_one(ctx, EntityKind::Tag, id).await
    }

    async fn create_topic(
        &self,
        ctx: &Context<'_>,
        name: String,
        notes: Option<Vec<String>>,
    ) -> Result<Topic> {
        let user_id = caller(ctx)?;
        let args = json!({ "name": name, "notes": notes });
        let record = with_store(ctx, move |store| {
            store.create_topic(&create_data(store, &user_id, args)?)
        })
        .await?;
        Ok(Topic(record))
    }

    async fn update_topic(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        notes: Option<Vec<String>>,
    ) -> Result<Topic> {
        let user_id = caller(ctx)?;
        let args = json!({ "id": id.as_str(), "name": name, "notes": notes });
        let record = with_store(ctx, move |store| {
            let data = update_data(store, EntityKind::Topic, &id, &user_id, args, None)?;
            store.update_topic(&id, &data)
        })
        .await?;
        Ok(Topic(record))
    }

    async fn delete_topic(&self, ctx: &Context<'_>, id: ID) -> Result<ID> {
        delete_one(ctx, EntityKind::Topic, id).await
    }
}
