//! Output object types.
//!
//! Each wraps a store record. Relation fields resolve lazily and are scoped
//! to the record's owner, so a nested read never crosses into another
//! user's rows.

use super::context::with_store;
use async_graphql::{Context, Object, Result, ID};
use chrono::{DateTime, Utc};
use roteiro_core::model::{
    PositionRecord, SubmissionRecord, TagRecord, TopicRecord, TransitionRecord, UserRecord,
};
use roteiro_core::storage::Endpoint;
use roteiro_core::RoteiroError;

pub struct User(pub UserRecord);
pub struct Position(pub PositionRecord);
pub struct Submission(pub SubmissionRecord);
pub struct Transition(pub TransitionRecord);
pub struct Tag(pub TagRecord);
pub struct Topic(pub TopicRecord);

async fn owner(ctx: &Context<'_>, user_id: &str) -> Result<User> {
    let user_id = user_id.to_string();
    with_store(ctx, move |store| {
        store
            .user_by_id(&user_id)?
            .map(User)
            .ok_or(RoteiroError::Forbidden)
    })
    .await
}

async fn owned_position(ctx: &Context<'_>, id: &str, user_id: &str) -> Result<Position> {
    let (id, user_id) = (id.to_string(), user_id.to_string());
    with_store(ctx, move |store| {
        store
            .position(&id, &user_id)?
            .map(Position)
            .ok_or(RoteiroError::Forbidden)
    })
    .await
}

#[Object]
impl User {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn positions(&self, ctx: &Context<'_>) -> Result<Vec<Position>> {
        let user_id = self.0.id.clone();
        let rows = with_store(ctx, move |store| store.positions(&user_id)).await?;
        Ok(rows.into_iter().map(Position).collect())
    }

    async fn submissions(&self, ctx: &Context<'_>) -> Result<Vec<Submission>> {
        let user_id = self.0.id.clone();
        let rows = with_store(ctx, move |store| store.submissions(&user_id)).await?;
        Ok(rows.into_iter().map(Submission).collect())
    }

    async fn transitions(&self, ctx: &Context<'_>) -> Result<Vec<Transition>> {
        let user_id = self.0.id.clone();
        let rows = with_store(ctx, move |store| store.transitions(&user_id)).await?;
        Ok(rows.into_iter().map(Transition).collect())
    }

    async fn tags(&self, ctx: &Context<'_>) -> Result<Vec<Tag>> {
        let user_id = self.0.id.clone();
        let rows = with_store(ctx, move |store| store.tags(&user_id)).await?;
        Ok(rows.into_iter().map(Tag).collect())
    }

    async fn topics(&self, ctx: &Context<'_>) -> Result<Vec<Topic>> {
        let user_id = self.0.id.clone();
        let rows = with_store(ctx, move |store| store.topics(&user_id)).await?;
        Ok(rows.into_iter().map(Topic).collect())
    }
}

#[Object]
impl Position {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn notes(&self) -> Vec<String> {
        self.0.notes.clone()
    }

    async fn submissions(&self, ctx: &Context<'_>) -> Result<Vec<Submission>> {
        let (id, user_id) = (self.0.id.clone(), self.0.user_id.clone());
        let rows = with_store(ctx, move |store| {
            store.submissions_for_position(&id, &user_id)
        })
        .await?;
        Ok(rows.into_iter().map(Submission).collect())
    }

    /// Transitions starting at this position.
    async fn transitions_from(&self, ctx: &Context<'_>) -> Result<Vec<Transition>> {
        let (id, user_id) = (self.0.id.clone(), self.0.user_id.clone());
        let rows = with_store(ctx, move |store| {
            store.transitions_at(&id, Endpoint::Start, &user_id)
        })
        .await?;
        Ok(rows.into_iter().map(Transition).collect())
    }

    /// Transitions ending at this position.
    async fn transitions_to(&self, ctx: &Context<'_>) -> Result<Vec<Transition>> {
        let (id, user_id) = (self.0.id.clone(), self.0.user_id.clone());
        let rows = with_store(ctx, move |store| {
            store.transitions_at(&id, Endpoint::End, &user_id)
        })
        .await?;
        Ok(rows.into_iter().map(Transition).collect())
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        owner(ctx, &self.0.user_id).await
    }
}

#[Object]
impl Submission {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn steps(&self) -> Vec<String> {
        self.0.steps.clone()
    }

    async fn notes(&self) -> Vec<String> {
        self.0.notes.clone()
    }

    async fn position(&self, ctx: &Context<'_>) -> Result<Position> {
        owned_position(ctx, &self.0.position_id, &self.0.user_id).await
    }

    async fn tags(&self, ctx: &Context<'_>) -> Result<Vec<Tag>> {
        let (id, user_id) = (self.0.id.clone(), self.0.user_id.clone());
        let rows = with_store(ctx, move |store| {
            store.tags_for_submission(&id, &user_id)
        })
        .await?;
        Ok(rows.into_iter().map(Tag).collect())
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        owner(ctx, &self.0.user_id).await
    }
}

#[Object]
impl Transition {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn steps(&self) -> Vec<String> {
        self.0.steps.clone()
    }

    async fn notes(&self) -> Vec<String> {
        self.0.notes.clone()
    }

    async fn start_position(&self, ctx: &Context<'_>) -> Result<Position> {
        owned_position(ctx, &self.0.start_position_id, &self.0.user_id).await
    }

    async fn end_position(&self, ctx: &Context<'_>) -> Result<Position> {
        owned_position(ctx, &self.0.end_position_id, &self.0.user_id).await
    }

    async fn tags(&self, ctx: &Context<'_>) -> Result<Vec<Tag>> {
        let (id, user_id) = (self.0.id.clone(), self.0.user_id.clone());
        let rows = with_store(ctx, move |store| {
            store.tags_for_transition(&id, &user_id)
        })
        .await?;
        Ok(rows.into_iter().map(Tag).collect())
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        owner(ctx, &self.0.user_id).await
    }
}

#[Object]
impl Tag {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn submissions(&self, ctx: &Context<'_>) -> Result<Vec<Submission>> {
        let (id, user_id) = (self.0.id.clone(), self.0.user_id.clone());
        let rows = with_store(ctx, move |store| {
            store.submissions_for_tag(&id, &user_id)
        })
        .await?;
        Ok(rows.into_iter().map(Submission).collect())
    }

    async fn transitions(&self, ctx: &Context<'_>) -> Result<Vec<Transition>> {
        let (id, user_id) = (self.0.id.clone(), self.0.user_id.clone());
        let rows = with_store(ctx, move |store| {
            store.transitions_for_tag(&id, &user_id)
        })
        .await?;
        Ok(rows.into_iter().map(Transition).collect())
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        owner(ctx, &self.0.user_id).await
    }
}

#[Object]
impl Topic {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn notes(&self) -> Vec<String> {
        self.0.notes.clone()
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        owner(ctx, &self.0.user_id).await
    }
}
