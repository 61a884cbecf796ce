use super::context::{caller, with_store};
use super::types::{Position, Submission, Tag, Topic, Transition, User};
use async_graphql::{Context, Object, Result, ID};

/// Read side. Lists are scoped to the caller; singular lookups match on id
/// and owner and resolve to `null` when nothing matches.
#[derive(Debug, Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The authenticated caller.
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let user_id = caller(ctx)?;
        let user = with_store(ctx, move |store| store.user_by_id(&user_id)).await?;
        Ok(user.map(User))
    }

    async fn positions(&self, ctx: &Context<'_>) -> Result<Vec<Position>> {
        let user_id = caller(ctx)?;
        let rows = with_store(ctx, move |store| store.positions(&user_id)).await?;
        Ok(rows.into_iter().map(Position).collect())
    }

    async fn position(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Position>> {
        let user_id = caller(ctx)?;
        let row = with_store(ctx, move |store| store.position(&id, &user_id)).await?;
        Ok(row.map(Position))
    }

    async fn transitions(&self, ctx: &Context<'_>) -> Result<Vec<Transition>> {
        let user_id = caller(ctx)?;
        let rows = with_store(ctx, move |store| store.transitions(&user_id)).await?;
        Ok(rows.into_iter().map(Transition).collect())
    }

    async fn transition(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Transition>> {
        let user_id = caller(ctx)?;
        let row = with_store(ctx, move |store| store.transition(&id, &user_id)).await?;
        Ok(row.map(Transition))
    }

    async fn submissions(&self, ctx: &Context<'_>) -> Result<Vec<Submission>> {
        let user_id = caller(ctx)?;
        let rows = with_store(ctx, move |store| store.submissions(&user_id)).await?;
        Ok(rows.into_iter().map(Submission).collect())
    }

    async fn submission(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Submission>> {
        let user_id = caller(ctx)?;
        let row = with_store(ctx, move |store| store.submission(&id, &user_id)).await?;
        Ok(row.map(Submission))
    }

    async fn tags(&self, ctx: &Context<'_>) -> Result<Vec<Tag>> {
        let user_id = caller(ctx)?;
        let rows = with_store(ctx, move |store| store.tags(&user_id)).await?;
        Ok(rows.into_iter().map(Tag).collect())
    }

    async fn tag(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Tag>> {
        let user_id = caller(ctx)?;
        let row = with_store(ctx, move |store| store.tag(&id, &user_id)).await?;
        Ok(row.map(Tag))
    }

    async fn topics(&self, ctx: &Context<'_>) -> Result<Vec<Topic>> {
        let user_id = caller(ctx)?;
        let rows = with_store(ctx, move |store| store.topics(&user_id)).await?;
        Ok(rows.into_iter().map(Topic).collect())
    }

    async fn topic(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Topic>> {
        let user_id = caller(ctx)?;
        let row = with_store(ctx, move |store| store.topic(&id, &user_id)).await?;
        Ok(row.map(Topic))
    }
}
