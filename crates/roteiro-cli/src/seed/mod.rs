//! Demo data for a running server.
//!
//! `clear` removes every record the token's user owns; `fill` creates a
//! fresh graph of positions, tags, submissions, transitions and topics.
//! Both talk to the server over GraphQL, never to the database.

pub mod client;
pub mod error;
pub mod fake;

pub use client::GraphqlClient;
pub use error::{SeedError, SeedResult};

use futures::future::try_join_all;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

pub const POSITIONS: usize = 10;
pub const TAGS: usize = 10;
pub const TOPICS: usize = 10;
pub const SUBMISSIONS_PER_POSITION: usize = 3;
pub const TRANSITIONS_PER_POSITION: usize = 3;
pub const TAGS_PER_RECORD: usize = 2;

const EXISTING: &str = "{ submissions { id } transitions { id } positions { id } tags { id } topics { id } }";

const CREATE_POSITION: &str = r#"
mutation CreatePosition($name: String!, $notes: [String!]) {
  createPosition(name: $name, notes: $notes) { id }
}"#;

const CREATE_TAG: &str = r#"
mutation CreateTag($name: String!) {
  createTag(name: $name) { id }
}"#;

const CREATE_SUBMISSION: &str = r#"
mutation CreateSubmission($name: String!, $position: ID!, $steps: [String!], $notes: [String!], $tags: [ID!]) {
  createSubmission(name: $name, position: $position, steps: $steps, notes: $notes, tags: $tags) { id }
}"#;

const CREATE_TRANSITION: &str = r#"
mutation CreateTransition($name: String!, $startPosition: ID!, $endPosition: ID!, $steps: [String!], $notes: [String!], $tags: [ID!]) {
  createTransition(name: $name, startPosition: $startPosition, endPosition: $endPosition, steps: $steps, notes: $notes, tags: $tags) { id }
}"#;

const CREATE_TOPIC: &str = r#"
mutation CreateTopic($name: String!, $notes: [String!]) {
  createTopic(name: $name, notes: $notes) { id }
}"#;

/// Record counts touched by a seed step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub positions: usize,
    pub submissions: usize,
    pub transitions: usize,
    pub tags: usize,
    pub topics: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.positions + self.submissions + self.transitions + self.tags + self.topics
    }
}

#[derive(Debug, Deserialize)]
struct Id {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Existing {
    submissions: Vec<Id>,
    transitions: Vec<Id>,
    positions: Vec<Id>,
    tags: Vec<Id>,
    topics: Vec<Id>,
}

/// Deletes everything the caller owns.
pub async fn clear(client: &GraphqlClient) -> SeedResult<SeedReport> {
    let existing: Existing = client.request(EXISTING, json!({})).await?;

    // Submissions and transitions go first; deleting a position would cascade to them.
    let (submissions, transitions) = futures::try_join!(
        delete_all(client, "deleteSubmission", &existing.submissions),
        delete_all(client, "deleteTransition", &existing.transitions),
    )?;
    let (positions, tags, topics) = futures::try_join!(
        delete_all(client, "deletePosition", &existing.positions),
        delete_all(client, "deleteTag", &existing.tags),
        delete_all(client, "deleteTopic", &existing.topics),
    )?;

    let report = SeedReport {
        positions,
        submissions,
        transitions,
        tags,
        topics,
    };
    info!(deleted = report.total(), "cleared existing records");
    Ok(report)
}

/// Creates a fresh set of linked demo records.
pub async fn fill<R: Rng + Send>(client: &GraphqlClient, rng: &mut R) -> SeedResult<SeedReport> {
    let position_vars: Vec<Value> = (0..POSITIONS)
        .map(|_| json!({ "name": fake::name(rng), "notes": fake::sentences(rng, 2) }))
        .collect();
    let tag_vars: Vec<Value> = (0..TAGS)
        .map(|_| json!({ "name": fake::word(rng) }))
        .collect();

    let (positions, tags) = futures::try_join!(
        create_all(client, CREATE_POSITION, "createPosition", position_vars),
        create_all(client, CREATE_TAG, "createTag", tag_vars),
    )?;

    let mut submission_vars = Vec::new();
    let mut transition_vars = Vec::new();
    for position in &positions {
        for _ in 0..SUBMISSIONS_PER_POSITION {
            submission_vars.push(json!({
                "name": fake::name(rng),
                "position": position,
                "steps": fake::sentences(rng, 3),
                "notes": fake::sentences(rng, 2),
                "tags": fake::pick(rng, &tags, TAGS_PER_RECORD),
            }));
        }
        for _ in 0..TRANSITIONS_PER_POSITION {
            let Some(end) = fake::other(rng, &positions, position) else {
                continue;
            };
            transition_vars.push(json!({
                "name": fake::name(rng),
                "startPosition": position,
                "endPosition": end,
                "steps": fake::sentences(rng, 3),
                "notes": fake::sentences(rng, 2),
                "tags": fake::pick(rng, &tags, TAGS_PER_RECORD),
            }));
        }
    }
    let topic_vars: Vec<Value> = (0..TOPICS)
        .map(|_| json!({ "name": fake::name(rng), "notes": fake::sentences(rng, 3) }))
        .collect();

    let (submissions, transitions, topics) = futures::try_join!(
        create_all(client, CREATE_SUBMISSION, "createSubmission", submission_vars),
        create_all(client, CREATE_TRANSITION, "createTransition", transition_vars),
        create_all(client, CREATE_TOPIC, "createTopic", topic_vars),
    )?;

    let report = SeedReport {
        positions: positions.len(),
        submissions: submissions.len(),
        transitions: transitions.len(),
        tags: tags.len(),
        topics: topics.len(),
    };
    info!(created = report.total(), "filled demo records");
    Ok(report)
}

async fn delete_all(client: &GraphqlClient, mutation: &str, records: &[Id]) -> SeedResult<usize> {
    let query = format!("mutation Delete($id: ID!) {{ {}(id: $id) }}", mutation);
    try_join_all(
        records
            .iter()
            .map(|record| client.request::<Value>(&query, json!({ "id": record.id }))),
    )
    .await?;
    Ok(records.len())
}

async fn create_all(
    client: &GraphqlClient,
    query: &str,
    field: &str,
    variables: Vec<Value>,
) -> SeedResult<Vec<String>> {
    let responses = try_join_all(
        variables
            .into_iter()
            .map(|vars| client.request::<Value>(query, vars)),
    )
    .await?;

    responses
        .iter()
        .map(|data| {
            data[field]["id"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| SeedError::Decode {
                    message: format!("{} returned no id", field),
                })
        })
        .collect()
}
