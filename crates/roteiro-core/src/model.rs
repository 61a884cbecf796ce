use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User-owned record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Position,
    Submission,
    Transition,
    Tag,
    Topic,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Position,
        EntityKind::Submission,
        EntityKind::Transition,
        EntityKind::Tag,
        EntityKind::Topic,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Position => "positions",
            EntityKind::Submission => "submissions",
            EntityKind::Transition => "transitions",
            EntityKind::Tag => "tags",
            EntityKind::Topic => "topics",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Position => "Position",
            EntityKind::Submission => "Submission",
            EntityKind::Transition => "Transition",
            EntityKind::Tag => "Tag",
            EntityKind::Topic => "Topic",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    /// PHC hash; never leaves the server.
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub notes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub steps: Vec<String>,
    pub notes: Vec<String>,
    pub position_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub steps: Vec<String>,
    pub notes: Vec<String>,
    pub start_position_id: String,
    pub end_position_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub notes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
