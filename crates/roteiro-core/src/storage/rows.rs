//! Row mapping for every table.

use crate::model::{
    PositionRecord, SubmissionRecord, TagRecord, TopicRecord, TransitionRecord, UserRecord,
};
use rusqlite::types::Type;
use rusqlite::Row;

pub(crate) const USER_COLUMNS: &str = "id, email, password, created_at, updated_at";
pub(crate) const POSITION_COLUMNS: &str = "id, user_id, name, notes_json, created_at, updated_at";
pub(crate) const SUBMISSION_COLUMNS: &str =
    "id, user_id, name, steps_json, notes_json, position_id, created_at, updated_at";
pub(crate) const TRANSITION_COLUMNS: &str = "id, user_id, name, steps_json, notes_json, \
     start_position_id, end_position_id, created_at, updated_at";
pub(crate) const TAG_COLUMNS: &str = "id, user_id, name, created_at, updated_at";
pub(crate) const TOPIC_COLUMNS: &str = "id, user_id, name, notes_json, created_at, updated_at";

/// Columns qualified with a table alias, for joins.
pub(crate) fn qualified(alias: &str, columns: &str) -> String {
    columns
        .split(',')
        .map(|c| format!("{}.{}", alias, c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn string_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn row_to_user(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

pub(crate) fn row_to_position(row: &Row<'_>) -> rusqlite::Result<PositionRecord> {
    Ok(PositionRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        notes: string_list(row, 3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub(crate) fn row_to_submission(row: &Row<'_>) -> rusqlite::Result<SubmissionRecord> {
    Ok(SubmissionRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        steps: string_list(row, 3)?,
        notes: string_list(row, 4)?,
        position_id: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub(crate) fn row_to_transition(row: &Row<'_>) -> rusqlite::Result<TransitionRecord> {
    Ok(TransitionRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        steps: string_list(row, 3)?,
        notes: string_list(row, 4)?,
        start_position_id: row.get(5)?,
        end_position_id: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub(crate) fn row_to_tag(row: &Row<'_>) -> rusqlite::Result<TagRecord> {
    Ok(TagRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

pub(crate) fn row_to_topic(row: &Row<'_>) -> rusqlite::Result<TopicRecord> {
    Ok(TopicRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        notes: string_list(row, 3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
