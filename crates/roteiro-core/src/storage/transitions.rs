use super::rows::{encode_list, qualified, row_to_transition, TRANSITION_COLUMNS};
use super::tags::{apply_tag_links, TagLinks};
use super::Store;
use crate::error::{RoteiroError, RoteiroResult};
use crate::model::TransitionRecord;
use crate::shape::WriteData;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

/// Which end of a transition a position sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    fn column(self) -> &'static str {
        match self {
            Endpoint::Start => "start_position_id",
            Endpoint::End => "end_position_id",
        }
    }
}

impl Store {
    pub fn transitions(&self, user_id: &str) -> RoteiroResult<Vec<TransitionRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transitions WHERE user_id = ?1 ORDER BY created_at ASC, id ASC",
            TRANSITION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id], row_to_transition)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn transition(&self, id: &str, user_id: &str) -> RoteiroResult<Option<TransitionRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transitions WHERE id = ?1 AND user_id = ?2",
            TRANSITION_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![id, user_id], row_to_transition)
            .optional()?)
    }

    /// Transitions leaving (`Start`) or entering (`End`) a position.
    pub fn transitions_at(
        &self,
        position_id: &str,
        endpoint: Endpoint,
        user_id: &str,
    ) -> RoteiroResult<Vec<TransitionRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transitions
             WHERE {} = ?1 AND user_id = ?2
             ORDER BY created_at ASC, id ASC",
            TRANSITION_COLUMNS,
            endpoint.column()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![position_id, user_id], row_to_transition)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn transitions_for_tag(
        &self,
        tag_id: &str,
        user_id: &str,
    ) -> RoteiroResult<Vec<TransitionRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transitions t
             JOIN transition_tags l ON l.transition_id = t.id
             WHERE l.tag_id = ?1 AND t.user_id = ?2
             ORDER BY t.created_at ASC, t.id ASC",
            qualified("t", TRANSITION_COLUMNS)
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![tag_id, user_id], row_to_transition)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn create_transition(&self, data: &WriteData) -> RoteiroResult<TransitionRecord> {
        let now = Utc::now();
        let record = TransitionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: data.require_connect_id("user")?.to_string(),
            name: data.require_string("name")?,
            steps: data.list("steps").map(<[String]>::to_vec).unwrap_or_default(),
            notes: data.list("notes").map(<[String]>::to_vec).unwrap_or_default(),
            start_position_id: data.require_connect_id("startPosition")?.to_string(),
            end_position_id: data.require_connect_id("endPosition")?.to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO transitions(id, user_id, start_position_id, end_position_id, name, steps_json, notes_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.user_id,
                record.start_position_id,
                record.end_position_id,
                record.name,
                encode_list(&record.steps),
                encode_list(&record.notes),
                record.created_at,
                record.updated_at
            ],
        )?;
        apply_tag_links(&tx, TagLinks::Transition, &record.id, data)?;
        tx.commit()?;

        tracing::debug!(
            id = %record.id,
            start = %record.start_position_id,
            end = %record.end_position_id,
            "transition created"
        );
        Ok(record)
    }

    pub fn update_transition(
        &self,
        id: &str,
        data: &WriteData,
    ) -> RoteiroResult<TransitionRecord> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let sql = format!("SELECT {} FROM transitions WHERE id = ?1", TRANSITION_COLUMNS);
        let mut record = tx
            .query_row(&sql, params![id], row_to_transition)
            .optional()?
            .ok_or(RoteiroError::Forbidden)?;

        if let Some(name) = data.string("name")? {
            record.name = name;
        }
        if let Some(steps) = data.list("steps") {
            record.steps = steps.to_vec();
        }
        if let Some(notes) = data.list("notes") {
            record.notes = notes.to_vec();
        }
        if let Some(start) = data.connect_id("startPosition") {
            record.start_position_id = start.to_string();
        }
        if let Some(end) = data.connect_id("endPosition") {
            record.end_position_id = end.to_string();
        }
        record.updated_at = Utc::now();

        tx.execute(
            "UPDATE transitions
             SET name = ?1, steps_json = ?2, notes_json = ?3,
                 start_position_id = ?4, end_position_id = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                record.name,
                encode_list(&record.steps),
                encode_list(&record.notes),
                record.start_position_id,
                record.end_position_id,
                record.updated_at,
                record.id
            ],
        )?;
        apply_tag_links(&tx, TagLinks::Transition, &record.id, data)?;
        tx.commit()?;

        Ok(record)
    }
}
