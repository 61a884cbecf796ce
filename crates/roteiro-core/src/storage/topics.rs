use super::rows::{encode_list, row_to_topic, TOPIC_COLUMNS};
use super::Store;
use crate::error::{RoteiroError, RoteiroResult};
use crate::model::TopicRecord;
use crate::shape::WriteData;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

impl Store {
    pub fn topics(&self, user_id: &str) -> RoteiroResult<Vec<TopicRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM topics WHERE user_id = ?1 ORDER BY created_at ASC, id ASC",
            TOPIC_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id], row_to_topic)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn topic(&self, id: &str, user_id: &str) -> RoteiroResult<Option<TopicRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM topics WHERE id = ?1 AND user_id = ?2",
            TOPIC_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![id, user_id], row_to_topic)
            .optional()?)
    }

    pub fn create_topic(&self, data: &WriteData) -> RoteiroResult<TopicRecord> {
        let now = Utc::now();
        let record = TopicRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: data.require_connect_id("user")?.to_string(),
            name: data.require_string("name")?,
            notes: data.list("notes").map(<[String]>::to_vec).unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO topics(id, user_id, name, notes_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.user_id,
                record.name,
                encode_list(&record.notes),
                record.created_at,
                record.updated_at
            ],
        )?;
        Ok(record)
    }

    pub fn update_topic(&self, id: &str, data: &WriteData) -> RoteiroResult<TopicRecord> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM topics WHERE id = ?1", TOPIC_COLUMNS);
        let mut record = conn
            .query_row(&sql, params![id], row_to_topic)
            .optional()?
            .ok_or(RoteiroError::Forbidden)?;

        if let Some(name) = data.string("name")? {
            record.name = name;
        }
        if let Some(notes) = data.list("notes") {
            record.notes = notes.to_vec();
        }
        record.updated_at = Utc::now();

        conn.execute(
            "UPDATE topics SET name = ?1, notes_json = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                record.name,
                encode_list(&record.notes),
                record.updated_at,
                record.id
            ],
        )?;
        Ok(record)
    }
}
