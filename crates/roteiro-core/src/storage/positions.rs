use super::rows::{encode_list, row_to_position, POSITION_COLUMNS};
use super::Store;
use crate::error::{RoteiroError, RoteiroResult};
use crate::model::PositionRecord;
use crate::shape::WriteData;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

impl Store {
    pub fn positions(&self, user_id: &str) -> RoteiroResult<Vec<PositionRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM positions WHERE user_id = ?1 ORDER BY created_at ASC, id ASC",
            POSITION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id], row_to_position)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn position(&self, id: &str, user_id: &str) -> RoteiroResult<Option<PositionRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM positions WHERE id = ?1 AND user_id = ?2",
            POSITION_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![id, user_id], row_to_position)
            .optional()?)
    }

    pub fn create_position(&self, data: &WriteData) -> RoteiroResult<PositionRecord> {
        let now = Utc::now();
        let record = PositionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: data.require_connect_id("user")?.to_string(),
            name: data.require_string("name")?,
            notes: data.list("notes").map(<[String]>::to_vec).unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO positions(id, user_id, name, notes_json, created_at, updated_at)
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
        tracing::debug!(id = %record.id, "position created");
        Ok(record)
    }

    pub fn update_position(&self, id: &str, data: &WriteData) -> RoteiroResult<PositionRecord> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM positions WHERE id = ?1", POSITION_COLUMNS);
        let mut record = conn
            .query_row(&sql, params![id], row_to_position)
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
            "UPDATE positions SET name = ?1, notes_json = ?2, updated_at = ?3 WHERE id = ?4",
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
