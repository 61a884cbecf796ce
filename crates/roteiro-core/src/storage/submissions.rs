use super::rows::{encode_list, qualified, row_to_submission, SUBMISSION_COLUMNS};
use super::tags::{apply_tag_links, TagLinks};
use super::Store;
use crate::error::{RoteiroError, RoteiroResult};
use crate::model::SubmissionRecord;
use crate::shape::WriteData;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

impl Store {
    pub fn submissions(&self, user_id: &str) -> RoteiroResult<Vec<SubmissionRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM submissions WHERE user_id = ?1 ORDER BY created_at ASC, id ASC",
            SUBMISSION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id], row_to_submission)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn submission(&self, id: &str, user_id: &str) -> RoteiroResult<Option<SubmissionRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM submissions WHERE id = ?1 AND user_id = ?2",
            SUBMISSION_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![id, user_id], row_to_submission)
            .optional()?)
    }

    pub fn submissions_for_position(
        &self,
        position_id: &str,
        user_id: &str,
    ) -> RoteiroResult<Vec<SubmissionRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM submissions
             WHERE position_id = ?1 AND user_id = ?2
             ORDER BY created_at ASC, id ASC",
            SUBMISSION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![position_id, user_id], row_to_submission)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn submissions_for_tag(
        &self,
        tag_id: &str,
        user_id: &str,
    ) -> RoteiroResult<Vec<SubmissionRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM submissions s
             JOIN submission_tags l ON l.submission_id = s.id
             WHERE l.tag_id = ?1 AND s.user_id = ?2
             ORDER BY s.created_at ASC, s.id ASC",
            qualified("s", SUBMISSION_COLUMNS)
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![tag_id, user_id], row_to_submission)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Inserts the submission and its tag links in one transaction.
    pub fn create_submission(&self, data: &WriteData) -> RoteiroResult<SubmissionRecord> {
        let now = Utc::now();
        let record = SubmissionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: data.require_connect_id("user")?.to_string(),
            name: data.require_string("name")?,
            steps: data.list("steps").map(<[String]>::to_vec).unwrap_or_default(),
            notes: data.list("notes").map(<[String]>::to_vec).unwrap_or_default(),
            position_id: data.require_connect_id("position")?.to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO submissions(id, user_id, position_id, name, steps_json, notes_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.user_id,
                record.position_id,
                record.name,
                encode_list(&record.steps),
                encode_list(&record.notes),
                record.created_at,
                record.updated_at
            ],
        )?;
        apply_tag_links(&tx, TagLinks::Submission, &record.id, data)?;
        tx.commit()?;

        tracing::debug!(id = %record.id, position = %record.position_id, "submission created");
        Ok(record)
    }

    /// Updates scalar fields and applies the tag diff atomically.
    pub fn update_submission(
        &self,
        id: &str,
        data: &WriteData,
    ) -> RoteiroResult<SubmissionRecord> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let sql = format!("SELECT {} FROM submissions WHERE id = ?1", SUBMISSION_COLUMNS);
        let mut record = tx
            .query_row(&sql, params![id], row_to_submission)
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
        if let Some(position_id) = data.connect_id("position") {
            record.position_id = position_id.to_string();
        }
        record.updated_at = Utc::now();

        tx.execute(
            "UPDATE submissions
             SET name = ?1, steps_json = ?2, notes_json = ?3, position_id = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                record.name,
                encode_list(&record.steps),
                encode_list(&record.notes),
                record.position_id,
                record.updated_at,
                record.id
            ],
        )?;
        apply_tag_links(&tx, TagLinks::Submission, &record.id, data)?;
        tx.commit()?;

        Ok(record)
    }
}
