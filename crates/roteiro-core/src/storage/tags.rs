use super::rows::{qualified, row_to_tag, TAG_COLUMNS};
use super::Store;
use crate::error::{RoteiroError, RoteiroResult};
use crate::model::TagRecord;
use crate::relation::{self, RelationDiff};
use crate::shape::WriteData;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

const TAGS_FIELD: &str = "tags";

/// Link table holding the tags of one record kind.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TagLinks {
    Submission,
    Transition,
}

impl TagLinks {
    fn table(self) -> &'static str {
        match self {
            TagLinks::Submission => "submission_tags",
            TagLinks::Transition => "transition_tags",
        }
    }

    fn owner_column(self) -> &'static str {
        match self {
            TagLinks::Submission => "submission_id",
            TagLinks::Transition => "transition_id",
        }
    }
}

impl Store {
    pub fn tags(&self, user_id: &str) -> RoteiroResult<Vec<TagRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM tags WHERE user_id = ?1 ORDER BY created_at ASC, id ASC",
            TAG_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id], row_to_tag)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn tag(&self, id: &str, user_id: &str) -> RoteiroResult<Option<TagRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM tags WHERE id = ?1 AND user_id = ?2",
            TAG_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![id, user_id], row_to_tag)
            .optional()?)
    }

    pub fn create_tag(&self, data: &WriteData) -> RoteiroResult<TagRecord> {
        let now = Utc::now();
        let record = TagRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: data.require_connect_id("user")?.to_string(),
            name: data.require_string("name")?,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tags(id, user_id, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                record.user_id,
                record.name,
                record.created_at,
                record.updated_at
            ],
        )?;
        Ok(record)
    }

    pub fn update_tag(&self, id: &str, data: &WriteData) -> RoteiroResult<TagRecord> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM tags WHERE id = ?1", TAG_COLUMNS);
        let mut record = conn
            .query_row(&sql, params![id], row_to_tag)
            .optional()?
            .ok_or(RoteiroError::Forbidden)?;

        if let Some(name) = data.string("name")? {
            record.name = name;
        }
        record.updated_at = Utc::now();

        conn.execute(
            "UPDATE tags SET name = ?1, updated_at = ?2 WHERE id = ?3",
            params![record.name, record.updated_at, record.id],
        )?;
        Ok(record)
    }

    pub fn tags_for_submission(
        &self,
        submission_id: &str,
        user_id: &str,
    ) -> RoteiroResult<Vec<TagRecord>> {
        self.linked_tags(TagLinks::Submission, submission_id, user_id)
    }

    pub fn tags_for_transition(
        &self,
        transition_id: &str,
        user_id: &str,
    ) -> RoteiroResult<Vec<TagRecord>> {
        self.linked_tags(TagLinks::Transition, transition_id, user_id)
    }

    /// Ids currently linked to a submission, sorted.
    pub fn submission_tag_ids(&self, submission_id: &str) -> RoteiroResult<Vec<String>> {
        let conn = self.conn()?;
        linked_tag_ids(&conn, TagLinks::Submission, submission_id)
    }

    /// Ids currently linked to a transition, sorted.
    pub fn transition_tag_ids(&self, transition_id: &str) -> RoteiroResult<Vec<String>> {
        let conn = self.conn()?;
        linked_tag_ids(&conn, TagLinks::Transition, transition_id)
    }

    fn linked_tags(
        &self,
        links: TagLinks,
        owner_id: &str,
        user_id: &str,
    ) -> RoteiroResult<Vec<TagRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM tags t
             JOIN {} l ON l.tag_id = t.id
             WHERE l.{} = ?1 AND t.user_id = ?2
             ORDER BY t.name ASC, t.id ASC",
            qualified("t", TAG_COLUMNS),
            links.table(),
            links.owner_column()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![owner_id, user_id], row_to_tag)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

pub(crate) fn linked_tag_ids(
    conn: &Connection,
    links: TagLinks,
    owner_id: &str,
) -> RoteiroResult<Vec<String>> {
    let sql = format!(
        "SELECT tag_id FROM {} WHERE {} = ?1 ORDER BY tag_id ASC",
        links.table(),
        links.owner_column()
    );
    let mut stmt = conn.prepare(&sql)?;
    let ids = stmt
        .query_map(params![owner_id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Applies the `tags` directive inside the caller's transaction.
///
/// `{ set }` is diffed against the links read here, so concurrent updates
/// serialise on the transaction and the last one wins outright.
pub(crate) fn apply_tag_links(
    conn: &Connection,
    links: TagLinks,
    owner_id: &str,
    data: &WriteData,
) -> RoteiroResult<()> {
    let changes = if let Some(desired) = data.list(TAGS_FIELD) {
        let current = linked_tag_ids(conn, links, owner_id)?;
        relation::diff(current, desired.iter().map(String::as_str))
    } else if let Some((connect, disconnect)) = data.relation(TAGS_FIELD) {
        RelationDiff {
            connect: connect.into_iter().map(str::to_string).collect(),
            disconnect: disconnect.into_iter().map(str::to_string).collect(),
        }
    } else {
        return Ok(());
    };

    let insert = format!(
        "INSERT OR IGNORE INTO {}({}, tag_id) VALUES (?1, ?2)",
        links.table(),
        links.owner_column()
    );
    for tag_id in &changes.connect {
        conn.execute(&insert, params![owner_id, tag_id])?;
    }

    let remove = format!(
        "DELETE FROM {} WHERE {} = ?1 AND tag_id = ?2",
        links.table(),
        links.owner_column()
    );
    for tag_id in &changes.disconnect {
        conn.execute(&remove, params![owner_id, tag_id])?;
    }
    Ok(())
}
