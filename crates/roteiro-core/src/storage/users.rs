use super::rows::{row_to_user, USER_COLUMNS};
use super::Store;
use crate::error::{RoteiroError, RoteiroResult};
use crate::model::UserRecord;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

impl Store {
    /// Creates a user; `password` must already be hashed.
    pub fn create_user(&self, email: &str, password: &str) -> RoteiroResult<UserRecord> {
        let conn = self.conn()?;
        let now = Utc::now();
        let record = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: now,
            updated_at: now,
        };

        let res = conn.execute(
            "INSERT INTO users(id, email, password, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                record.email,
                record.password,
                record.created_at,
                record.updated_at
            ],
        );

        match res {
            Ok(_) => Ok(record),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(RoteiroError::EmailInUse)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn user_by_id(&self, id: &str) -> RoteiroResult<Option<UserRecord>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        Ok(conn
            .query_row(&sql, params![id], row_to_user)
            .optional()?)
    }

    pub fn user_by_email(&self, email: &str) -> RoteiroResult<Option<UserRecord>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        Ok(conn
            .query_row(&sql, params![email], row_to_user)
            .optional()?)
    }

    pub fn set_password(&self, user_id: &str, password: &str) -> RoteiroResult<()> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE users SET password = ?1, updated_at = ?2 WHERE id = ?3",
            params![password, Utc::now(), user_id],
        )?;
        if affected == 0 {
            return Err(RoteiroError::Forbidden);
        }
        Ok(())
    }
}
