use crate::error::{RoteiroError, RoteiroResult};
use crate::model::EntityKind;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// SQLite-backed record store.
///
/// One connection behind a mutex; every method is a short critical section.
#[derive(Clone)]
pub struct Store {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> RoteiroResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn memory() -> RoteiroResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> RoteiroResult<Self> {
        // Cascades and relation checks depend on this; it is per connection.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Logs every statement at debug level under `roteiro::sql`.
    pub fn with_sql_debug(self, enabled: bool) -> RoteiroResult<Self> {
        if enabled {
            self.conn()?.trace(Some(log_sql));
        }
        Ok(self)
    }

    pub fn init_schema(&self) -> RoteiroResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(super::schema::DDL)?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> RoteiroResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RoteiroError::Storage {
            message: "store connection mutex poisoned".to_string(),
        })
    }

    /// True when a row of `kind` with this id belongs to `user_id`.
    pub fn exists(&self, kind: EntityKind, id: &str, user_id: &str) -> RoteiroResult<bool> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT 1 FROM {} WHERE id = ?1 AND user_id = ?2 LIMIT 1",
            kind.table()
        );
        let found = conn
            .query_row(&sql, params![id, user_id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Deletes a row by id and returns the id.
    ///
    /// Dependent rows and tag links go with it through `ON DELETE CASCADE`.
    pub fn delete(&self, kind: EntityKind, id: &str) -> RoteiroResult<String> {
        let conn = self.conn()?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
        let affected = conn.execute(&sql, params![id])?;
        if affected == 0 {
            return Err(RoteiroError::Forbidden);
        }
        tracing::debug!(kind = %kind, id, "record deleted");
        Ok(id.to_string())
    }
}

fn log_sql(sql: &str) {
    tracing::debug!(target: "roteiro::sql", "{}", sql);
}
