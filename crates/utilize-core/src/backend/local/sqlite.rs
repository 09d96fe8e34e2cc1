//! sqlite relational connection

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::backend::{BackendError, BackendResult, SqlConnection};

/// sqlite connection owned by the process that opened it.
///
/// Dropping it closes the connection, except in a forked child, where the
/// inherited handle is left untouched for the parent.
#[derive(Debug)]
pub struct SqliteConnection {
    conn: Option<Connection>,
    path: PathBuf,
    owner_pid: u32,
}

impl SqliteConnection {
    pub fn open(path: &Path) -> BackendResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened sqlite database");
        Ok(Self {
            conn: Some(conn),
            path: path.to_path_buf(),
            owner_pid: std::process::id(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying connection, for queries.
    pub fn connection(&self) -> BackendResult<&Connection> {
        self.conn.as_ref().ok_or(BackendError::Closed)
    }

    fn batch(&mut self, sql: &str) -> BackendResult<()> {
        self.connection()?.execute_batch(sql)?;
        Ok(())
    }
}

impl SqlConnection for SqliteConnection {
    fn begin(&mut self) -> BackendResult<()> {
        self.batch("BEGIN")
    }

    fn execute(&mut self, statement: &str) -> BackendResult<()> {
        self.batch(statement)
    }

    fn commit(&mut self) -> BackendResult<()> {
        self.batch("COMMIT")
    }

    fn rollback(&mut self) -> BackendResult<()> {
        self.batch("ROLLBACK")
    }

    fn close(&mut self) -> BackendResult<()> {
        match self.conn.take() {
            Some(conn) => conn.close().map_err(|(_, e)| BackendError::Sqlite(e)),
            None => Ok(()),
        }
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        if self.owner_pid != std::process::id() {
            tracing::debug!(path = %self.path.display(), "leaving inherited sqlite handle open");
            std::mem::forget(conn);
            return;
        }
        if let Err((_, e)) = conn.close() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to close sqlite database");
        }
    }
}
