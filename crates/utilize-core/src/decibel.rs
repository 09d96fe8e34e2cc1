//! Relational store handle

use indexmap::IndexMap;
use parking_lot::{Mutex, MutexGuard};

use crate::backend::{BackendResult, SqlConnection};
use crate::resolve::InitStatement;
use crate::resource::ResourceKind;
use crate::{Error, Result};

/// A relational connection bundled with its named statement templates.
#[derive(Debug)]
pub struct Decibel<C> {
    engine: &'static str,
    connection: Mutex<C>,
    statements: IndexMap<String, String>,
}

impl<C: SqlConnection> Decibel<C> {
    pub fn new(engine: &'static str, connection: C, statements: IndexMap<String, String>) -> Self {
        Self {
            engine,
            connection: Mutex::new(connection),
            statements,
        }
    }

    pub fn engine(&self) -> &'static str {
        self.engine
    }

    /// Look up a statement template by id.
    pub fn statement(&self, id: &str) -> Option<&str> {
        self.statements.get(id).map(String::as_str)
    }

    pub fn statements(&self) -> &IndexMap<String, String> {
        &self.statements
    }

    /// Exclusive access to the connection.
    pub fn connection(&self) -> MutexGuard<'_, C> {
        self.connection.lock()
    }

    pub fn execute(&self, statement: &str) -> BackendResult<()> {
        self.connection.lock().execute(statement)
    }

    pub fn close(&self) -> BackendResult<()> {
        self.connection.lock().close()
    }
}

/// Run `statements` in order inside one transaction.
///
/// Any failure rolls the whole batch back; nothing is committed.
pub(crate) fn run_init<C: SqlConnection>(conn: &mut C, statements: &[InitStatement]) -> Result<()> {
    let resource = ResourceKind::Decibel;
    conn.begin().map_err(Error::backend(resource))?;

    for statement in statements {
        if let Err(source) = conn.execute(&statement.sql) {
            tracing::warn!(key = %statement.key, error = %source, "init statement failed, rolling back");
            if let Err(e) = conn.rollback() {
                tracing::warn!(error = %e, "rollback failed");
            }
            return Err(Error::InitStatement {
                resource,
                key: statement.key.clone(),
                source,
            });
        }
    }

    if let Err(source) = conn.commit() {
        let _ = conn.rollback();
        return Err(Error::Backend { resource, source });
    }
    tracing::debug!(statements = statements.len(), "init statements committed");
    Ok(())
}
