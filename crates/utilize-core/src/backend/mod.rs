//! Collaborator seam
//!
//! The registry decides *which* engine to build and *with what parameters*;
//! a [`Backends`] implementation decides *how*. Every constructor receives
//! fully resolved parameters, never raw configuration.

pub mod local;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::resolve::{
    BaseconParams, MemcachedParams, RedisParams, SecoParams, SqlEngine,
};

/// Result type for collaborator operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Errors reported by collaborators
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{what} is not supported by this backend")]
    Unsupported { what: String },

    #[error("the {engine} engine is not available from this backend")]
    Unavailable { engine: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("handle has been closed")]
    Closed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    File(#[from] utilize_config::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0}")]
    Other(String),
}

/// Key-value store handle.
///
/// Values are structured (`serde_json::Value`); the store encodes them with
/// its serialization helper.
pub trait KeyValueStore {
    fn set(&self, key: &str, value: &Value) -> BackendResult<()>;

    fn get(&self, key: &str) -> BackendResult<Option<Value>>;

    fn close(&self) -> BackendResult<()> {
        Ok(())
    }
}

/// Relational connection. The registry drives initialization through
/// explicit transaction control.
pub trait SqlConnection {
    fn begin(&mut self) -> BackendResult<()>;

    fn execute(&mut self, statement: &str) -> BackendResult<()>;

    fn commit(&mut self) -> BackendResult<()>;

    fn rollback(&mut self) -> BackendResult<()>;

    fn close(&mut self) -> BackendResult<()> {
        Ok(())
    }
}

/// Names of the four broker queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueName {
    Job,
    Result,
    Reject,
    Serialize,
}

impl QueueName {
    pub const ALL: [QueueName; 4] = [Self::Job, Self::Result, Self::Reject, Self::Serialize];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Job => "job",
            Self::Result => "result",
            Self::Reject => "reject",
            Self::Serialize => "serialize",
        }
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed fan-out of queues handed to a message broker.
#[derive(Debug)]
pub struct BrokerQueues<Q> {
    pub job: Q,
    pub result: Q,
    pub reject: Q,
    pub serialize: Q,
}

impl<Q> BrokerQueues<Q> {
    /// Build each queue independently, in [`QueueName::ALL`] order.
    pub fn try_build<E>(mut make: impl FnMut(QueueName) -> Result<Q, E>) -> Result<Self, E> {
        Ok(Self {
            job: make(QueueName::Job)?,
            result: make(QueueName::Result)?,
            reject: make(QueueName::Reject)?,
            serialize: make(QueueName::Serialize)?,
        })
    }

    pub fn get(&self, name: QueueName) -> &Q {
        match name {
            QueueName::Job => &self.job,
            QueueName::Result => &self.result,
            QueueName::Reject => &self.reject,
            QueueName::Serialize => &self.serialize,
        }
    }
}

/// Underlying store a key-value handle is built on.
pub enum KvsTarget<'a, B: Backends + ?Sized> {
    Memory,
    File(&'a Path),
    Redis(Arc<B::Cache>),
    Memcached(Arc<B::Memcached>),
}

impl<B: Backends + ?Sized> KvsTarget<'_, B> {
    pub fn engine_name(&self) -> &'static str {
        match self {
            Self::Memory => ":memory:",
            Self::File(_) => "dbm",
            Self::Redis(_) => "redis",
            Self::Memcached(_) => "memcached",
        }
    }
}

/// Constructors for every external collaborator.
pub trait Backends {
    type Codec;
    type Seco;
    type Cache;
    type Memcached;
    type Kvs: KeyValueStore;
    type Sql: SqlConnection;
    type Queue;
    type Broker;

    fn base_codec(&self, params: &BaseconParams) -> BackendResult<Self::Codec>;

    fn seco(&self, params: &SecoParams) -> BackendResult<Self::Seco>;

    fn redis(&self, params: &RedisParams) -> BackendResult<Self::Cache>;

    fn memcached(&self, params: &MemcachedParams) -> BackendResult<Self::Memcached>;

    /// Open a key-value store over `target`, wrapped with `seco`.
    fn kvs(&self, target: KvsTarget<'_, Self>, seco: Arc<Self::Seco>) -> BackendResult<Self::Kvs>;

    fn sql(&self, engine: &SqlEngine) -> BackendResult<Self::Sql>;

    fn queue(&self, name: QueueName) -> BackendResult<Self::Queue>;

    fn broker(&self, queues: BrokerQueues<Self::Queue>) -> BackendResult<Self::Broker>;
}
