//! Collaborators that need no network service

mod broker;
mod cache;
mod codec;
mod kvs;
mod seco;
mod sqlite;

use std::sync::Arc;

pub use broker::{MessageBroker, MessageQueue};
pub use cache::{MemcachedEndpoint, RedisEndpoint};
pub use codec::{ALPHABET, BaseCodec};
pub use kvs::LocalKvs;
pub use seco::SeCo;
pub use sqlite::SqliteConnection;

use super::{BackendError, BackendResult, Backends, BrokerQueues, KvsTarget, QueueName};
use crate::resolve::{BaseconParams, MemcachedParams, RedisParams, SecoParams, SqlEngine};

/// Default collaborator set.
///
/// Engines that need a running server (mysql, redis- or memcached-backed
/// key-value stores) are reported [`BackendError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBackends;

impl Backends for LocalBackends {
    type Codec = BaseCodec;
    type Seco = SeCo;
    type Cache = RedisEndpoint;
    type Memcached = MemcachedEndpoint;
    type Kvs = LocalKvs;
    type Sql = SqliteConnection;
    type Queue = MessageQueue;
    type Broker = MessageBroker;

    fn base_codec(&self, params: &BaseconParams) -> BackendResult<BaseCodec> {
        BaseCodec::new(params)
    }

    fn seco(&self, params: &SecoParams) -> BackendResult<SeCo> {
        SeCo::new(params)
    }

    fn redis(&self, params: &RedisParams) -> BackendResult<RedisEndpoint> {
        Ok(RedisEndpoint::new(params))
    }

    fn memcached(&self, params: &MemcachedParams) -> BackendResult<MemcachedEndpoint> {
        Ok(MemcachedEndpoint::new(params))
    }

    fn kvs(&self, target: KvsTarget<'_, Self>, seco: Arc<SeCo>) -> BackendResult<LocalKvs> {
        match target {
            KvsTarget::Memory => Ok(LocalKvs::memory(seco)),
            KvsTarget::File(path) => LocalKvs::open(path, seco),
            other => Err(BackendError::Unavailable {
                engine: other.engine_name().to_string(),
            }),
        }
    }

    fn sql(&self, engine: &SqlEngine) -> BackendResult<SqliteConnection> {
        match engine {
            SqlEngine::Sqlite { path } => SqliteConnection::open(path),
            SqlEngine::Mysql { .. } => Err(BackendError::Unavailable {
                engine: engine.name().to_string(),
            }),
        }
    }

    fn queue(&self, name: QueueName) -> BackendResult<MessageQueue> {
        Ok(MessageQueue::new(name))
    }

    fn broker(&self, queues: BrokerQueues<MessageQueue>) -> BackendResult<MessageBroker> {
        Ok(MessageBroker::new(queues))
    }
}
