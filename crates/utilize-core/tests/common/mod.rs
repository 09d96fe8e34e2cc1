//! Recording collaborators for registry tests

#![allow(dead_code)]

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use utilize_core::{
    BackendError, BackendResult, Backends, BaseconParams, BrokerQueues, ConfigStore,
    KeyValueStore, KvsTarget, MemcachedParams, QueueName, RedisParams, ResourceRegistry,
    SecoParams, SqlConnection, SqlEngine,
};

/// Shared call log.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0.lock().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

#[derive(Debug)]
pub struct FakeKvs {
    pub target: &'static str,
    pub entries: Mutex<IndexMap<String, Value>>,
    log: CallLog,
}

impl KeyValueStore for FakeKvs {
    fn set(&self, key: &str, value: &Value) -> BackendResult<()> {
        self.entries.lock().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> BackendResult<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn close(&self) -> BackendResult<()> {
        self.log.push("kvs:close");
        Ok(())
    }
}

#[derive(Debug)]
pub struct FakeSql {
    pub engine: SqlEngine,
    fail_on: Option<String>,
    log: CallLog,
}

impl SqlConnection for FakeSql {
    fn begin(&mut self) -> BackendResult<()> {
        self.log.push("sql:begin");
        Ok(())
    }

    fn execute(&mut self, statement: &str) -> BackendResult<()> {
        if self.fail_on.as_deref() == Some(statement) {
            self.log.push(format!("sql:fail {statement}"));
            return Err(BackendError::Other(format!("cannot execute {statement}")));
        }
        self.log.push(format!("sql:exec {statement}"));
        Ok(())
    }

    fn commit(&mut self) -> BackendResult<()> {
        self.log.push("sql:commit");
        Ok(())
    }

    fn rollback(&mut self) -> BackendResult<()> {
        self.log.push("sql:rollback");
        Ok(())
    }

    fn close(&mut self) -> BackendResult<()> {
        self.log.push("sql:close");
        Ok(())
    }
}

/// Collaborators that build plain records and log every call.
#[derive(Debug, Clone, Default)]
pub struct FakeBackends {
    pub log: CallLog,
    /// Statement text that fails when executed
    pub fail_on: Option<String>,
}

impl FakeBackends {
    pub fn failing_on(statement: &str) -> Self {
        Self {
            fail_on: Some(statement.to_string()),
            ..Self::default()
        }
    }
}

impl Backends for FakeBackends {
    type Codec = BaseconParams;
    type Seco = SecoParams;
    type Cache = RedisParams;
    type Memcached = MemcachedParams;
    type Kvs = FakeKvs;
    type Sql = FakeSql;
    type Queue = QueueName;
    type Broker = BrokerQueues<QueueName>;

    fn base_codec(&self, params: &BaseconParams) -> BackendResult<BaseconParams> {
        self.log.push("build:basecon");
        Ok(*params)
    }

    fn seco(&self, params: &SecoParams) -> BackendResult<SecoParams> {
        self.log.push("build:seco");
        Ok(*params)
    }

    fn redis(&self, params: &RedisParams) -> BackendResult<RedisParams> {
        self.log.push("build:redis");
        Ok(params.clone())
    }

    fn memcached(&self, params: &MemcachedParams) -> BackendResult<MemcachedParams> {
        self.log.push("build:memcached");
        Ok(params.clone())
    }

    fn kvs(&self, target: KvsTarget<'_, Self>, _seco: Arc<SecoParams>) -> BackendResult<FakeKvs> {
        self.log.push(format!("build:kvs {}", target.engine_name()));
        Ok(FakeKvs {
            target: target.engine_name(),
            entries: Mutex::new(IndexMap::new()),
            log: self.log.clone(),
        })
    }

    fn sql(&self, engine: &SqlEngine) -> BackendResult<FakeSql> {
        self.log.push(format!("build:sql {}", engine.name()));
        Ok(FakeSql {
            engine: engine.clone(),
            fail_on: self.fail_on.clone(),
            log: self.log.clone(),
        })
    }

    fn queue(&self, name: QueueName) -> BackendResult<QueueName> {
        self.log.push(format!("build:queue {name}"));
        Ok(name)
    }

    fn broker(&self, queues: BrokerQueues<QueueName>) -> BackendResult<BrokerQueues<QueueName>> {
        self.log.push("build:broker");
        Ok(queues)
    }
}

pub fn store(text: &str) -> ConfigStore {
    text.parse().expect("test config should parse")
}

/// A standalone registry over fake collaborators, plus its call log.
pub fn fake_registry(text: &str) -> (ResourceRegistry<FakeBackends>, CallLog) {
    fake_registry_with(text, FakeBackends::default())
}

pub fn fake_registry_with(
    text: &str,
    backends: FakeBackends,
) -> (ResourceRegistry<FakeBackends>, CallLog) {
    let log = backends.log.clone();
    (ResourceRegistry::standalone(store(text), backends), log)
}
