//! Lazy resource registry
//!
//! [`ResourceRegistry`] owns a [`ConfigStore`] and one once-only slot per
//! [`ResourceKind`]. The first call to an accessor resolves the relevant
//! sections, asks the [`Backends`] to build the handle and caches it; later
//! calls return the same `Arc`. A failed build leaves its slot empty, so a
//! corrected configuration can be tried on a fresh registry.
//!
//! A slot is built at most once. [`ResourceRegistry::shutdown`] closes the
//! handles and ends the registry: accessors fail with [`Error::ShutDown`]
//! afterwards. Dropping the registry closes nothing; each handle is released
//! when its last `Arc` goes away.

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use utilize_config::{ConfigSource, ConfigStore};

use crate::backend::local::LocalBackends;
use crate::backend::{Backends, BrokerQueues, KeyValueStore, KvsTarget, SqlConnection};
use crate::decibel::{self, Decibel};
use crate::lifecycle::{ProcessRole, RoleGuard};
use crate::resolve::{
    BaseconParams, DecibelDescriptor, KvsDescriptor, KvsEngine, MemcachedParams, RedisParams,
    SecoParams,
};
use crate::resource::ResourceKind;
use crate::{Error, Result};

pub struct ResourceRegistry<B: Backends = LocalBackends> {
    config: ConfigStore,
    backends: B,
    guard: RoleGuard,
    basecon: OnceCell<Arc<B::Codec>>,
    seco: OnceCell<Arc<B::Seco>>,
    redis: OnceCell<Arc<B::Cache>>,
    memcached: OnceCell<Arc<B::Memcached>>,
    kvs: OnceCell<Arc<B::Kvs>>,
    decibel: OnceCell<Arc<Decibel<B::Sql>>>,
    message_broker: OnceCell<Arc<B::Broker>>,
    shut_down: bool,
}

impl ResourceRegistry<LocalBackends> {
    /// Create a registry over `config` with the local collaborators.
    pub fn new(config: ConfigStore) -> Self {
        Self::with_backends(config, LocalBackends)
    }

    /// Create a registry from a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(ConfigStore::from_path(path)?))
    }

    /// Create a registry from `./config.ini`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(ConfigStore::open_default()?))
    }
}

impl<B: Backends> ResourceRegistry<B> {
    pub fn with_backends(config: ConfigStore, backends: B) -> Self {
        Self {
            config,
            backends,
            guard: RoleGuard::new(),
            basecon: OnceCell::new(),
            seco: OnceCell::new(),
            redis: OnceCell::new(),
            memcached: OnceCell::new(),
            kvs: OnceCell::new(),
            decibel: OnceCell::new(),
            message_broker: OnceCell::new(),
            shut_down: false,
        }
    }

    /// Create a registry for a process that never forks.
    pub fn standalone(config: ConfigStore, backends: B) -> Self {
        let registry = Self::with_backends(config, backends);
        // Nothing is built yet, so declaring cannot fail
        let _ = registry.declare_role(ProcessRole::Standalone);
        registry
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Overlay another configuration source.
    ///
    /// Handles that are already built keep the configuration they were
    /// built with.
    pub fn update(&mut self, source: impl Into<ConfigSource>) -> Result<()> {
        self.config.load(source)?;
        Ok(())
    }

    pub fn backends(&self) -> &B {
        &self.backends
    }

    /// Declare the role of the current process.
    ///
    /// Stateful accessors fail until this is called. A forked worker must
    /// call it again before using the registry, and may only do so while
    /// nothing stateful has been built.
    pub fn declare_role(&self, role: ProcessRole) -> Result<()> {
        self.guard.declare(role, self.any_stateful_built())
    }

    pub fn role(&self) -> Option<ProcessRole> {
        self.guard.role()
    }

    pub fn is_built(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Basecon => self.basecon.get().is_some(),
            ResourceKind::Seco => self.seco.get().is_some(),
            ResourceKind::Redis => self.redis.get().is_some(),
            ResourceKind::Memcached => self.memcached.get().is_some(),
            ResourceKind::Kvs => self.kvs.get().is_some(),
            ResourceKind::Decibel => self.decibel.get().is_some(),
            ResourceKind::MessageBroker => self.message_broker.get().is_some(),
        }
    }

    fn any_stateful_built(&self) -> bool {
        ResourceKind::ALL
            .into_iter()
            .filter(ResourceKind::is_stateful)
            .any(|kind| self.is_built(kind))
    }

    /// Return the cached handle in `slot`, building it on first use.
    fn slot<T>(
        &self,
        resource: ResourceKind,
        slot: &OnceCell<Arc<T>>,
        build: impl FnOnce() -> Result<(&'static str, T)>,
    ) -> Result<Arc<T>> {
        if self.shut_down {
            return Err(Error::ShutDown { resource });
        }
        self.guard.check(resource)?;
        slot.get_or_try_init(|| {
            let (engine, handle) = build()?;
            tracing::info!(%resource, engine, "built resource");
            Ok(Arc::new(handle))
        })
        .cloned()
    }

    /// Base converter. Needs no declared role.
    pub fn basecon(&self) -> Result<Arc<B::Codec>> {
        let resource = ResourceKind::Basecon;
        self.slot(resource, &self.basecon, || {
            let params = BaseconParams::resolve(&self.config)?;
            tracing::debug!(%resource, base = params.base, "resolved parameters");
            let codec = self
                .backends
                .base_codec(&params)
                .map_err(Error::backend(resource))?;
            Ok(("basecon", codec))
        })
    }

    pub fn seco(&self) -> Result<Arc<B::Seco>> {
        let resource = ResourceKind::Seco;
        self.slot(resource, &self.seco, || {
            let params = SecoParams::resolve(&self.config)?;
            tracing::debug!(
                %resource,
                serialize = %params.serialize,
                compress = %params.compress,
                "resolved parameters"
            );
            let seco = self.backends.seco(&params).map_err(Error::backend(resource))?;
            Ok(("seco", seco))
        })
    }

    pub fn redis(&self) -> Result<Arc<B::Cache>> {
        let resource = ResourceKind::Redis;
        self.slot(resource, &self.redis, || {
            let params = RedisParams::resolve(&self.config)?;
            tracing::debug!(%resource, host = %params.host, port = params.port, "resolved parameters");
            let cache = self.backends.redis(&params).map_err(Error::backend(resource))?;
            Ok(("redis", cache))
        })
    }

    pub fn memcached(&self) -> Result<Arc<B::Memcached>> {
        let resource = ResourceKind::Memcached;
        self.slot(resource, &self.memcached, || {
            let params = MemcachedParams::resolve(&self.config)?;
            tracing::debug!(%resource, host = %params.host, port = params.port, "resolved parameters");
            let client = self
                .backends
                .memcached(&params)
                .map_err(Error::backend(resource))?;
            Ok(("memcached", client))
        })
    }

    /// Key-value store, seeded from `[kvs:init]` on first build when
    /// `initialize` is set.
    pub fn kvs(&self) -> Result<Arc<B::Kvs>> {
        let resource = ResourceKind::Kvs;
        self.slot(resource, &self.kvs, || {
            let descriptor = KvsDescriptor::resolve(&self.config)?;
            let engine = descriptor.engine.name();
            tracing::debug!(%resource, engine, seed = descriptor.seed.len(), "resolved descriptor");

            let seco = self.seco()?;
            let target = match &descriptor.engine {
                KvsEngine::Memory => KvsTarget::Memory,
                KvsEngine::File { path } => KvsTarget::File(path),
                KvsEngine::Redis => KvsTarget::Redis(self.redis()?),
                KvsEngine::Memcached => KvsTarget::Memcached(self.memcached()?),
            };
            let store = self
                .backends
                .kvs(target, seco)
                .map_err(Error::backend(resource))?;

            for (key, value) in &descriptor.seed {
                if let Err(source) = store.set(key, value) {
                    let _ = store.close();
                    return Err(Error::Seed {
                        key: key.clone(),
                        source,
                    });
                }
            }
            Ok((engine, store))
        })
    }

    /// Relational store. Initialization statements run once, in one
    /// transaction, before the handle is cached.
    pub fn decibel(&self) -> Result<Arc<Decibel<B::Sql>>> {
        let resource = ResourceKind::Decibel;
        self.slot(resource, &self.decibel, || {
            let descriptor = DecibelDescriptor::resolve(&self.config)?;
            let engine = descriptor.engine.name();
            tracing::debug!(
                %resource,
                engine,
                init = descriptor.init.len(),
                statements = descriptor.statements.len(),
                "resolved descriptor"
            );

            let mut conn = self
                .backends
                .sql(&descriptor.engine)
                .map_err(Error::backend(resource))?;
            if !descriptor.init.is_empty() {
                if let Err(e) = decibel::run_init(&mut conn, &descriptor.init) {
                    let _ = conn.close();
                    return Err(e);
                }
            }
            Ok((engine, Decibel::new(engine, conn, descriptor.statements)))
        })
    }

    /// Message broker over four freshly built queues.
    pub fn message_broker(&self) -> Result<Arc<B::Broker>> {
        let resource = ResourceKind::MessageBroker;
        self.slot(resource, &self.message_broker, || {
            let queues = BrokerQueues::try_build(|name| self.backends.queue(name))
                .map_err(Error::backend(resource))?;
            let broker = self
                .backends
                .broker(queues)
                .map_err(Error::backend(resource))?;
            Ok(("message_broker", broker))
        })
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Close every built handle and refuse further access.
    ///
    /// All slots are released even when closing one fails; the first
    /// failure is returned. A registry inherited from another process
    /// releases its slots without closing handles it does not own.
    pub fn shutdown(&mut self) -> Result<()> {
        self.shut_down = true;

        let close = self.guard.owned_by_current_process();
        if !close {
            tracing::warn!("registry belongs to another process, releasing without closing");
        }
        match self.release(close).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn release(&mut self, close: bool) -> Vec<Error> {
        let mut errors = Vec::new();

        if let Some(kvs) = self.kvs.take() {
            if close {
                if let Err(source) = kvs.close() {
                    errors.push(Error::Backend {
                        resource: ResourceKind::Kvs,
                        source,
                    });
                }
            }
            tracing::debug!(resource = %ResourceKind::Kvs, closed = close, "released");
        }
        if let Some(decibel) = self.decibel.take() {
            if close {
                if let Err(source) = decibel.close() {
                    errors.push(Error::Backend {
                        resource: ResourceKind::Decibel,
                        source,
                    });
                }
            }
            tracing::debug!(resource = %ResourceKind::Decibel, closed = close, "released");
        }

        release_slot(&mut self.message_broker, ResourceKind::MessageBroker);
        release_slot(&mut self.redis, ResourceKind::Redis);
        release_slot(&mut self.memcached, ResourceKind::Memcached);
        release_slot(&mut self.seco, ResourceKind::Seco);
        release_slot(&mut self.basecon, ResourceKind::Basecon);

        errors
    }
}

fn release_slot<T>(slot: &mut OnceCell<T>, resource: ResourceKind) {
    if slot.take().is_some() {
        tracing::debug!(%resource, "released");
    }
}
