//! Resource registry for utilize
//!
//! This crate turns a [`ConfigStore`] into lazily built, process-wide
//! resource handles:
//!
//! - **Resolution**: loosely typed sections become typed descriptors, with
//!   engine names mapped onto closed enums and hard-coded defaults filling
//!   in absent keys
//! - **Registry**: one once-only slot per resource kind, built on first
//!   access and shared afterwards
//! - **Lifecycle**: an explicit process role that keeps stateful resources
//!   from being built before a fork
//! - **Backends**: the collaborator seam, with a local implementation for
//!   the engines that need no network
//!
//! # Example
//!
//! ```ignore
//! use utilize_core::{ProcessRole, ResourceRegistry};
//!
//! let registry = ResourceRegistry::from_path("./config.ini")?;
//! registry.declare_role(ProcessRole::Standalone)?;
//!
//! let kvs = registry.kvs()?;
//! kvs.set("greeting", &serde_json::json!("hello"))?;
//! ```

pub mod backend;
pub mod decibel;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod registry;
pub mod resolve;
pub mod resource;

pub use backend::local::LocalBackends;
pub use backend::{
    BackendError, BackendResult, Backends, BrokerQueues, KeyValueStore, KvsTarget, QueueName,
    SqlConnection,
};
pub use decibel::Decibel;
pub use error::{Error, Result};
pub use lifecycle::ProcessRole;
pub use registry::ResourceRegistry;
pub use resolve::{
    BaseconParams, CompressFormat, DecibelDescriptor, InitStatement, KvsDescriptor, KvsEngine,
    MemcachedParams, MysqlParams, RedisParams, SecoParams, SerializeFormat, SqlEngine,
};
pub use resource::ResourceKind;
pub use utilize_config::{ConfigSource, ConfigStore};
