//! Key-value store engine selection

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use utilize_config::ConfigStore;

use crate::resource::ResourceKind;
use crate::{Error, Result};

pub const DEFAULT_ENGINE: &str = ":memory:";
pub const DEFAULT_PATH: &str = "./database.kvs";

/// The store a key-value handle is built over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvsEngine {
    /// Process-local map
    Memory,
    /// File-backed map (`dbm`, `gdbm`, `ndbm`)
    File { path: PathBuf },
    /// Delegates to the registry's redis handle
    Redis,
    /// Delegates to the registry's memcached handle
    Memcached,
}

impl KvsEngine {
    /// Map an engine name onto a variant. Names are matched lowercased.
    pub fn select(engine: &str, path: &str) -> Result<Self> {
        match engine.to_ascii_lowercase().as_str() {
            ":memory:" => Ok(Self::Memory),
            "dbm" | "gdbm" | "ndbm" => Ok(Self::File {
                path: PathBuf::from(path),
            }),
            "redis" => Ok(Self::Redis),
            "memcached" => Ok(Self::Memcached),
            _ => Err(Error::UnsupportedEngine {
                resource: ResourceKind::Kvs,
                engine: engine.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => ":memory:",
            Self::File { .. } => "dbm",
            Self::Redis => "redis",
            Self::Memcached => "memcached",
        }
    }
}

impl fmt::Display for KvsEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to build and seed the key-value store.
#[derive(Debug, Clone, PartialEq)]
pub struct KvsDescriptor {
    pub engine: KvsEngine,
    pub initialize: bool,
    /// Pairs from `[kvs:init]`, empty unless `initialize` is set
    pub seed: Vec<(String, Value)>,
}

impl KvsDescriptor {
    pub fn resolve(config: &ConfigStore) -> Result<Self> {
        let engine = KvsEngine::select(
            config.get("kvs", "engine", DEFAULT_ENGINE),
            config.get("kvs", "path", DEFAULT_PATH),
        )?;
        let initialize = config.get_bool("kvs", "initialize", false);

        let seed = match config.section("kvs:init") {
            Some(section) if initialize => section
                .iter()
                .map(|(key, raw)| (key.to_string(), decode_seed(key, raw)))
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            engine,
            initialize,
            seed,
        })
    }
}

/// Decode a seed value as JSON, keeping the raw text when it is not valid JSON.
pub fn decode_seed(key: &str, raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(key, error = %e, "seed value is not JSON, storing raw string");
            Value::String(raw.to_string())
        }
    }
}
