//! Parameters for the single-variant resources

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use utilize_config::ConfigStore;

use super::{non_empty, parse_number};
use crate::{Error, Result};

pub const DEFAULT_BASE: u32 = 62;
pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 65;

/// Base converter parameters from `[basecon]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseconParams {
    pub base: u32,
}

impl Default for BaseconParams {
    fn default() -> Self {
        Self { base: DEFAULT_BASE }
    }
}

impl BaseconParams {
    pub fn resolve(config: &ConfigStore) -> Result<Self> {
        let Some(raw) = config.lookup("basecon", "base") else {
            return Ok(Self::default());
        };
        let base: u32 = parse_number("basecon", "base", raw)?;
        if !(MIN_BASE..=MAX_BASE).contains(&base) {
            return Err(Error::invalid(
                "basecon",
                "base",
                raw,
                format!("must be between {MIN_BASE} and {MAX_BASE}"),
            ));
        }
        Ok(Self { base })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerializeFormat {
    Json,
    #[default]
    Msgpack,
    Pickle,
}

impl SerializeFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "msgpack" => Some(Self::Msgpack),
            "pickle" => Some(Self::Pickle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Msgpack => "msgpack",
            Self::Pickle => "pickle",
        }
    }
}

impl fmt::Display for SerializeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressFormat {
    #[default]
    Zlib,
    Bz2,
}

impl CompressFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "zlib" => Some(Self::Zlib),
            "bz2" => Some(Self::Bz2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zlib => "zlib",
            Self::Bz2 => "bz2",
        }
    }
}

impl fmt::Display for CompressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialization helper parameters from `[seco]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecoParams {
    pub serialize: SerializeFormat,
    pub compress: CompressFormat,
}

impl SecoParams {
    pub fn resolve(config: &ConfigStore) -> Result<Self> {
        let mut params = Self::default();
        let Some(section) = config.section("seco") else {
            return Ok(params);
        };

        for (key, value) in section.iter() {
            match key {
                "serialize" => {
                    params.serialize = SerializeFormat::parse(value).ok_or_else(|| {
                        Error::invalid("seco", key, value, "expected json, msgpack or pickle")
                    })?;
                }
                "compress" => {
                    params.compress = CompressFormat::parse(value).ok_or_else(|| {
                        Error::invalid("seco", key, value, "expected zlib or bz2")
                    })?;
                }
                _ => {
                    return Err(Error::UnknownParameter {
                        section: "seco".into(),
                        key: key.into(),
                    });
                }
            }
        }
        Ok(params)
    }
}

/// Redis connection parameters from `[redis]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisParams {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: u32,
    /// Replaces `host`/`port` when set
    pub unix_socket_path: Option<PathBuf>,
    /// Any other client option from `[redis]`, in source order
    pub extra: IndexMap<String, String>,
}

impl Default for RedisParams {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            db: 0,
            unix_socket_path: None,
            extra: IndexMap::new(),
        }
    }
}

impl RedisParams {
    pub fn resolve(config: &ConfigStore) -> Result<Self> {
        let mut params = Self::default();
        let Some(section) = config.section("redis") else {
            return Ok(params);
        };

        for (key, value) in section.iter() {
            match key {
                "host" => params.host = value.to_string(),
                "port" => params.port = parse_number("redis", key, value)?,
                "password" => params.password = non_empty(Some(value)).map(str::to_string),
                "db" => params.db = parse_number("redis", key, value)?,
                "unix_socket_path" => {
                    params.unix_socket_path = non_empty(Some(value)).map(PathBuf::from)
                }
                _ => {
                    params.extra.insert(key.to_string(), value.to_string());
                }
            }
        }
        Ok(params)
    }
}

/// Memcached connection parameters from `[memcached]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemcachedParams {
    pub host: String,
    pub port: u16,
}

impl Default for MemcachedParams {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 11211,
        }
    }
}

impl MemcachedParams {
    pub fn resolve(config: &ConfigStore) -> Result<Self> {
        let defaults = Self::default();
        let host = non_empty(config.lookup("memcached", "host"))
            .map(str::to_string)
            .unwrap_or(defaults.host);
        let port = match config.lookup("memcached", "port") {
            Some(raw) => parse_number("memcached", "port", raw)?,
            None => defaults.port,
        };
        Ok(Self { host, port })
    }
}
