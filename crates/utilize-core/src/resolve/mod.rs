//! Configuration resolution
//!
//! Turns raw sections of a [`ConfigStore`](utilize_config::ConfigStore) into
//! typed descriptors. Every function here is pure: it reads the store, applies
//! the hard-coded default for anything absent, and either returns a complete
//! descriptor or a configuration error. Nothing is constructed.
//!
//! | resource | sections read |
//! |----------|---------------|
//! | basecon | `basecon` |
//! | seco | `seco` |
//! | redis | `redis` |
//! | memcached | `memcached` |
//! | kvs | `kvs`, `kvs:init` |
//! | decibel | `decibel`, `sqlite:init`, `sqlite:stmt`, `mysql`, `mysql:init`, `mysql:stmt` |

mod decibel;
mod kvs;
mod params;

pub use decibel::{DecibelDescriptor, InitStatement, MysqlParams, SqlEngine};
pub use kvs::{KvsDescriptor, KvsEngine};
pub use params::{
    BaseconParams, CompressFormat, MemcachedParams, RedisParams, SecoParams, SerializeFormat,
};

use std::str::FromStr;

use crate::{Error, Result};

/// Parse a numeric value, reporting the section and key on failure.
fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| Error::invalid(section, key, value, e.to_string()))
}

/// Treat an empty string as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
