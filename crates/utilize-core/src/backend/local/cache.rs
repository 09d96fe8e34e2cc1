//! Cache server endpoints
//!
//! No network client is linked in; these handles carry resolved connection
//! parameters for code that dials the server itself.

use crate::resolve::{MemcachedParams, RedisParams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisEndpoint {
    params: RedisParams,
}

impl RedisEndpoint {
    pub fn new(params: &RedisParams) -> Self {
        Self {
            params: params.clone(),
        }
    }

    pub fn params(&self) -> &RedisParams {
        &self.params
    }

    /// Connection URL; a unix socket replaces host and port.
    pub fn url(&self) -> String {
        let auth = self
            .params
            .password
            .as_deref()
            .map(|p| format!(":{p}@"))
            .unwrap_or_default();
        match &self.params.unix_socket_path {
            Some(socket) => format!("unix://{auth}{}?db={}", socket.display(), self.params.db),
            None => format!(
                "redis://{auth}{}:{}/{}",
                self.params.host, self.params.port, self.params.db
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemcachedEndpoint {
    params: MemcachedParams,
}

impl MemcachedEndpoint {
    pub fn new(params: &MemcachedParams) -> Self {
        Self {
            params: params.clone(),
        }
    }

    pub fn params(&self) -> &MemcachedParams {
        &self.params
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.params.host, self.params.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_redis_url_prefers_socket() {
        let mut params = RedisParams::default();
        assert_eq!(RedisEndpoint::new(&params).url(), "redis://localhost:6379/0");

        params.password = Some("secret".into());
        params.unix_socket_path = Some(PathBuf::from("/run/redis.sock"));
        assert_eq!(
            RedisEndpoint::new(&params).url(),
            "unix://:secret@/run/redis.sock?db=0"
        );
    }

    #[test]
    fn test_memcached_address() {
        let endpoint = MemcachedEndpoint::new(&MemcachedParams::default());
        assert_eq!(endpoint.address(), "localhost:11211");
    }
}
