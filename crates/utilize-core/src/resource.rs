//! Resource kinds managed by the registry

use std::fmt;

/// One lazily built slot in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Integer/string base conversion helper
    Basecon,
    /// Serialization and compression helper
    Seco,
    /// Redis cache server handle
    Redis,
    /// Memcached handle
    Memcached,
    /// Key-value store
    Kvs,
    /// Relational store
    Decibel,
    /// Four-queue message broker
    MessageBroker,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        Self::Basecon,
        Self::Seco,
        Self::Redis,
        Self::Memcached,
        Self::Kvs,
        Self::Decibel,
        Self::MessageBroker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basecon => "basecon",
            Self::Seco => "seco",
            Self::Redis => "redis",
            Self::Memcached => "memcached",
            Self::Kvs => "kvs",
            Self::Decibel => "decibel",
            Self::MessageBroker => "message_broker",
        }
    }

    /// Whether the resource holds connections or mutable state that must
    /// not cross a fork. Only the base converter is pure.
    pub fn is_stateful(&self) -> bool {
        !matches!(self, Self::Basecon)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
