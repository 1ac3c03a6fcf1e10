//! Key-value backend contract.
//!
//! The cache layer talks to a single networked key-value store through this
//! trait. The backend may become unreachable at any time; every operation
//! reports that as `KvError::Timeout` or `KvError::Connection`, and the
//! repository above absorbs both (degraded mode) instead of propagating.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

/// Errors a key-value backend can report.
///
/// Both variants are treated identically by the repository: mark the
/// backend unhealthy and fall open to the authoritative store.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// The operation did not complete within the client timeout.
    #[error("backend operation timed out")]
    Timeout,

    /// The backend is unreachable.
    #[error("backend connection failed: {0}")]
    Connection(String),
}

impl KvError {
    /// Creates a new connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }
}

/// Type alias for backend results.
pub type KvResult<T> = Result<T, KvError>;

/// A networked key-value store with TTL'd values and membership sets.
///
/// The operation set is exactly what the cache repository consumes:
/// point get/set/delete for serialized blobs, set-add/remove/members for
/// the dependency indexes, and a whole-database flush for degraded-mode
/// recovery.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Point lookup. `Ok(None)` on a plain miss.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Stores a value with the given expiry.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> KvResult<()>;

    /// Deletes every listed key. Missing keys are not an error.
    async fn delete(&self, keys: &[String]) -> KvResult<()>;

    /// Adds a member to a set, creating the set if needed.
    async fn sadd(&self, set_key: &str, member: &str) -> KvResult<()>;

    /// Removes a member from a set. Missing members are not an error.
    async fn srem(&self, set_key: &str, member: &str) -> KvResult<()>;

    /// Returns the members of a set; empty when the set does not exist.
    async fn smembers(&self, set_key: &str) -> KvResult<HashSet<String>>;

    /// Drops every value and every set.
    async fn flush_all(&self) -> KvResult<()>;
}
