//! # Carta Cache
//!
//! Cache-consistency layer for the Carta menu catalog.
//!
//! A key-value facade over entity data with bounded-lifetime entries and
//! hierarchy-aware invalidation, resilient to backend unavailability:
//!
//! - [`KvBackend`] is the backend contract (get / set-with-TTL / delete /
//!   set operations / flush); [`MemoryKv`] is the in-process implementation.
//! - [`CacheRepository`] owns key naming, serialization, the per-entity
//!   invalidation cascades, and dependency-set bookkeeping (`deps:{key}`
//!   sets let a cascade enumerate cached children without touching
//!   storage).
//! - Backend faults never escape: reads degrade to a miss, writes to a
//!   no-op, and the first operation after an outage pays a full flush.
//! - Cascade fan-out runs on a deferred worker; only the primary entity
//!   write blocks the caller.
//!
//! The cache is never the source of truth: it is rebuildable from empty at
//! any time at the cost of read latency.

pub mod backend;
pub mod health;
pub mod keys;
pub mod memory;
pub mod metrics;
pub mod queue;
pub mod repository;

// Re-exports
pub use backend::{KvBackend, KvError, KvResult};
pub use health::BackendHealth;
pub use memory::{MemoryKv, MemoryKvConfig};
pub use metrics::{CacheMetrics, register_cache_metrics};
pub use queue::QueueHandle;
pub use repository::{CacheConfig, CacheRepository};
