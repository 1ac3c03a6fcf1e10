//! Cache metrics recording.

use metrics::{counter, gauge};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!("carta_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!("carta_cache_misses_total", "Total number of cache misses");
    metrics::describe_counter!(
        "carta_cache_invalidations_total",
        "Total number of cache keys scheduled for invalidation"
    );
    metrics::describe_counter!(
        "carta_cache_degraded_total",
        "Times the backend was seen unreachable"
    );
    metrics::describe_gauge!("carta_cache_entries", "Current number of entries in cache");
}

/// Recorder de metricas de cache.
/// Usa atomic counters internos para maximo rendimiento.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("carta_cache_hits_total").increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("carta_cache_misses_total").increment(1);
    }

    /// Registra keys programadas para invalidacion
    pub fn record_invalidation(&self, count: usize) {
        counter!("carta_cache_invalidations_total").increment(count as u64);
    }

    /// Registra una caida del backend
    pub fn record_degraded(&self) {
        counter!("carta_cache_degraded_total").increment(1);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: u64) {
        gauge!("carta_cache_entries").set(count as f64);
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let misses = self.misses.load(Ordering::Relaxed) as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}
