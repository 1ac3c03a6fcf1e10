//! In-process key-value backend using Moka.
//!
//! Values live in a `moka::future::Cache` with per-entry expiry; dependency
//! sets live in a plain locked map because Moka has no native set type (the
//! members must never expire ahead of a cascade walk that needs them).
//!
//! The failure switch exists for the outage tests: while enabled, every
//! operation reports a connection error, which is exactly what a dropped
//! TCP connection to a real backend looks like to the repository.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use parking_lot::Mutex;

use crate::backend::{KvBackend, KvError, KvResult};

/// Valor cacheado junto con su expiry individual.
#[derive(Debug, Clone)]
struct Entry {
    data: String,
    ttl: Duration,
}

struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Configuracion del backend en memoria.
#[derive(Debug, Clone)]
pub struct MemoryKvConfig {
    /// Maximo numero de entries (default: 10000)
    pub max_capacity: u64,
}

impl Default for MemoryKvConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

/// In-process `KvBackend` implementation.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use carta_cache::{KvBackend, MemoryKv};
///
/// # #[tokio::main]
/// # async fn main() {
/// let kv = MemoryKv::new();
/// kv.set("menu_1", "{}".to_string(), Duration::from_secs(60))
///     .await
///     .unwrap();
/// assert!(kv.get("menu_1").await.unwrap().is_some());
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryKv {
    values: Cache<String, Entry>,
    sets: Arc<Mutex<HashMap<String, HashSet<String>>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryKv {
    /// Crea un backend con la configuracion por defecto.
    pub fn new() -> Self {
        Self::with_config(MemoryKvConfig::default())
    }

    /// Crea un backend con la configuracion dada.
    pub fn with_config(config: MemoryKvConfig) -> Self {
        let values = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        Self {
            values,
            sets: Arc::new(Mutex::new(HashMap::new())),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simula una caida del backend (solo para tests).
    ///
    /// Mientras este activo, toda operacion falla con un error de conexion.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> KvResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(KvError::connection("simulated backend outage"));
        }
        Ok(())
    }

    /// Numero aproximado de valores cacheados.
    pub fn entry_count(&self) -> u64 {
        self.values.entry_count()
    }

    /// Fuerza la limpieza de entries expiradas (para tests).
    pub async fn run_pending_tasks(&self) {
        self.values.run_pending_tasks().await;
    }
}

impl Default for MemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvBackend for MemoryKv {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.check_reachable()?;
        Ok(self.values.get(key).await.map(|entry| entry.data))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> KvResult<()> {
        self.check_reachable()?;
        self.values
            .insert(key.to_string(), Entry { data: value, ttl })
            .await;
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> KvResult<()> {
        self.check_reachable()?;
        for key in keys {
            self.values.invalidate(key).await;
            // Una key puede nombrar tambien un set (deps:...)
            self.sets.lock().remove(key);
        }
        Ok(())
    }

    async fn sadd(&self, set_key: &str, member: &str) -> KvResult<()> {
        self.check_reachable()?;
        self.sets
            .lock()
            .entry(set_key.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    async fn srem(&self, set_key: &str, member: &str) -> KvResult<()> {
        self.check_reachable()?;
        if let Some(members) = self.sets.lock().get_mut(set_key) {
            members.remove(member);
        }
        Ok(())
    }

    async fn smembers(&self, set_key: &str) -> KvResult<HashSet<String>> {
        self.check_reachable()?;
        Ok(self.sets.lock().get(set_key).cloned().unwrap_or_default())
    }

    async fn flush_all(&self) -> KvResult<()> {
        self.check_reachable()?;
        self.values.invalidate_all();
        self.sets.lock().clear();
        Ok(())
    }
}
