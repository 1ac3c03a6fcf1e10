//! Hierarchy-aware cache repository.
//!
//! Owns serialization, key naming, dependency-set bookkeeping and the
//! per-entity invalidation cascades over a [`KvBackend`]. Every operation
//! goes through one degraded-mode wrapper: backend faults are absorbed here
//! and never reach a caller — reads degrade to a miss, writes to a no-op,
//! and entry TTL bounds any staleness left behind.
//!
//! Invalidation scope per operation follows the counter rule: create and
//! delete change derived counters at every ancestor level and therefore fan
//! up to the ancestors and the collection keys; update is a rename, touches
//! no counter, and only drops the entity's own collection key plus the full
//! menu export. That asymmetry is deliberate; do not widen it.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use carta_core::{Dish, DishId, FullMenu, Menu, MenuId, Submenu, SubmenuId};

use crate::backend::{KvBackend, KvResult};
use crate::health::BackendHealth;
use crate::keys::{self, ALL_MENUS_KEY, FULL_MENU_KEY};
use crate::metrics::CacheMetrics;
use crate::queue::{self, InvalidationQueue, QueueHandle};

/// Configuracion del repositorio de cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL en segundos para toda entry (default: 3600 = 1 hora)
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 3600 }
    }
}

/// Cache facade over the menu hierarchy.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use carta_cache::{CacheConfig, CacheRepository, MemoryKv};
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = CacheRepository::new(Arc::new(MemoryKv::new()), CacheConfig::default());
/// if let Some(menus) = repo.get_all_menus().await {
///     println!("{} menus cached", menus.len());
/// }
/// # }
/// ```
pub struct CacheRepository {
    backend: Arc<dyn KvBackend>,
    health: Arc<BackendHealth>,
    queue: InvalidationQueue,
    // Mantiene vivo el worker; al soltar el repo el worker se apaga
    _worker: QueueHandle,
    ttl: Duration,
    metrics: CacheMetrics,
}

impl CacheRepository {
    /// Creates a repository over the given backend and starts its
    /// invalidation worker. Must be called within a Tokio runtime.
    pub fn new(backend: Arc<dyn KvBackend>, config: CacheConfig) -> Self {
        let health = Arc::new(BackendHealth::new());
        let (queue, worker) = queue::start(backend.clone(), health.clone());

        Self {
            backend,
            health,
            queue,
            _worker: worker,
            ttl: Duration::from_secs(config.ttl_seconds),
            metrics: CacheMetrics::new(),
        }
    }

    /// Creates a repository with the default configuration.
    pub fn with_defaults(backend: Arc<dyn KvBackend>) -> Self {
        Self::new(backend, CacheConfig::default())
    }

    /// Returns true while the backend is pending degraded-mode recovery.
    pub fn is_degraded(&self) -> bool {
        self.health.is_disconnected()
    }

    /// Retorna las metricas para acceso externo.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Waits until every deferred invalidation enqueued so far has run.
    ///
    /// Meant for tests and graceful shutdown; requests never wait on it.
    pub async fn drain(&self) {
        self.queue.drain().await;
    }

    // ============================================
    // Degraded-mode wrapper
    // ============================================

    /// Runs one backend interaction under the disconnect policy.
    ///
    /// If a disconnect was recorded, the whole database is flushed first
    /// (entries written around an outage cannot be trusted) and the flag is
    /// cleared optimistically. A timeout or connection error sets the flag
    /// again and resolves to `None`; the error never propagates.
    async fn guarded<T, F, Fut>(&self, op: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = KvResult<T>>,
    {
        if self.health.take_disconnected() {
            debug!("Backend was disconnected, flushing before reuse");
            if let Err(e) = self.backend.flush_all().await {
                warn!(error = %e, "Cache flush after reconnect failed");
                self.health.mark_disconnected();
                self.metrics.record_degraded();
                return None;
            }
        }

        match op().await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Cache backend unavailable, degrading to storage");
                self.health.mark_disconnected();
                self.metrics.record_degraded();
                None
            },
        }
    }

    fn queue_delete(&self, to_delete: Vec<String>) {
        self.metrics.record_invalidation(to_delete.len());
        self.queue.delete_keys(to_delete);
    }

    fn track<T>(&self, result: Option<T>) -> Option<T> {
        match result {
            Some(value) => {
                self.metrics.record_hit();
                Some(value)
            },
            None => {
                self.metrics.record_miss();
                None
            },
        }
    }

    // ============================================
    // Menu
    // ============================================

    /// Point lookup of one menu.
    pub async fn get_menu(&self, menu_id: MenuId) -> Option<Menu> {
        let key = keys::menu_key(menu_id);
        let raw = self
            .guarded(|| async { self.backend.get(&key).await })
            .await
            .flatten();
        self.track(raw.and_then(decode))
    }

    /// Stores one menu entry.
    pub async fn set_menu(&self, menu: &Menu) {
        let Some(payload) = encode(menu) else { return };
        let key = keys::menu_key(menu.id);
        self.guarded(|| async { self.backend.set(&key, payload.clone(), self.ttl).await })
            .await;
    }

    /// Lookup of the whole menu listing.
    pub async fn get_all_menus(&self) -> Option<Vec<Menu>> {
        let raw = self
            .guarded(|| async { self.backend.get(ALL_MENUS_KEY).await })
            .await
            .flatten();
        self.track(raw.and_then(decode))
    }

    /// Stores the whole menu listing.
    pub async fn set_all_menus(&self, menus: &[Menu]) {
        let Some(payload) = encode(&menus) else { return };
        self.guarded(|| async {
            self.backend
                .set(ALL_MENUS_KEY, payload.clone(), self.ttl)
                .await
        })
        .await;
    }

    /// Registers a freshly created menu.
    ///
    /// The new menu invalidates any cached complete listing; its own entry
    /// is written synchronously so an immediate read-back hits.
    pub async fn create_menu(&self, menu: &Menu) {
        self.queue_delete(vec![ALL_MENUS_KEY.to_string(), FULL_MENU_KEY.to_string()]);
        self.set_menu(menu).await;
    }

    /// Overwrites an updated menu. Same invalidation scope as create.
    pub async fn update_menu(&self, menu: &Menu) {
        self.queue_delete(vec![ALL_MENUS_KEY.to_string(), FULL_MENU_KEY.to_string()]);
        self.set_menu(menu).await;
    }

    /// Cascade-invalidates a deleted menu and every cached descendant.
    ///
    /// The dependency sets are walked here (two levels) so no storage
    /// round-trip is needed to enumerate cached children; the collected
    /// keys are deleted by the deferred worker.
    pub async fn delete_menu(&self, menu_id: MenuId) {
        let mk = keys::menu_key(menu_id);
        let deps_mk = keys::deps_of(&mk);

        let walked = self
            .guarded(|| async {
                let mut to_delete = vec![
                    ALL_MENUS_KEY.to_string(),
                    mk.clone(),
                    keys::submenus_of(&mk),
                    deps_mk.clone(),
                    FULL_MENU_KEY.to_string(),
                ];
                for sk in self.backend.smembers(&deps_mk).await? {
                    for dk in self.backend.smembers(&keys::deps_of(&sk)).await? {
                        to_delete.push(dk);
                    }
                    to_delete.push(keys::dishes_of(&mk, &sk));
                    to_delete.push(keys::deps_of(&sk));
                    to_delete.push(sk);
                }
                Ok(to_delete)
            })
            .await;

        if let Some(to_delete) = walked {
            self.queue_delete(to_delete);
        }
    }

    // ============================================
    // Submenu
    // ============================================

    /// Point lookup of one submenu, gated by the parent's dependency set.
    ///
    /// A blob under the submenu key whose parent no longer tracks it is
    /// treated as a miss: the parent may have been deleted and the key
    /// reused.
    pub async fn get_submenu(&self, menu_id: MenuId, submenu_id: SubmenuId) -> Option<Submenu> {
        let mk = keys::menu_key(menu_id);
        let sk = keys::submenu_key(submenu_id);
        let raw = self
            .guarded(|| async {
                let members = self.backend.smembers(&keys::deps_of(&mk)).await?;
                if !members.contains(&sk) {
                    return Ok(None);
                }
                self.backend.get(&sk).await
            })
            .await
            .flatten();
        self.track(raw.and_then(decode))
    }

    /// Stores one submenu entry.
    pub async fn set_submenu(&self, submenu: &Submenu) {
        let Some(payload) = encode(submenu) else { return };
        let key = keys::submenu_key(submenu.id);
        self.guarded(|| async { self.backend.set(&key, payload.clone(), self.ttl).await })
            .await;
    }

    /// Lookup of a menu's submenu listing.
    pub async fn get_all_submenus(&self, menu_id: MenuId) -> Option<Vec<Submenu>> {
        let key = keys::submenus_of(&keys::menu_key(menu_id));
        let raw = self
            .guarded(|| async { self.backend.get(&key).await })
            .await
            .flatten();
        self.track(raw.and_then(decode))
    }

    /// Stores a menu's submenu listing.
    pub async fn set_all_submenus(&self, menu_id: MenuId, submenus: &[Submenu]) {
        let Some(payload) = encode(&submenus) else {
            return;
        };
        let key = keys::submenus_of(&keys::menu_key(menu_id));
        self.guarded(|| async { self.backend.set(&key, payload.clone(), self.ttl).await })
            .await;
    }

    /// Registers a freshly created submenu.
    ///
    /// The parent menu's counters changed, so the fan-out covers the
    /// submenu collection, the menu entry, the menu listing and the export.
    pub async fn create_submenu(&self, submenu: &Submenu) {
        let mk = keys::menu_key(submenu.menu_id);
        let sk = keys::submenu_key(submenu.id);

        self.queue_delete(vec![
            keys::submenus_of(&mk),
            mk.clone(),
            ALL_MENUS_KEY.to_string(),
            FULL_MENU_KEY.to_string(),
        ]);

        let Some(payload) = encode(submenu) else {
            return;
        };
        self.guarded(|| async {
            self.backend.sadd(&keys::deps_of(&mk), &sk).await?;
            self.backend.set(&sk, payload.clone(), self.ttl).await
        })
        .await;
    }

    /// Overwrites an updated submenu.
    ///
    /// A rename cannot change any counter, so the menu entry and the menu
    /// listing survive; only the submenu collection and the export drop.
    pub async fn update_submenu(&self, submenu: &Submenu) {
        let mk = keys::menu_key(submenu.menu_id);

        self.queue_delete(vec![keys::submenus_of(&mk), FULL_MENU_KEY.to_string()]);
        self.set_submenu(submenu).await;
    }

    /// Cascade-invalidates a deleted submenu and its cached dishes.
    pub async fn delete_submenu(&self, menu_id: MenuId, submenu_id: SubmenuId) {
        let mk = keys::menu_key(menu_id);
        let sk = keys::submenu_key(submenu_id);
        let deps_sk = keys::deps_of(&sk);

        let walked = self
            .guarded(|| async {
                let mut to_delete = vec![
                    mk.clone(),
                    ALL_MENUS_KEY.to_string(),
                    sk.clone(),
                    keys::submenus_of(&mk),
                    deps_sk.clone(),
                    keys::dishes_of(&mk, &sk),
                    FULL_MENU_KEY.to_string(),
                ];
                for dk in self.backend.smembers(&deps_sk).await? {
                    to_delete.push(dk);
                }
                Ok(to_delete)
            })
            .await;

        if let Some(to_delete) = walked {
            self.queue.remove_member(keys::deps_of(&mk), sk);
            self.queue_delete(to_delete);
        }
    }

    // ============================================
    // Dish
    // ============================================

    /// Point lookup of one dish, gated by both ancestor dependency sets.
    pub async fn get_dish(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        dish_id: DishId,
    ) -> Option<Dish> {
        let mk = keys::menu_key(menu_id);
        let sk = keys::submenu_key(submenu_id);
        let dk = keys::dish_key(dish_id);
        let raw = self
            .guarded(|| async {
                let submenus = self.backend.smembers(&keys::deps_of(&mk)).await?;
                if !submenus.contains(&sk) {
                    return Ok(None);
                }
                let dishes = self.backend.smembers(&keys::deps_of(&sk)).await?;
                if !dishes.contains(&dk) {
                    return Ok(None);
                }
                self.backend.get(&dk).await
            })
            .await
            .flatten();
        self.track(raw.and_then(decode))
    }

    /// Stores one dish entry.
    pub async fn set_dish(&self, dish: &Dish) {
        let Some(payload) = encode(dish) else { return };
        let key = keys::dish_key(dish.id);
        self.guarded(|| async { self.backend.set(&key, payload.clone(), self.ttl).await })
            .await;
    }

    /// Lookup of a submenu's dish listing, gated by the menu's dependency
    /// set.
    pub async fn get_all_dishes(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
    ) -> Option<Vec<Dish>> {
        let mk = keys::menu_key(menu_id);
        let sk = keys::submenu_key(submenu_id);
        let raw = self
            .guarded(|| async {
                let members = self.backend.smembers(&keys::deps_of(&mk)).await?;
                if !members.contains(&sk) {
                    return Ok(None);
                }
                self.backend.get(&keys::dishes_of(&mk, &sk)).await
            })
            .await
            .flatten();
        self.track(raw.and_then(decode))
    }

    /// Stores a submenu's dish listing.
    pub async fn set_all_dishes(&self, menu_id: MenuId, submenu_id: SubmenuId, dishes: &[Dish]) {
        let Some(payload) = encode(&dishes) else {
            return;
        };
        let key = keys::dishes_of(&keys::menu_key(menu_id), &keys::submenu_key(submenu_id));
        self.guarded(|| async { self.backend.set(&key, payload.clone(), self.ttl).await })
            .await;
    }

    /// Registers a freshly created dish.
    ///
    /// Derived counters live at both ancestor levels, so the fan-out covers
    /// the dish collection, the submenu entry, the submenu collection, the
    /// menu entry, the menu listing and the export.
    pub async fn create_dish(&self, menu_id: MenuId, dish: &Dish) {
        let mk = keys::menu_key(menu_id);
        let sk = keys::submenu_key(dish.submenu_id);
        let dk = keys::dish_key(dish.id);

        self.queue_delete(vec![
            keys::dishes_of(&mk, &sk),
            sk.clone(),
            keys::submenus_of(&mk),
            mk.clone(),
            ALL_MENUS_KEY.to_string(),
            FULL_MENU_KEY.to_string(),
        ]);

        let Some(payload) = encode(dish) else { return };
        self.guarded(|| async {
            self.backend.sadd(&keys::deps_of(&sk), &dk).await?;
            self.backend.set(&dk, payload.clone(), self.ttl).await
        })
        .await;
    }

    /// Overwrites an updated dish. Counters are untouched by a rename, so
    /// only the dish collection and the export drop.
    pub async fn update_dish(&self, menu_id: MenuId, dish: &Dish) {
        let mk = keys::menu_key(menu_id);
        let sk = keys::submenu_key(dish.submenu_id);

        self.queue_delete(vec![keys::dishes_of(&mk, &sk), FULL_MENU_KEY.to_string()]);
        self.set_dish(dish).await;
    }

    /// Cascade-invalidates a deleted dish and its ancestors' derived views.
    pub async fn delete_dish(&self, menu_id: MenuId, submenu_id: SubmenuId, dish_id: DishId) {
        let mk = keys::menu_key(menu_id);
        let sk = keys::submenu_key(submenu_id);
        let dk = keys::dish_key(dish_id);

        self.queue.remove_member(keys::deps_of(&sk), dk.clone());
        self.queue_delete(vec![
            dk,
            keys::dishes_of(&mk, &sk),
            sk,
            keys::submenus_of(&mk),
            mk,
            ALL_MENUS_KEY.to_string(),
            FULL_MENU_KEY.to_string(),
        ]);
    }

    // ============================================
    // Full menu
    // ============================================

    /// Lookup of the denormalized export blob.
    pub async fn get_full_menu(&self) -> Option<FullMenu> {
        let raw = self
            .guarded(|| async { self.backend.get(FULL_MENU_KEY).await })
            .await
            .flatten();
        self.track(raw.and_then(decode))
    }

    /// Stores the denormalized export blob.
    pub async fn set_full_menu(&self, full_menu: &FullMenu) {
        let Some(payload) = encode(full_menu) else {
            return;
        };
        self.guarded(|| async {
            self.backend
                .set(FULL_MENU_KEY, payload.clone(), self.ttl)
                .await
        })
        .await;
    }
}

fn encode<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!(error = %e, "Failed to serialize cache value, skipping write");
            None
        },
    }
}

fn decode<T: DeserializeOwned>(raw: String) -> Option<T> {
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            // Una entry corrupta equivale a un miss
            warn!(error = %e, "Failed to deserialize cache value, treating as miss");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKv;
    use carta_core::{MenuNode, Price};

    fn repo_with_kv() -> (CacheRepository, Arc<MemoryKv>) {
        let kv = Arc::new(MemoryKv::new());
        let repo = CacheRepository::new(kv.clone(), CacheConfig::default());
        (repo, kv)
    }

    fn sample_menu() -> Menu {
        Menu {
            id: MenuId::random(),
            title: "Carta".into(),
            description: "principal".into(),
            submenus_count: 0,
            dishes_count: 0,
        }
    }

    fn sample_submenu(menu_id: MenuId) -> Submenu {
        Submenu {
            id: SubmenuId::random(),
            menu_id,
            title: "Entrantes".into(),
            description: "".into(),
            dishes_count: 0,
        }
    }

    fn sample_dish(submenu_id: SubmenuId) -> Dish {
        Dish {
            id: DishId::random(),
            submenu_id,
            title: "Sopa".into(),
            description: "del dia".into(),
            price: Price::from_hundredths(450),
        }
    }

    #[tokio::test]
    async fn test_menu_roundtrip() {
        let (repo, _kv) = repo_with_kv();
        let menu = sample_menu();

        repo.set_menu(&menu).await;
        assert_eq!(repo.get_menu(menu.id).await, Some(menu));
    }

    #[tokio::test]
    async fn test_create_menu_invalidates_listings() {
        let (repo, _kv) = repo_with_kv();
        repo.set_all_menus(&[sample_menu()]).await;
        repo.set_full_menu(&Vec::<MenuNode>::new()).await;

        repo.create_menu(&sample_menu()).await;
        repo.drain().await;

        assert_eq!(repo.get_all_menus().await, None);
        assert_eq!(repo.get_full_menu().await, None);
    }

    #[tokio::test]
    async fn test_submenu_point_read_gated_by_dependency_set() {
        let (repo, _kv) = repo_with_kv();
        let menu = sample_menu();
        let submenu = sample_submenu(menu.id);

        // Escrito sin registrar en deps: el blob existe pero no se sirve
        repo.set_submenu(&submenu).await;
        assert_eq!(repo.get_submenu(menu.id, submenu.id).await, None);

        // create_submenu registra la dependencia y el blob se sirve
        repo.create_submenu(&submenu).await;
        assert_eq!(
            repo.get_submenu(menu.id, submenu.id).await,
            Some(submenu.clone())
        );
    }

    #[tokio::test]
    async fn test_dish_point_read_needs_both_ancestors() {
        let (repo, _kv) = repo_with_kv();
        let menu = sample_menu();
        let submenu = sample_submenu(menu.id);
        let dish = sample_dish(submenu.id);

        repo.create_dish(menu.id, &dish).await;
        // El submenu nunca se registro bajo el menu: miss
        assert_eq!(repo.get_dish(menu.id, submenu.id, dish.id).await, None);

        repo.create_submenu(&submenu).await;
        assert_eq!(
            repo.get_dish(menu.id, submenu.id, dish.id).await,
            Some(dish)
        );
    }

    #[tokio::test]
    async fn test_create_submenu_fans_up_to_menu() {
        let (repo, _kv) = repo_with_kv();
        let menu = sample_menu();
        repo.set_menu(&menu).await;
        repo.set_all_menus(&[menu.clone()]).await;

        repo.create_submenu(&sample_submenu(menu.id)).await;
        repo.drain().await;

        // Los counters del menu cambiaron: entry y listado invalidados
        assert_eq!(repo.get_menu(menu.id).await, None);
        assert_eq!(repo.get_all_menus().await, None);
    }

    #[tokio::test]
    async fn test_update_submenu_preserves_menu_entry() {
        let (repo, _kv) = repo_with_kv();
        let menu = sample_menu();
        let mut submenu = sample_submenu(menu.id);

        repo.create_submenu(&submenu).await;
        repo.drain().await;
        repo.set_menu(&menu).await;
        repo.set_all_menus(&[menu.clone()]).await;
        repo.set_all_submenus(menu.id, &[submenu.clone()]).await;

        submenu.title = "Postres".into();
        repo.update_submenu(&submenu).await;
        repo.drain().await;

        // Un rename no toca counters: el menu sobrevive, el listado de
        // submenus y el export caen
        assert_eq!(repo.get_menu(menu.id).await, Some(menu.clone()));
        assert_eq!(repo.get_all_menus().await, Some(vec![menu.clone()]));
        assert_eq!(repo.get_all_submenus(menu.id).await, None);
        assert_eq!(repo.get_submenu(submenu.menu_id, submenu.id).await, Some(submenu));
    }

    #[tokio::test]
    async fn test_delete_menu_cascades_to_cached_descendants() {
        let (repo, _kv) = repo_with_kv();
        let menu = sample_menu();
        let submenu = sample_submenu(menu.id);
        let dish = sample_dish(submenu.id);

        repo.create_menu(&menu).await;
        repo.create_submenu(&submenu).await;
        repo.create_dish(menu.id, &dish).await;
        repo.set_all_submenus(menu.id, &[submenu.clone()]).await;
        repo.set_all_dishes(menu.id, submenu.id, &[dish.clone()]).await;
        repo.drain().await;

        repo.delete_menu(menu.id).await;
        repo.drain().await;

        assert_eq!(repo.get_menu(menu.id).await, None);
        assert_eq!(repo.get_submenu(menu.id, submenu.id).await, None);
        assert_eq!(repo.get_dish(menu.id, submenu.id, dish.id).await, None);
        assert_eq!(repo.get_all_submenus(menu.id).await, None);
        assert_eq!(repo.get_all_dishes(menu.id, submenu.id).await, None);
    }

    #[tokio::test]
    async fn test_delete_submenu_unregisters_from_parent() {
        let (repo, kv) = repo_with_kv();
        let menu = sample_menu();
        let submenu = sample_submenu(menu.id);
        let dish = sample_dish(submenu.id);

        repo.create_submenu(&submenu).await;
        repo.create_dish(menu.id, &dish).await;
        repo.drain().await;

        repo.delete_submenu(menu.id, submenu.id).await;
        repo.drain().await;

        assert_eq!(repo.get_submenu(menu.id, submenu.id).await, None);
        assert_eq!(repo.get_dish(menu.id, submenu.id, dish.id).await, None);

        let deps = kv
            .smembers(&keys::deps_of(&keys::menu_key(menu.id)))
            .await
            .unwrap();
        assert!(!deps.contains(&keys::submenu_key(submenu.id)));
    }

    #[tokio::test]
    async fn test_update_dish_touches_only_collection_and_export() {
        let (repo, _kv) = repo_with_kv();
        let menu = sample_menu();
        let submenu = sample_submenu(menu.id);
        let mut dish = sample_dish(submenu.id);

        repo.create_submenu(&submenu).await;
        repo.create_dish(menu.id, &dish).await;
        repo.drain().await;
        repo.set_menu(&menu).await;
        repo.set_submenu(&submenu).await;
        repo.set_all_dishes(menu.id, submenu.id, &[dish.clone()]).await;

        dish.price = Price::from_hundredths(999);
        repo.update_dish(menu.id, &dish).await;
        repo.drain().await;

        assert_eq!(repo.get_all_dishes(menu.id, submenu.id).await, None);
        assert_eq!(repo.get_menu(menu.id).await, Some(menu.clone()));
        assert_eq!(repo.get_submenu(menu.id, submenu.id).await, Some(submenu));
        assert_eq!(repo.get_dish(menu.id, dish.submenu_id, dish.id).await, Some(dish));
    }

    #[tokio::test]
    async fn test_outage_degrades_to_miss_and_recovers_with_flush() {
        let (repo, kv) = repo_with_kv();
        let menu = sample_menu();

        repo.set_menu(&menu).await;
        assert_eq!(repo.get_menu(menu.id).await, Some(menu.clone()));

        // Caida: todo lee como miss, nada explota
        kv.set_failing(true);
        assert_eq!(repo.get_menu(menu.id).await, None);
        assert!(repo.is_degraded());
        repo.set_menu(&menu).await; // write silencioso

        // Recuperacion: la primera operacion paga un flush completo
        kv.set_failing(false);
        assert_eq!(repo.get_menu(menu.id).await, None);
        assert!(!repo.is_degraded());

        // Y despues el cacheo funciona con normalidad
        repo.set_menu(&menu).await;
        assert_eq!(repo.get_menu(menu.id).await, Some(menu));
    }

    #[tokio::test]
    async fn test_hit_and_miss_metrics() {
        let (repo, _kv) = repo_with_kv();
        let menu = sample_menu();

        repo.get_menu(menu.id).await;
        repo.set_menu(&menu).await;
        repo.get_menu(menu.id).await;

        assert_eq!(repo.metrics().misses(), 1);
        assert_eq!(repo.metrics().hits(), 1);
    }
}
