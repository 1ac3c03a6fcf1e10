//! Application state.

use std::sync::Arc;

use carta_cache::CacheRepository;
use carta_storage::{DishStore, FullMenuStore, MemoryStore, MenuStore, SubmenuStore};

use crate::services::{DishService, FullMenuService, MenuService, SubmenuService};
use crate::sync::TableReconciler;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    menus: Arc<MenuService>,
    submenus: Arc<SubmenuService>,
    dishes: Arc<DishService>,
    full_menu: Arc<FullMenuService>,
    table_sync: Option<Arc<TableReconciler>>,
}

impl AppState {
    /// Creates an AppState wiring each service over its store and the
    /// shared cache repository.
    pub fn new(
        menu_store: Arc<dyn MenuStore>,
        submenu_store: Arc<dyn SubmenuStore>,
        dish_store: Arc<dyn DishStore>,
        full_menu_store: Arc<dyn FullMenuStore>,
        cache: Arc<CacheRepository>,
    ) -> Self {
        Self {
            menus: Arc::new(MenuService::new(menu_store, cache.clone())),
            submenus: Arc::new(SubmenuService::new(submenu_store, cache.clone())),
            dishes: Arc::new(DishService::new(dish_store, cache.clone())),
            full_menu: Arc::new(FullMenuService::new(full_menu_store, cache)),
            table_sync: None,
        }
    }

    /// Creates an AppState over one in-memory store instance.
    pub fn from_memory(store: Arc<MemoryStore>, cache: Arc<CacheRepository>) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            cache,
        )
    }

    /// Attaches the table reconciler exposed through the admin endpoint.
    pub fn with_table_sync(mut self, reconciler: Arc<TableReconciler>) -> Self {
        self.table_sync = Some(reconciler);
        self
    }

    pub fn menus(&self) -> &MenuService {
        &self.menus
    }

    pub fn submenus(&self) -> &SubmenuService {
        &self.submenus
    }

    pub fn dishes(&self) -> &DishService {
        &self.dishes
    }

    pub fn full_menu(&self) -> &FullMenuService {
        &self.full_menu
    }

    pub fn table_sync(&self) -> Option<&Arc<TableReconciler>> {
        self.table_sync.as_ref()
    }

    /// Shared service handles for the reconciler wiring.
    pub fn service_handles(&self) -> (Arc<MenuService>, Arc<SubmenuService>, Arc<DishService>) {
        (
            self.menus.clone(),
            self.submenus.clone(),
            self.dishes.clone(),
        )
    }
}
