//! Menu service.

use std::sync::Arc;

use tracing::debug;

use carta_cache::CacheRepository;
use carta_core::{Confirmation, Menu, MenuId, MenuPayload, Result};
use carta_storage::MenuStore;

/// Read-through / write-through orchestration for menus.
pub struct MenuService {
    storage: Arc<dyn MenuStore>,
    cache: Arc<CacheRepository>,
}

impl MenuService {
    pub fn new(storage: Arc<dyn MenuStore>, cache: Arc<CacheRepository>) -> Self {
        Self { storage, cache }
    }

    /// Lists every menu; populates the listing key on a cache miss.
    pub async fn get_all(&self) -> Result<Vec<Menu>> {
        if let Some(menus) = self.cache.get_all_menus().await {
            return Ok(menus);
        }
        let menus = self.storage.get_all().await?;
        self.cache.set_all_menus(&menus).await;
        Ok(menus)
    }

    /// Fetches one menu; populates its entry on a cache miss.
    pub async fn get(&self, id: MenuId) -> Result<Menu> {
        if let Some(menu) = self.cache.get_menu(id).await {
            return Ok(menu);
        }
        let menu = self.storage.get(id).await?;
        self.cache.set_menu(&menu).await;
        Ok(menu)
    }

    /// Creates a menu in storage, then registers it in the cache.
    pub async fn create(&self, payload: MenuPayload) -> Result<Menu> {
        let menu = self.storage.create(payload).await?;
        self.cache.create_menu(&menu).await;
        debug!(menu_id = %menu.id, "menu created");
        Ok(menu)
    }

    /// Updates a menu in storage, then refreshes its cache entry.
    pub async fn update(&self, id: MenuId, payload: MenuPayload) -> Result<Menu> {
        let menu = self.storage.update(id, payload).await?;
        self.cache.update_menu(&menu).await;
        Ok(menu)
    }

    /// Deletes a menu in storage, then cascade-invalidates the cache.
    pub async fn delete(&self, id: MenuId) -> Result<Confirmation> {
        let confirmation = self.storage.delete(id).await?;
        self.cache.delete_menu(id).await;
        debug!(menu_id = %id, "menu deleted");
        Ok(confirmation)
    }

    /// Fresh id enumeration straight from storage; never cached, the table
    /// sync needs a guaranteed-complete snapshot.
    pub async fn get_all_ids(&self) -> Result<Vec<MenuId>> {
        self.storage.get_all_ids().await
    }
}
