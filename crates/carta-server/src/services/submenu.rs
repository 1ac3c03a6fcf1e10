//! Submenu service.

use std::sync::Arc;

use tracing::debug;

use carta_cache::CacheRepository;
use carta_core::{Confirmation, MenuId, Result, Submenu, SubmenuId, SubmenuPayload};
use carta_storage::SubmenuStore;

/// Read-through / write-through orchestration for submenus.
pub struct SubmenuService {
    storage: Arc<dyn SubmenuStore>,
    cache: Arc<CacheRepository>,
}

impl SubmenuService {
    pub fn new(storage: Arc<dyn SubmenuStore>, cache: Arc<CacheRepository>) -> Self {
        Self { storage, cache }
    }

    /// Lists a menu's submenus; populates the collection key on a miss.
    pub async fn get_all(&self, menu_id: MenuId) -> Result<Vec<Submenu>> {
        if let Some(submenus) = self.cache.get_all_submenus(menu_id).await {
            return Ok(submenus);
        }
        let submenus = self.storage.get_all(menu_id).await?;
        self.cache.set_all_submenus(menu_id, &submenus).await;
        Ok(submenus)
    }

    /// Fetches one submenu; populates its entry on a miss.
    pub async fn get(&self, menu_id: MenuId, submenu_id: SubmenuId) -> Result<Submenu> {
        if let Some(submenu) = self.cache.get_submenu(menu_id, submenu_id).await {
            return Ok(submenu);
        }
        let submenu = self.storage.get(menu_id, submenu_id).await?;
        self.cache.set_submenu(&submenu).await;
        Ok(submenu)
    }

    /// Creates a submenu in storage, then registers it in the cache.
    pub async fn create(&self, menu_id: MenuId, payload: SubmenuPayload) -> Result<Submenu> {
        let submenu = self.storage.create(menu_id, payload).await?;
        self.cache.create_submenu(&submenu).await;
        debug!(menu_id = %menu_id, submenu_id = %submenu.id, "submenu created");
        Ok(submenu)
    }

    /// Updates a submenu in storage, then refreshes its cache entry.
    pub async fn update(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        payload: SubmenuPayload,
    ) -> Result<Submenu> {
        let submenu = self.storage.update(menu_id, submenu_id, payload).await?;
        self.cache.update_submenu(&submenu).await;
        Ok(submenu)
    }

    /// Deletes a submenu in storage, then cascade-invalidates the cache.
    pub async fn delete(&self, menu_id: MenuId, submenu_id: SubmenuId) -> Result<Confirmation> {
        let confirmation = self.storage.delete(menu_id, submenu_id).await?;
        self.cache.delete_submenu(menu_id, submenu_id).await;
        debug!(menu_id = %menu_id, submenu_id = %submenu_id, "submenu deleted");
        Ok(confirmation)
    }

    /// Fresh id enumeration straight from storage; never cached.
    pub async fn get_all_ids(&self, menu_id: MenuId) -> Result<Vec<SubmenuId>> {
        self.storage.get_all_ids(menu_id).await
    }
}
