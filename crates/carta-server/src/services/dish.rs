//! Dish service.

use std::sync::Arc;

use tracing::debug;

use carta_cache::CacheRepository;
use carta_core::{Confirmation, Dish, DishId, DishPayload, MenuId, Result, SubmenuId};
use carta_storage::DishStore;

/// Read-through / write-through orchestration for dishes.
pub struct DishService {
    storage: Arc<dyn DishStore>,
    cache: Arc<CacheRepository>,
}

impl DishService {
    pub fn new(storage: Arc<dyn DishStore>, cache: Arc<CacheRepository>) -> Self {
        Self { storage, cache }
    }

    /// Lists a submenu's dishes; populates the collection key on a miss.
    pub async fn get_all(&self, menu_id: MenuId, submenu_id: SubmenuId) -> Result<Vec<Dish>> {
        if let Some(dishes) = self.cache.get_all_dishes(menu_id, submenu_id).await {
            return Ok(dishes);
        }
        let dishes = self.storage.get_all(menu_id, submenu_id).await?;
        self.cache.set_all_dishes(menu_id, submenu_id, &dishes).await;
        Ok(dishes)
    }

    /// Fetches one dish; populates its entry on a miss.
    pub async fn get(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        dish_id: DishId,
    ) -> Result<Dish> {
        if let Some(dish) = self.cache.get_dish(menu_id, submenu_id, dish_id).await {
            return Ok(dish);
        }
        let dish = self.storage.get(menu_id, submenu_id, dish_id).await?;
        self.cache.set_dish(&dish).await;
        Ok(dish)
    }

    /// Creates a dish in storage, then registers it in the cache.
    pub async fn create(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        payload: DishPayload,
    ) -> Result<Dish> {
        let dish = self.storage.create(menu_id, submenu_id, payload).await?;
        self.cache.create_dish(menu_id, &dish).await;
        debug!(submenu_id = %submenu_id, dish_id = %dish.id, "dish created");
        Ok(dish)
    }

    /// Updates a dish in storage, then refreshes its cache entry.
    pub async fn update(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        dish_id: DishId,
        payload: DishPayload,
    ) -> Result<Dish> {
        let dish = self.storage.update(menu_id, submenu_id, dish_id, payload).await?;
        self.cache.update_dish(menu_id, &dish).await;
        Ok(dish)
    }

    /// Deletes a dish in storage, then cascade-invalidates the cache.
    pub async fn delete(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        dish_id: DishId,
    ) -> Result<Confirmation> {
        let confirmation = self.storage.delete(menu_id, submenu_id, dish_id).await?;
        self.cache.delete_dish(menu_id, submenu_id, dish_id).await;
        debug!(submenu_id = %submenu_id, dish_id = %dish_id, "dish deleted");
        Ok(confirmation)
    }

    /// Fresh id enumeration straight from storage; never cached.
    pub async fn get_all_ids(&self, submenu_id: SubmenuId) -> Result<Vec<DishId>> {
        self.storage.get_all_ids(submenu_id).await
    }
}
