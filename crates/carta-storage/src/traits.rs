//! Storage trait definitions.
//!
//! These traits are the contract the services consume. They abstract over
//! the authoritative store (relational database, in-memory fixture, ...) so
//! the cache and service layers never know the underlying engine.
//!
//! Every implementation must provide transactional CRUD: uniqueness
//! constraints checked before any mutation, and parent deletes cascading to
//! all descendants.

use async_trait::async_trait;

use carta_core::{
    Confirmation, Dish, DishId, DishPayload, FullMenu, Menu, MenuId, MenuPayload, Result, Submenu,
    SubmenuId, SubmenuPayload,
};

/// Authoritative store for menus.
///
/// # Errors
///
/// - `CartaError::NotFound` when the requested menu does not exist
/// - `CartaError::Conflict` on a duplicate id or duplicate global title
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Returns every menu with derived counters, in insertion order.
    async fn get_all(&self) -> Result<Vec<Menu>>;

    /// Returns one menu with derived counters.
    async fn get(&self, id: MenuId) -> Result<Menu>;

    /// Inserts a new menu. The payload id is honored when present.
    async fn create(&self, payload: MenuPayload) -> Result<Menu>;

    /// Rewrites title and description of an existing menu.
    async fn update(&self, id: MenuId, payload: MenuPayload) -> Result<Menu>;

    /// Removes a menu and every descendant. No-op (still confirmed) when
    /// the menu is already absent.
    async fn delete(&self, id: MenuId) -> Result<Confirmation>;

    /// Fresh enumeration of every menu id. Used by the table sync.
    async fn get_all_ids(&self) -> Result<Vec<MenuId>>;
}

/// Authoritative store for submenus, scoped under a parent menu.
#[async_trait]
pub trait SubmenuStore: Send + Sync {
    async fn get_all(&self, menu_id: MenuId) -> Result<Vec<Submenu>>;

    async fn get(&self, menu_id: MenuId, submenu_id: SubmenuId) -> Result<Submenu>;

    /// Fails with NotFound when the parent menu is absent; title uniqueness
    /// is checked within the parent menu only.
    async fn create(&self, menu_id: MenuId, payload: SubmenuPayload) -> Result<Submenu>;

    async fn update(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        payload: SubmenuPayload,
    ) -> Result<Submenu>;

    async fn delete(&self, menu_id: MenuId, submenu_id: SubmenuId) -> Result<Confirmation>;

    async fn get_all_ids(&self, menu_id: MenuId) -> Result<Vec<SubmenuId>>;
}

/// Authoritative store for dishes, scoped under a parent submenu.
#[async_trait]
pub trait DishStore: Send + Sync {
    async fn get_all(&self, menu_id: MenuId, submenu_id: SubmenuId) -> Result<Vec<Dish>>;

    async fn get(&self, menu_id: MenuId, submenu_id: SubmenuId, dish_id: DishId) -> Result<Dish>;

    /// Fails with NotFound when the parent submenu is absent; title
    /// uniqueness is checked within the parent submenu only.
    async fn create(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        payload: DishPayload,
    ) -> Result<Dish>;

    async fn update(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        dish_id: DishId,
        payload: DishPayload,
    ) -> Result<Dish>;

    async fn delete(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        dish_id: DishId,
    ) -> Result<Confirmation>;

    async fn get_all_ids(&self, submenu_id: SubmenuId) -> Result<Vec<DishId>>;
}

/// Read-only access to the denormalized export.
#[async_trait]
pub trait FullMenuStore: Send + Sync {
    /// Returns the whole hierarchy nested, one node per menu.
    async fn get_full(&self) -> Result<FullMenu>;
}
