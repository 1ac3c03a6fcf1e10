//! In-memory storage backend.
//!
//! Stands in for the relational collaborator: one `RwLock` over all three
//! tables gives every operation the whole-operation atomicity the cache
//! layer assumes, uniqueness checks run before any mutation, and parent
//! deletes cascade to all descendants. Counters are computed at read time,
//! never stored.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use carta_core::{
    CartaError, Confirmation, ConflictField, Dish, DishId, DishNode, DishPayload, EntityKind,
    FullMenu, Menu, MenuId, MenuNode, MenuPayload, Price, Result, Submenu, SubmenuId, SubmenuNode,
    SubmenuPayload,
};

use crate::traits::{DishStore, FullMenuStore, MenuStore, SubmenuStore};

#[derive(Debug, Clone)]
struct MenuRow {
    id: MenuId,
    title: String,
    description: String,
    seq: u64,
}

#[derive(Debug, Clone)]
struct SubmenuRow {
    id: SubmenuId,
    menu_id: MenuId,
    title: String,
    description: String,
    seq: u64,
}

#[derive(Debug, Clone)]
struct DishRow {
    id: DishId,
    submenu_id: SubmenuId,
    title: String,
    description: String,
    price: Price,
    seq: u64,
}

#[derive(Debug, Default)]
struct Tables {
    menus: HashMap<MenuId, MenuRow>,
    submenus: HashMap<SubmenuId, SubmenuRow>,
    dishes: HashMap<DishId, DishRow>,
    /// Orden de insercion para listados estables
    seq: u64,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn submenus_of(&self, menu_id: MenuId) -> Vec<&SubmenuRow> {
        let mut rows: Vec<&SubmenuRow> = self
            .submenus
            .values()
            .filter(|s| s.menu_id == menu_id)
            .collect();
        rows.sort_by_key(|s| s.seq);
        rows
    }

    fn dishes_of(&self, submenu_id: SubmenuId) -> Vec<&DishRow> {
        let mut rows: Vec<&DishRow> = self
            .dishes
            .values()
            .filter(|d| d.submenu_id == submenu_id)
            .collect();
        rows.sort_by_key(|d| d.seq);
        rows
    }

    fn dish_count_in_menu(&self, menu_id: MenuId) -> u64 {
        self.submenus
            .values()
            .filter(|s| s.menu_id == menu_id)
            .map(|s| self.dishes_of(s.id).len() as u64)
            .sum()
    }

    fn menu_view(&self, row: &MenuRow) -> Menu {
        Menu {
            id: row.id,
            title: row.title.clone(),
            description: row.description.clone(),
            submenus_count: self.submenus_of(row.id).len() as u64,
            dishes_count: self.dish_count_in_menu(row.id),
        }
    }

    fn submenu_view(&self, row: &SubmenuRow) -> Submenu {
        Submenu {
            id: row.id,
            menu_id: row.menu_id,
            title: row.title.clone(),
            description: row.description.clone(),
            dishes_count: self.dishes_of(row.id).len() as u64,
        }
    }

    fn dish_view(&self, row: &DishRow) -> Dish {
        Dish {
            id: row.id,
            submenu_id: row.submenu_id,
            title: row.title.clone(),
            description: row.description.clone(),
            price: row.price,
        }
    }

    /// Borra un submenu y sus platos.
    fn drop_submenu(&mut self, submenu_id: SubmenuId) {
        self.dishes.retain(|_, d| d.submenu_id != submenu_id);
        self.submenus.remove(&submenu_id);
    }
}

/// In-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn get_all(&self) -> Result<Vec<Menu>> {
        let tables = self.tables.read();
        let mut rows: Vec<&MenuRow> = tables.menus.values().collect();
        rows.sort_by_key(|m| m.seq);
        Ok(rows.into_iter().map(|r| tables.menu_view(r)).collect())
    }

    async fn get(&self, id: MenuId) -> Result<Menu> {
        let tables = self.tables.read();
        let row = tables
            .menus
            .get(&id)
            .ok_or_else(|| CartaError::not_found(EntityKind::Menu))?;
        Ok(tables.menu_view(row))
    }

    async fn create(&self, payload: MenuPayload) -> Result<Menu> {
        let mut tables = self.tables.write();
        let id = payload.id.unwrap_or_else(MenuId::random);
        if tables.menus.contains_key(&id) {
            return Err(CartaError::conflict(EntityKind::Menu, ConflictField::Id));
        }
        if tables.menus.values().any(|m| m.title == payload.title) {
            return Err(CartaError::conflict(EntityKind::Menu, ConflictField::Title));
        }
        let seq = tables.next_seq();
        let row = MenuRow {
            id,
            title: payload.title,
            description: payload.description,
            seq,
        };
        let view = tables.menu_view(&row);
        tables.menus.insert(id, row);
        debug!(menu_id = %id, "menu created");
        Ok(view)
    }

    async fn update(&self, id: MenuId, payload: MenuPayload) -> Result<Menu> {
        let mut tables = self.tables.write();
        if !tables.menus.contains_key(&id) {
            return Err(CartaError::not_found(EntityKind::Menu));
        }
        if tables
            .menus
            .values()
            .any(|m| m.title == payload.title && m.id != id)
        {
            return Err(CartaError::conflict(EntityKind::Menu, ConflictField::Title));
        }
        let row = tables.menus.get_mut(&id).expect("checked above");
        row.title = payload.title;
        row.description = payload.description;
        let row = row.clone();
        Ok(tables.menu_view(&row))
    }

    async fn delete(&self, id: MenuId) -> Result<Confirmation> {
        let mut tables = self.tables.write();
        if tables.menus.remove(&id).is_some() {
            let orphaned: Vec<SubmenuId> = tables
                .submenus
                .values()
                .filter(|s| s.menu_id == id)
                .map(|s| s.id)
                .collect();
            for submenu_id in orphaned {
                tables.drop_submenu(submenu_id);
            }
            debug!(menu_id = %id, "menu deleted with descendants");
        }
        Ok(Confirmation::deleted(EntityKind::Menu))
    }

    async fn get_all_ids(&self) -> Result<Vec<MenuId>> {
        let tables = self.tables.read();
        let mut rows: Vec<&MenuRow> = tables.menus.values().collect();
        rows.sort_by_key(|m| m.seq);
        Ok(rows.into_iter().map(|m| m.id).collect())
    }
}

#[async_trait]
impl SubmenuStore for MemoryStore {
    async fn get_all(&self, menu_id: MenuId) -> Result<Vec<Submenu>> {
        let tables = self.tables.read();
        Ok(tables
            .submenus_of(menu_id)
            .into_iter()
            .map(|r| tables.submenu_view(r))
            .collect())
    }

    async fn get(&self, menu_id: MenuId, submenu_id: SubmenuId) -> Result<Submenu> {
        let tables = self.tables.read();
        let row = tables
            .submenus
            .get(&submenu_id)
            .filter(|s| s.menu_id == menu_id)
            .ok_or_else(|| CartaError::not_found(EntityKind::Submenu))?;
        Ok(tables.submenu_view(row))
    }

    async fn create(&self, menu_id: MenuId, payload: SubmenuPayload) -> Result<Submenu> {
        let mut tables = self.tables.write();
        if !tables.menus.contains_key(&menu_id) {
            return Err(CartaError::not_found(EntityKind::Menu));
        }
        let id = payload.id.unwrap_or_else(SubmenuId::random);
        if tables.submenus.contains_key(&id) {
            return Err(CartaError::conflict(EntityKind::Submenu, ConflictField::Id));
        }
        if tables
            .submenus
            .values()
            .any(|s| s.menu_id == menu_id && s.title == payload.title)
        {
            return Err(CartaError::conflict(
                EntityKind::Submenu,
                ConflictField::Title,
            ));
        }
        let seq = tables.next_seq();
        let row = SubmenuRow {
            id,
            menu_id,
            title: payload.title,
            description: payload.description,
            seq,
        };
        let view = tables.submenu_view(&row);
        tables.submenus.insert(id, row);
        debug!(menu_id = %menu_id, submenu_id = %id, "submenu created");
        Ok(view)
    }

    async fn update(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        payload: SubmenuPayload,
    ) -> Result<Submenu> {
        let mut tables = self.tables.write();
        if !tables
            .submenus
            .get(&submenu_id)
            .is_some_and(|s| s.menu_id == menu_id)
        {
            return Err(CartaError::not_found(EntityKind::Submenu));
        }
        if tables
            .submenus
            .values()
            .any(|s| s.menu_id == menu_id && s.title == payload.title && s.id != submenu_id)
        {
            return Err(CartaError::conflict(
                EntityKind::Submenu,
                ConflictField::Title,
            ));
        }
        let row = tables.submenus.get_mut(&submenu_id).expect("checked above");
        row.title = payload.title;
        row.description = payload.description;
        let row = row.clone();
        Ok(tables.submenu_view(&row))
    }

    async fn delete(&self, menu_id: MenuId, submenu_id: SubmenuId) -> Result<Confirmation> {
        let mut tables = self.tables.write();
        if tables
            .submenus
            .get(&submenu_id)
            .is_some_and(|s| s.menu_id == menu_id)
        {
            tables.drop_submenu(submenu_id);
            debug!(menu_id = %menu_id, submenu_id = %submenu_id, "submenu deleted with dishes");
        }
        Ok(Confirmation::deleted(EntityKind::Submenu))
    }

    async fn get_all_ids(&self, menu_id: MenuId) -> Result<Vec<SubmenuId>> {
        let tables = self.tables.read();
        Ok(tables
            .submenus_of(menu_id)
            .into_iter()
            .map(|s| s.id)
            .collect())
    }
}

#[async_trait]
impl DishStore for MemoryStore {
    async fn get_all(&self, menu_id: MenuId, submenu_id: SubmenuId) -> Result<Vec<Dish>> {
        let tables = self.tables.read();
        if !tables
            .submenus
            .get(&submenu_id)
            .is_some_and(|s| s.menu_id == menu_id)
        {
            // Submenu ajeno o inexistente: listado vacio, no error
            return Ok(Vec::new());
        }
        Ok(tables
            .dishes_of(submenu_id)
            .into_iter()
            .map(|r| tables.dish_view(r))
            .collect())
    }

    async fn get(&self, menu_id: MenuId, submenu_id: SubmenuId, dish_id: DishId) -> Result<Dish> {
        let tables = self.tables.read();
        let parent_ok = tables
            .submenus
            .get(&submenu_id)
            .is_some_and(|s| s.menu_id == menu_id);
        let row = tables
            .dishes
            .get(&dish_id)
            .filter(|d| parent_ok && d.submenu_id == submenu_id)
            .ok_or_else(|| CartaError::not_found(EntityKind::Dish))?;
        Ok(tables.dish_view(row))
    }

    async fn create(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        payload: DishPayload,
    ) -> Result<Dish> {
        let mut tables = self.tables.write();
        if !tables
            .submenus
            .get(&submenu_id)
            .is_some_and(|s| s.menu_id == menu_id)
        {
            return Err(CartaError::not_found(EntityKind::Submenu));
        }
        let id = payload.id.unwrap_or_else(DishId::random);
        if tables.dishes.contains_key(&id) {
            return Err(CartaError::conflict(EntityKind::Dish, ConflictField::Id));
        }
        if tables
            .dishes
            .values()
            .any(|d| d.submenu_id == submenu_id && d.title == payload.title)
        {
            return Err(CartaError::conflict(EntityKind::Dish, ConflictField::Title));
        }
        let seq = tables.next_seq();
        let row = DishRow {
            id,
            submenu_id,
            title: payload.title,
            description: payload.description,
            price: payload.price,
            seq,
        };
        let view = tables.dish_view(&row);
        tables.dishes.insert(id, row);
        debug!(submenu_id = %submenu_id, dish_id = %id, "dish created");
        Ok(view)
    }

    async fn update(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        dish_id: DishId,
        payload: DishPayload,
    ) -> Result<Dish> {
        let mut tables = self.tables.write();
        let parent_ok = tables
            .submenus
            .get(&submenu_id)
            .is_some_and(|s| s.menu_id == menu_id);
        if !tables
            .dishes
            .get(&dish_id)
            .is_some_and(|d| parent_ok && d.submenu_id == submenu_id)
        {
            return Err(CartaError::not_found(EntityKind::Dish));
        }
        if tables
            .dishes
            .values()
            .any(|d| d.submenu_id == submenu_id && d.title == payload.title && d.id != dish_id)
        {
            return Err(CartaError::conflict(EntityKind::Dish, ConflictField::Title));
        }
        let row = tables.dishes.get_mut(&dish_id).expect("checked above");
        row.title = payload.title;
        row.description = payload.description;
        row.price = payload.price;
        let row = row.clone();
        Ok(tables.dish_view(&row))
    }

    async fn delete(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        dish_id: DishId,
    ) -> Result<Confirmation> {
        let mut tables = self.tables.write();
        let parent_ok = tables
            .submenus
            .get(&submenu_id)
            .is_some_and(|s| s.menu_id == menu_id);
        if parent_ok
            && tables
                .dishes
                .get(&dish_id)
                .is_some_and(|d| d.submenu_id == submenu_id)
        {
            tables.dishes.remove(&dish_id);
            debug!(submenu_id = %submenu_id, dish_id = %dish_id, "dish deleted");
        }
        Ok(Confirmation::deleted(EntityKind::Dish))
    }

    async fn get_all_ids(&self, submenu_id: SubmenuId) -> Result<Vec<DishId>> {
        let tables = self.tables.read();
        Ok(tables
            .dishes_of(submenu_id)
            .into_iter()
            .map(|d| d.id)
            .collect())
    }
}

#[async_trait]
impl FullMenuStore for MemoryStore {
    async fn get_full(&self) -> Result<FullMenu> {
        let tables = self.tables.read();
        let mut menus: Vec<&MenuRow> = tables.menus.values().collect();
        menus.sort_by_key(|m| m.seq);

        Ok(menus
            .into_iter()
            .map(|menu_row| {
                let submenus = tables
                    .submenus_of(menu_row.id)
                    .into_iter()
                    .map(|submenu_row| {
                        let dishes = tables
                            .dishes_of(submenu_row.id)
                            .into_iter()
                            .map(|d| DishNode::from(tables.dish_view(d)))
                            .collect();
                        SubmenuNode::new(tables.submenu_view(submenu_row), dishes)
                    })
                    .collect();
                MenuNode::new(tables.menu_view(menu_row), submenus)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_payload(title: &str) -> MenuPayload {
        MenuPayload {
            id: None,
            title: title.into(),
            description: "desc".into(),
        }
    }

    fn submenu_payload(title: &str) -> SubmenuPayload {
        SubmenuPayload {
            id: None,
            title: title.into(),
            description: "desc".into(),
        }
    }

    fn dish_payload(title: &str, price: &str) -> DishPayload {
        DishPayload {
            id: None,
            title: title.into(),
            description: "desc".into(),
            price: price.parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_menu_crud_roundtrip() {
        let store = MemoryStore::new();

        let created = MenuStore::create(&store, menu_payload("Menu A")).await.unwrap();
        let fetched = MenuStore::get(&store, created.id).await.unwrap();
        assert_eq!(created, fetched);

        let updated = MenuStore::update(
            &store,
            created.id,
            MenuPayload {
                id: None,
                title: "Menu B".into(),
                description: "otra".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Menu B");

        let confirmation = MenuStore::delete(&store, created.id).await.unwrap();
        assert!(confirmation.status);
        assert!(
            MenuStore::get(&store, created.id)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_menu_title_unique_globally() {
        let store = MemoryStore::new();
        MenuStore::create(&store, menu_payload("Carta")).await.unwrap();

        let err = MenuStore::create(&store, menu_payload("Carta"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_duplicate_menu_id_conflicts() {
        let store = MemoryStore::new();
        let id = MenuId::random();
        let payload = MenuPayload {
            id: Some(id),
            title: "Uno".into(),
            description: "".into(),
        };
        MenuStore::create(&store, payload).await.unwrap();

        let err = MenuStore::create(
            &store,
            MenuPayload {
                id: Some(id),
                title: "Dos".into(),
                description: "".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Another menu with this id already exists."
        );
    }

    #[tokio::test]
    async fn test_submenu_requires_parent() {
        let store = MemoryStore::new();
        let err = SubmenuStore::create(&store, MenuId::random(), submenu_payload("Sub"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "menu not found");
    }

    #[tokio::test]
    async fn test_dish_title_unique_per_submenu_only() {
        let store = MemoryStore::new();
        let menu = MenuStore::create(&store, menu_payload("Carta")).await.unwrap();
        let sub_a = SubmenuStore::create(&store, menu.id, submenu_payload("A"))
            .await
            .unwrap();
        let sub_b = SubmenuStore::create(&store, menu.id, submenu_payload("B"))
            .await
            .unwrap();

        // Mismo titulo en submenus distintos: permitido
        DishStore::create(&store, menu.id, sub_a.id, dish_payload("Paella", "9.90"))
            .await
            .unwrap();
        DishStore::create(&store, menu.id, sub_b.id, dish_payload("Paella", "9.90"))
            .await
            .unwrap();

        // Mismo titulo en el mismo submenu: conflicto
        let err = DishStore::create(&store, menu.id, sub_a.id, dish_payload("Paella", "8.00"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_counters_follow_the_hierarchy() {
        let store = MemoryStore::new();
        let menu = MenuStore::create(&store, menu_payload("Carta")).await.unwrap();
        let sub = SubmenuStore::create(&store, menu.id, submenu_payload("Entrantes"))
            .await
            .unwrap();
        DishStore::create(&store, menu.id, sub.id, dish_payload("Sopa", "4.00"))
            .await
            .unwrap();
        DishStore::create(&store, menu.id, sub.id, dish_payload("Ensalada", "5.00"))
            .await
            .unwrap();

        let menu = MenuStore::get(&store, menu.id).await.unwrap();
        assert_eq!(menu.submenus_count, 1);
        assert_eq!(menu.dishes_count, 2);

        let sub = SubmenuStore::get(&store, menu.id, sub.id).await.unwrap();
        assert_eq!(sub.dishes_count, 2);
    }

    #[tokio::test]
    async fn test_menu_delete_cascades() {
        let store = MemoryStore::new();
        let menu = MenuStore::create(&store, menu_payload("Carta")).await.unwrap();
        let sub = SubmenuStore::create(&store, menu.id, submenu_payload("Entrantes"))
            .await
            .unwrap();
        let dish = DishStore::create(&store, menu.id, sub.id, dish_payload("Sopa", "4.00"))
            .await
            .unwrap();

        MenuStore::delete(&store, menu.id).await.unwrap();

        assert!(
            SubmenuStore::get(&store, menu.id, sub.id)
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            DishStore::get(&store, menu.id, sub.id, dish.id)
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            DishStore::get_all(&store, menu.id, sub.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_submenu_delete_resets_menu_counters() {
        let store = MemoryStore::new();
        let menu = MenuStore::create(&store, menu_payload("Menu A")).await.unwrap();
        let sub = SubmenuStore::create(&store, menu.id, submenu_payload("Sub A"))
            .await
            .unwrap();
        DishStore::create(&store, menu.id, sub.id, dish_payload("D1", "1.00"))
            .await
            .unwrap();
        DishStore::create(&store, menu.id, sub.id, dish_payload("D2", "2.00"))
            .await
            .unwrap();

        let before = MenuStore::get(&store, menu.id).await.unwrap();
        assert_eq!(before.submenus_count, 1);
        assert_eq!(before.dishes_count, 2);

        SubmenuStore::delete(&store, menu.id, sub.id).await.unwrap();

        let after = MenuStore::get(&store, menu.id).await.unwrap();
        assert_eq!(after.submenus_count, 0);
        assert_eq!(after.dishes_count, 0);
    }

    #[tokio::test]
    async fn test_delete_absent_is_confirmed_noop() {
        let store = MemoryStore::new();
        let confirmation = MenuStore::delete(&store, MenuId::random()).await.unwrap();
        assert!(confirmation.status);
        assert_eq!(confirmation.message, "The menu has been deleted");
    }

    #[tokio::test]
    async fn test_full_menu_projection() {
        let store = MemoryStore::new();
        let menu = MenuStore::create(&store, menu_payload("Carta")).await.unwrap();
        let sub = SubmenuStore::create(&store, menu.id, submenu_payload("Entrantes"))
            .await
            .unwrap();
        DishStore::create(&store, menu.id, sub.id, dish_payload("Sopa", "4.00"))
            .await
            .unwrap();

        let full = store.get_full().await.unwrap();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].submenus.len(), 1);
        assert_eq!(full[0].submenus[0].dishes.len(), 1);

        MenuStore::delete(&store, menu.id).await.unwrap();
        assert!(store.get_full().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_all_ids_enumerates_fresh() {
        let store = MemoryStore::new();
        let a = MenuStore::create(&store, menu_payload("A")).await.unwrap();
        let b = MenuStore::create(&store, menu_payload("B")).await.unwrap();

        let ids = MenuStore::get_all_ids(&store).await.unwrap();
        assert_eq!(ids, vec![a.id, b.id]);
    }
}
