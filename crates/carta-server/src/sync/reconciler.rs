//! Table reconciliation.
//!
//! Walks the admin table in row order and converges the stored catalog to
//! it through the entity services, so every mutation takes the same
//! write-through path (and cache cascades) as an HTTP request:
//!
//! - each row is upserted: `update`, falling back to `create` with the
//!   row's id when the service reports NotFound;
//! - entities present in storage but absent from the table are deleted by
//!   id set-difference, scoped per parent;
//! - any failure other than the NotFound fallback aborts the run and the
//!   stored fingerprint is not advanced, so the next run retries from
//!   scratch.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use carta_core::{
    CartaError, DishId, DishPayload, MenuId, MenuPayload, SubmenuId, SubmenuPayload,
};

use crate::services::{DishService, MenuService, SubmenuService};
use crate::sync::source::{TableError, TableRow, TableSource};

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The catalog was converged to the table.
    Synced,
    /// The table fingerprint had not moved; nothing was touched.
    NotNeeded,
}

/// Errors aborting a reconciliation pass.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Catalog(#[from] CartaError),

    /// A child row appeared before any row of its parent level.
    #[error("table row out of order: {0}")]
    OutOfOrder(&'static str),
}

/// Converges the stored catalog to the admin table.
pub struct TableReconciler {
    source: Arc<dyn TableSource>,
    menus: Arc<MenuService>,
    submenus: Arc<SubmenuService>,
    dishes: Arc<DishService>,
    /// Fingerprint del ultimo pass exitoso
    last_fingerprint: Mutex<Option<String>>,
}

impl TableReconciler {
    pub fn new(
        source: Arc<dyn TableSource>,
        menus: Arc<MenuService>,
        submenus: Arc<SubmenuService>,
        dishes: Arc<DishService>,
    ) -> Self {
        Self {
            source,
            menus,
            submenus,
            dishes,
            last_fingerprint: Mutex::new(None),
        }
    }

    /// Runs one pass. The fingerprint advances only on success.
    pub async fn run(&self) -> Result<SyncOutcome, SyncError> {
        let fingerprint = self.source.fingerprint().await?;
        if self.last_fingerprint.lock().as_deref() == Some(fingerprint.as_str()) {
            debug!("Table fingerprint unchanged, skipping sync");
            return Ok(SyncOutcome::NotNeeded);
        }

        let rows = self.source.load().await?;
        self.walk(rows).await?;

        *self.last_fingerprint.lock() = Some(fingerprint);
        info!("Catalog converged to admin table");
        Ok(SyncOutcome::Synced)
    }

    async fn walk(&self, rows: Vec<TableRow>) -> Result<(), SyncError> {
        let mut table_menus: HashSet<MenuId> = HashSet::new();
        // Set pendiente de reconciliar, junto con el padre que lo acota
        let mut pending_submenus: Option<(MenuId, HashSet<SubmenuId>)> = None;
        let mut pending_dishes: Option<(MenuId, SubmenuId, HashSet<DishId>)> = None;

        for row in rows {
            match row {
                TableRow::Menu {
                    id,
                    title,
                    description,
                } => {
                    if let Some(scope) = pending_dishes.take() {
                        self.delete_missing_dishes(scope).await?;
                    }
                    if let Some(scope) = pending_submenus.take() {
                        self.delete_missing_submenus(scope).await?;
                    }
                    table_menus.insert(id);
                    pending_submenus = Some((id, HashSet::new()));
                    self.upsert_menu(id, title, description).await?;
                },
                TableRow::Submenu {
                    id,
                    title,
                    description,
                } => {
                    let Some((menu_id, submenu_ids)) = pending_submenus.as_mut() else {
                        return Err(SyncError::OutOfOrder("submenu row before any menu row"));
                    };
                    let menu_id = *menu_id;
                    submenu_ids.insert(id);
                    if let Some(scope) = pending_dishes.take() {
                        self.delete_missing_dishes(scope).await?;
                    }
                    pending_dishes = Some((menu_id, id, HashSet::new()));
                    self.upsert_submenu(menu_id, id, title, description).await?;
                },
                TableRow::Dish {
                    id,
                    title,
                    description,
                    price,
                } => {
                    let Some((menu_id, submenu_id, dish_ids)) = pending_dishes.as_mut() else {
                        return Err(SyncError::OutOfOrder("dish row before any submenu row"));
                    };
                    let (menu_id, submenu_id) = (*menu_id, *submenu_id);
                    dish_ids.insert(id);
                    let payload = DishPayload {
                        id: None,
                        title,
                        description,
                        price,
                    };
                    self.upsert_dish(menu_id, submenu_id, id, payload).await?;
                },
            }
        }

        if let Some(scope) = pending_dishes.take() {
            self.delete_missing_dishes(scope).await?;
        }
        if let Some(scope) = pending_submenus.take() {
            self.delete_missing_submenus(scope).await?;
        }
        self.delete_missing_menus(&table_menus).await?;

        Ok(())
    }

    async fn upsert_menu(
        &self,
        id: MenuId,
        title: String,
        description: String,
    ) -> Result<(), SyncError> {
        let payload = MenuPayload {
            id: None,
            title,
            description,
        };
        match self.menus.update(id, payload.clone()).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => {
                self.menus
                    .create(MenuPayload {
                        id: Some(id),
                        ..payload
                    })
                    .await?;
                Ok(())
            },
            Err(err) => Err(err.into()),
        }
    }

    async fn upsert_submenu(
        &self,
        menu_id: MenuId,
        id: SubmenuId,
        title: String,
        description: String,
    ) -> Result<(), SyncError> {
        let payload = SubmenuPayload {
            id: None,
            title,
            description,
        };
        match self.submenus.update(menu_id, id, payload.clone()).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => {
                self.submenus
                    .create(
                        menu_id,
                        SubmenuPayload {
                            id: Some(id),
                            ..payload
                        },
                    )
                    .await?;
                Ok(())
            },
            Err(err) => Err(err.into()),
        }
    }

    async fn upsert_dish(
        &self,
        menu_id: MenuId,
        submenu_id: SubmenuId,
        id: DishId,
        payload: DishPayload,
    ) -> Result<(), SyncError> {
        match self.dishes.update(menu_id, submenu_id, id, payload.clone()).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => {
                self.dishes
                    .create(
                        menu_id,
                        submenu_id,
                        DishPayload {
                            id: Some(id),
                            ..payload
                        },
                    )
                    .await?;
                Ok(())
            },
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_missing_menus(&self, keep: &HashSet<MenuId>) -> Result<(), SyncError> {
        let stored = self.menus.get_all_ids().await?;
        for id in stored {
            if !keep.contains(&id) {
                warn!(menu_id = %id, "Menu absent from table, deleting");
                self.menus.delete(id).await?;
            }
        }
        Ok(())
    }

    async fn delete_missing_submenus(
        &self,
        (menu_id, keep): (MenuId, HashSet<SubmenuId>),
    ) -> Result<(), SyncError> {
        let stored = self.submenus.get_all_ids(menu_id).await?;
        for id in stored {
            if !keep.contains(&id) {
                warn!(menu_id = %menu_id, submenu_id = %id, "Submenu absent from table, deleting");
                self.submenus.delete(menu_id, id).await?;
            }
        }
        Ok(())
    }

    async fn delete_missing_dishes(
        &self,
        (menu_id, submenu_id, keep): (MenuId, SubmenuId, HashSet<DishId>),
    ) -> Result<(), SyncError> {
        let stored = self.dishes.get_all_ids(submenu_id).await?;
        for id in stored {
            if !keep.contains(&id) {
                warn!(submenu_id = %submenu_id, dish_id = %id, "Dish absent from table, deleting");
                self.dishes.delete(menu_id, submenu_id, id).await?;
            }
        }
        Ok(())
    }
}
