//! Cache key generation.
//!
//! Every key is a deterministic string derived from entity identifiers and
//! fixed kind tags, so any process can address any entry without shared
//! state. Collection and dependency keys are built from the already-tagged
//! entity keys, which keeps the scoping identical to the storage layer's
//! uniqueness scopes.

use carta_core::{DishId, MenuId, SubmenuId};

/// Singleton key for the list of every menu.
pub const ALL_MENUS_KEY: &str = "menus";

/// Singleton key for the denormalized full-menu export.
pub const FULL_MENU_KEY: &str = "full_menu";

const MENU_TAG: &str = "menu";
const SUBMENU_TAG: &str = "submenu";
const DISH_TAG: &str = "dish";
const DEPS_TAG: &str = "deps";
const ALL_SUBMENUS_TAG: &str = "submenus";
const ALL_DISHES_TAG: &str = "dishes";

/// Key for one menu entry: `menu_{id}`.
pub fn menu_key(id: MenuId) -> String {
    format!("{}_{}", MENU_TAG, id)
}

/// Key for one submenu entry: `submenu_{id}`.
pub fn submenu_key(id: SubmenuId) -> String {
    format!("{}_{}", SUBMENU_TAG, id)
}

/// Key for one dish entry: `dish_{id}`.
pub fn dish_key(id: DishId) -> String {
    format!("{}_{}", DISH_TAG, id)
}

/// Key for the submenu collection of a menu: `{menu-key}:submenus`.
pub fn submenus_of(menu_key: &str) -> String {
    format!("{}:{}", menu_key, ALL_SUBMENUS_TAG)
}

/// Key for the dish collection of a submenu:
/// `{menu-key}:{submenu-key}:dishes`.
pub fn dishes_of(menu_key: &str, submenu_key: &str) -> String {
    format!("{}:{}:{}", menu_key, submenu_key, ALL_DISHES_TAG)
}

/// Key for the dependency set of an entity key: `deps:{entity-key}`.
pub fn deps_of(entity_key: &str) -> String {
    format!("{}:{}", DEPS_TAG, entity_key)
}
