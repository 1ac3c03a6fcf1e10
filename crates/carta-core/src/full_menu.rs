//! Denormalized full-menu export.
//!
//! The export is a read-only projection of the whole hierarchy: every menu
//! with its submenus nested, every submenu with its dishes nested. Each node
//! carries a `type` tag so consumers can tell the levels apart. The cache
//! stores the entire projection as a single blob.

use serde::{Deserialize, Serialize};

use crate::entities::{Dish, Menu, Submenu};
use crate::price::Price;
use crate::types::{DishId, MenuId, SubmenuId};

/// Node discriminator in the export tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    Menu,
    Submenu,
    Dish,
}

/// Dish leaf of the export tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub id: DishId,
    pub title: String,
    pub description: String,
    pub price: Price,
}

impl From<Dish> for DishNode {
    fn from(dish: Dish) -> Self {
        Self {
            kind: NodeKind::Dish,
            id: dish.id,
            title: dish.title,
            description: dish.description,
            price: dish.price,
        }
    }
}

/// Submenu node with its dishes nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmenuNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub id: SubmenuId,
    pub title: String,
    pub description: String,
    pub dishes: Vec<DishNode>,
}

impl SubmenuNode {
    /// Arma el nodo a partir del submenu y sus platos.
    pub fn new(submenu: Submenu, dishes: Vec<DishNode>) -> Self {
        Self {
            kind: NodeKind::Submenu,
            id: submenu.id,
            title: submenu.title,
            description: submenu.description,
            dishes,
        }
    }
}

/// Menu root node with its submenus nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub id: MenuId,
    pub title: String,
    pub description: String,
    pub submenus: Vec<SubmenuNode>,
}

impl MenuNode {
    /// Arma el nodo raiz a partir del menu y sus submenus.
    pub fn new(menu: Menu, submenus: Vec<SubmenuNode>) -> Self {
        Self {
            kind: NodeKind::Menu,
            id: menu.id,
            title: menu.title,
            description: menu.description,
            submenus,
        }
    }
}

/// The whole export: one node per menu.
pub type FullMenu = Vec<MenuNode>;
