//! Catalog entities and input payloads.
//!
//! The counter fields (`submenus_count`, `dishes_count`) are derived by the
//! storage layer at read time; they are never stored and never accepted as
//! input.

use serde::{Deserialize, Serialize};

use crate::error::EntityKind;
use crate::price::Price;
use crate::types::{DishId, MenuId, SubmenuId};

/// A top-level menu with derived counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    pub title: String,
    pub description: String,
    /// Numero de submenus colgando de este menu
    #[serde(default)]
    pub submenus_count: u64,
    /// Numero total de platos en todos los submenus
    #[serde(default)]
    pub dishes_count: u64,
}

/// A submenu scoped under one menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submenu {
    pub id: SubmenuId,
    pub menu_id: MenuId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub dishes_count: u64,
}

/// A dish scoped under one submenu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub submenu_id: SubmenuId,
    pub title: String,
    pub description: String,
    pub price: Price,
}

/// Input payload for creating or updating a menu.
///
/// The id is honored on create only; the table sync uses it to insert rows
/// with identifiers taken from the admin spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MenuId>,
    pub title: String,
    pub description: String,
}

/// Input payload for creating or updating a submenu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmenuPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SubmenuId>,
    pub title: String,
    pub description: String,
}

/// Input payload for creating or updating a dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DishId>,
    pub title: String,
    pub description: String,
    pub price: Price,
}

/// Structured confirmation returned by delete operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub status: bool,
    pub message: String,
}

impl Confirmation {
    /// Confirmacion de borrado para un tipo de entidad.
    pub fn deleted(entity: EntityKind) -> Self {
        Self {
            status: true,
            message: format!("The {} has been deleted", entity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_confirmation_messages() {
        assert_eq!(
            Confirmation::deleted(EntityKind::Menu).message,
            "The menu has been deleted"
        );
        assert_eq!(
            Confirmation::deleted(EntityKind::Submenu).message,
            "The submenu has been deleted"
        );
        assert_eq!(
            Confirmation::deleted(EntityKind::Dish).message,
            "The dish has been deleted"
        );
    }

    #[test]
    fn test_payload_id_is_optional() {
        let payload: MenuPayload =
            serde_json::from_str(r#"{"title":"Menu A","description":"desc"}"#).unwrap();
        assert!(payload.id.is_none());

        // Sin id tampoco aparece en la salida
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn test_menu_counters_default_to_zero() {
        let json = format!(
            r#"{{"id":"{}","title":"t","description":"d"}}"#,
            MenuId::random()
        );
        let menu: Menu = serde_json::from_str(&json).unwrap();
        assert_eq!(menu.submenus_count, 0);
        assert_eq!(menu.dishes_count, 0);
    }

    #[test]
    fn test_dish_price_serializes_as_string() {
        let dish = Dish {
            id: DishId::random(),
            submenu_id: SubmenuId::random(),
            title: "Tortilla".into(),
            description: "de patatas".into(),
            price: "12.5345".parse().unwrap(),
        };
        let json = serde_json::to_value(&dish).unwrap();
        assert_eq!(json["price"], "12.53");
    }
}
