//! # Carta Core
//!
//! Domain types for the Carta menu catalog: entity structs, identifier
//! newtypes, the fixed-point price type, the full-menu export projection,
//! and the shared error taxonomy.
//!
//! The hierarchy is strictly three levels: `Dish` ⊂ `Submenu` ⊂ `Menu`.
//! Title uniqueness is scoped (menus globally, submenus per menu, dishes per
//! submenu); the storage layer enforces it and reports violations through
//! [`CartaError::Conflict`].

pub mod entities;
pub mod error;
pub mod full_menu;
pub mod price;
pub mod types;

// Re-exports
pub use entities::{Confirmation, Dish, DishPayload, Menu, MenuPayload, Submenu, SubmenuPayload};
pub use error::{CartaError, ConflictField, EntityKind, Result};
pub use full_menu::{DishNode, FullMenu, MenuNode, NodeKind, SubmenuNode};
pub use price::{Price, PriceError};
pub use types::{DishId, MenuId, SubmenuId};
