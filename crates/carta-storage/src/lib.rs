//! # Carta Storage
//!
//! Storage contract for the Carta menu catalog.
//!
//! This crate defines the per-entity store traits the services consume
//! (`MenuStore`, `SubmenuStore`, `DishStore`, `FullMenuStore`) together with
//! `MemoryStore`, an in-process implementation used by the server binary and
//! the test suites. A relational backend plugs in by implementing the same
//! traits.
//!
//! ## Contract highlights
//!
//! - Uniqueness: menu titles are unique globally, submenu titles within
//!   their menu, dish titles within their submenu; supplied ids must be
//!   fresh. Violations surface as `CartaError::Conflict` before any
//!   mutation.
//! - Deletes cascade: removing a menu removes its submenus and dishes.
//! - Deleting an absent entity is a no-op that still returns the
//!   confirmation payload.
//! - Counters (`submenus_count`, `dishes_count`) are derived at read time.

pub mod memory;
pub mod traits;

// Re-exports
pub use memory::MemoryStore;
pub use traits::{DishStore, FullMenuStore, MenuStore, SubmenuStore};
