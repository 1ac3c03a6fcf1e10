//! Entity services: read-through / write-through policy.
//!
//! One service per entity type composes the authoritative store with the
//! cache repository. Reads consult the cache first and populate it on a
//! miss; writes mutate storage first and only invoke the matching cache
//! cascade once storage has confirmed. Storage failures propagate verbatim
//! and never touch the cache.

mod dish;
mod full_menu;
mod menu;
mod submenu;

pub use dish::DishService;
pub use full_menu::FullMenuService;
pub use menu::MenuService;
pub use submenu::SubmenuService;
