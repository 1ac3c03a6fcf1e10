//! HTTP handlers for the catalog API.

pub mod admin;
pub mod dishes;
pub mod full_menu;
pub mod health;
pub mod menus;
pub mod metrics;
pub mod submenus;

pub use health::{HealthResponse, health_check};
