//! Error types for the Carta catalog.
//!
//! This module defines the error hierarchy shared by the storage layer and
//! the HTTP services. All errors implement the standard `std::error::Error`
//! trait via `thiserror`.
//!
//! Cache faults are deliberately absent here: the cache layer absorbs its
//! backend errors and never lets them reach a caller.
//!
//! # Example
//!
//! ```
//! use carta_core::{CartaError, EntityKind};
//!
//! let err = CartaError::not_found(EntityKind::Menu);
//! assert!(err.is_not_found());
//! assert_eq!(err.to_string(), "menu not found");
//! ```

use std::fmt;
use thiserror::Error;

/// Kind of catalog entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Menu,
    Submenu,
    Dish,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Menu => "menu",
            EntityKind::Submenu => "submenu",
            EntityKind::Dish => "dish",
        };
        write!(f, "{}", name)
    }
}

/// Attribute that collided on a uniqueness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Id,
    Title,
}

impl fmt::Display for ConflictField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConflictField::Id => "id",
            ConflictField::Title => "title",
        };
        write!(f, "{}", name)
    }
}

fn conflict_text(entity: EntityKind, field: ConflictField) -> String {
    // El ambito del titulo es el padre; los ids son globales
    let scope = match (entity, field) {
        (EntityKind::Submenu, ConflictField::Title) => " in the menu",
        (EntityKind::Dish, ConflictField::Title) => " in the submenu",
        _ => "",
    };
    format!("Another {} with this {} already exists{}.", entity, field, scope)
}

/// Main error type for catalog operations.
///
/// Storage errors are authoritative: `NotFound` and `Conflict` surface to
/// the client as 404/409, anything else is fatal to the request.
#[derive(Debug, Error)]
pub enum CartaError {
    /// The requested entity (or a required ancestor) does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Entity kind that was requested
        entity: EntityKind,
    },

    /// A uniqueness constraint would be violated.
    #[error("{}", conflict_text(*entity, *field))]
    Conflict {
        /// Entity kind whose constraint collided
        entity: EntityKind,
        /// Attribute that collided (id vs. scoped title)
        field: ConflictField,
    },

    /// Any other storage-layer fault. Fatal to the request.
    #[error("storage error: {0}")]
    Storage(String),
}

impl CartaError {
    /// Creates a NotFound error for the given entity kind.
    pub fn not_found(entity: EntityKind) -> Self {
        Self::NotFound { entity }
    }

    /// Creates a Conflict error for the given entity kind and attribute.
    pub fn conflict(entity: EntityKind, field: ConflictField) -> Self {
        Self::Conflict { entity, field }
    }

    /// Creates a Storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Returns true if this error indicates the entity was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Type alias for Results with CartaError.
pub type Result<T> = std::result::Result<T, CartaError>;
