//! Common identifier newtypes for the Carta catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Menu identifier.
///
/// Opaque unique token for a top-level menu. Clients may supply one on
/// create (the table sync does) or let the server assign a random one.
///
/// # Example
///
/// ```
/// use carta_core::MenuId;
///
/// let id = MenuId::random();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuId(Uuid);

impl MenuId {
    /// Crea un MenuId a partir de un UUID existente.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Genera un identificador aleatorio.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MenuId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for MenuId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Submenu identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmenuId(Uuid);

impl SubmenuId {
    /// Crea un SubmenuId a partir de un UUID existente.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Genera un identificador aleatorio.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SubmenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubmenuId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for SubmenuId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Dish identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DishId(Uuid);

impl DishId {
    /// Crea un DishId a partir de un UUID existente.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Genera un identificador aleatorio.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DishId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for DishId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}
