//! Admin table source.
//!
//! The catalog is also maintained in an externally edited table. This module
//! defines the parsed view the reconciler consumes ([`TableRow`]) and a file
//! reader for the table's layout: semicolon-separated columns where a menu
//! row fills column 0, a submenu row starts at column 1 and a dish row at
//! column 2, each followed by title, description (and price for dishes).
//!
//! ```text
//! 9a5c...;Carta del dia;La carta;;;
//! ;41be...;Entrantes;Para empezar;;
//! ;;77f0...;Gazpacho;Frio;4.50
//! ```

use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use async_trait::async_trait;

use carta_core::{DishId, MenuId, Price, SubmenuId};

/// One parsed table row.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    Menu {
        id: MenuId,
        title: String,
        description: String,
    },
    Submenu {
        id: SubmenuId,
        title: String,
        description: String,
    },
    Dish {
        id: DishId,
        title: String,
        description: String,
        price: Price,
    },
}

/// Errors reading or parsing the admin table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table cannot be read at all.
    #[error("table source unavailable: {0}")]
    Unavailable(String),

    /// A row does not follow the three-level layout.
    #[error("malformed table row {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl TableError {
    fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// A source of admin-table snapshots.
///
/// `fingerprint` is a cheap change token (file mtime, ETag, revision); the
/// reconciler skips the whole walk when it has not moved since the last
/// successful run.
#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fingerprint(&self) -> Result<String, TableError>;

    async fn load(&self) -> Result<Vec<TableRow>, TableError>;
}

/// Table source backed by a delimited text file.
pub struct FileTableSource {
    path: PathBuf,
}

impl FileTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TableSource for FileTableSource {
    async fn fingerprint(&self) -> Result<String, TableError> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| TableError::Unavailable(e.to_string()))?;
        let mtime = metadata
            .modified()
            .map_err(|e| TableError::Unavailable(e.to_string()))?;
        let stamp = mtime
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TableError::Unavailable(e.to_string()))?;
        Ok(format!("{}.{:09}", stamp.as_secs(), stamp.subsec_nanos()))
    }

    async fn load(&self) -> Result<Vec<TableRow>, TableError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| TableError::Unavailable(e.to_string()))?;
        parse_table(&content)
    }
}

/// Parses the delimited layout into rows, preserving order.
pub fn parse_table(content: &str) -> Result<Vec<TableRow>, TableError> {
    let mut rows = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split(';').map(str::trim).collect();
        let column = |i: usize| columns.get(i).copied().unwrap_or_default();

        if !column(0).is_empty() {
            rows.push(TableRow::Menu {
                id: column(0)
                    .parse()
                    .map_err(|_| TableError::malformed(number, "invalid menu id"))?,
                title: column(1).to_string(),
                description: column(2).to_string(),
            });
        } else if !column(1).is_empty() {
            rows.push(TableRow::Submenu {
                id: column(1)
                    .parse()
                    .map_err(|_| TableError::malformed(number, "invalid submenu id"))?,
                title: column(2).to_string(),
                description: column(3).to_string(),
            });
        } else if !column(2).is_empty() {
            rows.push(TableRow::Dish {
                id: column(2)
                    .parse()
                    .map_err(|_| TableError::malformed(number, "invalid dish id"))?,
                title: column(3).to_string(),
                description: column(4).to_string(),
                price: column(5)
                    .parse()
                    .map_err(|_| TableError::malformed(number, "invalid dish price"))?,
            });
        } else {
            return Err(TableError::malformed(number, "no id in any level column"));
        }
    }

    Ok(rows)
}
