//! Admin-table synchronization.
//!
//! This module converges the stored catalog to an externally edited table
//! on a configurable schedule, and on demand through the admin endpoint.

mod reconciler;
mod scheduler;
mod source;

pub use reconciler::{SyncError, SyncOutcome, TableReconciler};
pub use scheduler::{SyncConfig, SyncHandle, SyncScheduler};
pub use source::{FileTableSource, TableError, TableRow, TableSource, parse_table};
