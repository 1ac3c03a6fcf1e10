//! Admin endpoint handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use carta_core::CartaError;

use crate::error::AppError;
use crate::state::AppState;
use crate::sync::{SyncError, SyncOutcome};

/// Response del endpoint de sincronizacion.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub status: bool,
    pub message: String,
}

/// POST /api/v1/admin/sync
///
/// Runs one reconciliation pass against the admin table. Returns
/// `no need to sync` when the table fingerprint has not moved.
#[instrument(skip_all)]
pub async fn sync_table(State(state): State<AppState>) -> Result<Json<SyncResponse>, AppError> {
    let Some(reconciler) = state.table_sync() else {
        return Err(AppError(CartaError::storage("Table sync is not configured")));
    };

    match reconciler.run().await {
        Ok(SyncOutcome::Synced) => {
            tracing::info!("Table sync completed");
            Ok(Json(SyncResponse {
                status: true,
                message: "success".to_string(),
            }))
        },
        Ok(SyncOutcome::NotNeeded) => Ok(Json(SyncResponse {
            status: false,
            message: "no need to sync".to_string(),
        })),
        Err(SyncError::Catalog(err)) => Err(AppError(err)),
        Err(err) => Err(AppError(CartaError::storage(err.to_string()))),
    }
}
