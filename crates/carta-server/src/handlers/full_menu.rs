//! Full-menu export handler.

use axum::{Json, extract::State};
use tracing::instrument;

use carta_core::FullMenu;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/v1/full_menu
#[instrument(skip_all)]
pub async fn get_full_menu(State(state): State<AppState>) -> Result<Json<FullMenu>, AppError> {
    let full_menu = state.full_menu().get().await?;
    Ok(Json(full_menu))
}
