//! Menu endpoint handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use carta_core::{Confirmation, Menu, MenuId, MenuPayload};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/v1/menus
#[instrument(skip_all)]
pub async fn list_menus(State(state): State<AppState>) -> Result<Json<Vec<Menu>>, AppError> {
    let menus = state.menus().get_all().await?;
    Ok(Json(menus))
}

/// GET /api/v1/menus/{menu_id}
#[instrument(skip_all, fields(menu_id = %path.menu_id))]
pub async fn get_menu(
    State(state): State<AppState>,
    Path(path): Path<MenuPath>,
) -> Result<Json<Menu>, AppError> {
    let menu = state.menus().get(path.menu_id).await?;
    Ok(Json(menu))
}

/// POST /api/v1/menus
#[instrument(skip_all)]
pub async fn create_menu(
    State(state): State<AppState>,
    Json(payload): Json<MenuPayload>,
) -> Result<(StatusCode, Json<Menu>), AppError> {
    let menu = state.menus().create(payload).await?;
    Ok((StatusCode::CREATED, Json(menu)))
}

/// PATCH /api/v1/menus/{menu_id}
#[instrument(skip_all, fields(menu_id = %path.menu_id))]
pub async fn update_menu(
    State(state): State<AppState>,
    Path(path): Path<MenuPath>,
    Json(payload): Json<MenuPayload>,
) -> Result<Json<Menu>, AppError> {
    let menu = state.menus().update(path.menu_id, payload).await?;
    Ok(Json(menu))
}

/// DELETE /api/v1/menus/{menu_id}
#[instrument(skip_all, fields(menu_id = %path.menu_id))]
pub async fn delete_menu(
    State(state): State<AppState>,
    Path(path): Path<MenuPath>,
) -> Result<Json<Confirmation>, AppError> {
    let confirmation = state.menus().delete(path.menu_id).await?;
    Ok(Json(confirmation))
}

// Path extractors

#[derive(Debug, Deserialize)]
pub struct MenuPath {
    pub menu_id: MenuId,
}
