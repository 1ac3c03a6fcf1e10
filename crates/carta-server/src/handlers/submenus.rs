//! Submenu endpoint handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use carta_core::{Confirmation, MenuId, Submenu, SubmenuId, SubmenuPayload};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/v1/menus/{menu_id}/submenus
#[instrument(skip_all, fields(menu_id = %path.menu_id))]
pub async fn list_submenus(
    State(state): State<AppState>,
    Path(path): Path<MenuPath>,
) -> Result<Json<Vec<Submenu>>, AppError> {
    let submenus = state.submenus().get_all(path.menu_id).await?;
    Ok(Json(submenus))
}

/// GET /api/v1/menus/{menu_id}/submenus/{submenu_id}
#[instrument(skip_all, fields(menu_id = %path.menu_id, submenu_id = %path.submenu_id))]
pub async fn get_submenu(
    State(state): State<AppState>,
    Path(path): Path<SubmenuPath>,
) -> Result<Json<Submenu>, AppError> {
    let submenu = state.submenus().get(path.menu_id, path.submenu_id).await?;
    Ok(Json(submenu))
}

/// POST /api/v1/menus/{menu_id}/submenus
#[instrument(skip_all, fields(menu_id = %path.menu_id))]
pub async fn create_submenu(
    State(state): State<AppState>,
    Path(path): Path<MenuPath>,
    Json(payload): Json<SubmenuPayload>,
) -> Result<(StatusCode, Json<Submenu>), AppError> {
    let submenu = state.submenus().create(path.menu_id, payload).await?;
    Ok((StatusCode::CREATED, Json(submenu)))
}

/// PATCH /api/v1/menus/{menu_id}/submenus/{submenu_id}
#[instrument(skip_all, fields(menu_id = %path.menu_id, submenu_id = %path.submenu_id))]
pub async fn update_submenu(
    State(state): State<AppState>,
    Path(path): Path<SubmenuPath>,
    Json(payload): Json<SubmenuPayload>,
) -> Result<Json<Submenu>, AppError> {
    let submenu = state
        .submenus()
        .update(path.menu_id, path.submenu_id, payload)
        .await?;
    Ok(Json(submenu))
}

/// DELETE /api/v1/menus/{menu_id}/submenus/{submenu_id}
#[instrument(skip_all, fields(menu_id = %path.menu_id, submenu_id = %path.submenu_id))]
pub async fn delete_submenu(
    State(state): State<AppState>,
    Path(path): Path<SubmenuPath>,
) -> Result<Json<Confirmation>, AppError> {
    let confirmation = state
        .submenus()
        .delete(path.menu_id, path.submenu_id)
        .await?;
    Ok(Json(confirmation))
}

// Path extractors

#[derive(Debug, Deserialize)]
pub struct MenuPath {
    pub menu_id: MenuId,
}

#[derive(Debug, Deserialize)]
pub struct SubmenuPath {
    pub menu_id: MenuId,
    pub submenu_id: SubmenuId,
}
