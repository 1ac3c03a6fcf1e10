//! Dish endpoint handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use carta_core::{Confirmation, Dish, DishId, DishPayload, MenuId, SubmenuId};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes
#[instrument(skip_all, fields(menu_id = %path.menu_id, submenu_id = %path.submenu_id))]
pub async fn list_dishes(
    State(state): State<AppState>,
    Path(path): Path<SubmenuPath>,
) -> Result<Json<Vec<Dish>>, AppError> {
    let dishes = state.dishes().get_all(path.menu_id, path.submenu_id).await?;
    Ok(Json(dishes))
}

/// GET /api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id}
#[instrument(skip_all, fields(
    menu_id = %path.menu_id,
    submenu_id = %path.submenu_id,
    dish_id = %path.dish_id
))]
pub async fn get_dish(
    State(state): State<AppState>,
    Path(path): Path<DishPath>,
) -> Result<Json<Dish>, AppError> {
    let dish = state
        .dishes()
        .get(path.menu_id, path.submenu_id, path.dish_id)
        .await?;
    Ok(Json(dish))
}

/// POST /api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes
#[instrument(skip_all, fields(menu_id = %path.menu_id, submenu_id = %path.submenu_id))]
pub async fn create_dish(
    State(state): State<AppState>,
    Path(path): Path<SubmenuPath>,
    Json(payload): Json<DishPayload>,
) -> Result<(StatusCode, Json<Dish>), AppError> {
    let dish = state
        .dishes()
        .create(path.menu_id, path.submenu_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(dish)))
}

/// PATCH /api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id}
#[instrument(skip_all, fields(
    menu_id = %path.menu_id,
    submenu_id = %path.submenu_id,
    dish_id = %path.dish_id
))]
pub async fn update_dish(
    State(state): State<AppState>,
    Path(path): Path<DishPath>,
    Json(payload): Json<DishPayload>,
) -> Result<Json<Dish>, AppError> {
    let dish = state
        .dishes()
        .update(path.menu_id, path.submenu_id, path.dish_id, payload)
        .await?;
    Ok(Json(dish))
}

/// DELETE /api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id}
#[instrument(skip_all, fields(
    menu_id = %path.menu_id,
    submenu_id = %path.submenu_id,
    dish_id = %path.dish_id
))]
pub async fn delete_dish(
    State(state): State<AppState>,
    Path(path): Path<DishPath>,
) -> Result<Json<Confirmation>, AppError> {
    let confirmation = state
        .dishes()
        .delete(path.menu_id, path.submenu_id, path.dish_id)
        .await?;
    Ok(Json(confirmation))
}

// Path extractors

#[derive(Debug, Deserialize)]
pub struct SubmenuPath {
    pub menu_id: MenuId,
    pub submenu_id: SubmenuId,
}

#[derive(Debug, Deserialize)]
pub struct DishPath {
    pub menu_id: MenuId,
    pub submenu_id: SubmenuId,
    pub dish_id: DishId,
}
