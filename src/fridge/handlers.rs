use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, state::AppState};

use super::dto::IngredientBody;
use super::repo::Ingredient;

pub fn fridge_routes() -> Router<AppState> {
    Router::new()
        .route("/fridge", get(list_items).post(add_item))
        .route("/fridge/:id", put(edit_item).delete(delete_item))
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Ingredient>>, (StatusCode, String)> {
    let items = Ingredient::list_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(items))
}

#[instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<IngredientBody>,
) -> Result<(StatusCode, Json<Ingredient>), (StatusCode, String)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name is required".into()));
    }
    let item = Ingredient::create(&state.db, user_id, name, payload.quantity, &payload.unit)
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state, payload))]
pub async fn edit_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<IngredientBody>,
) -> Result<Json<Ingredient>, (StatusCode, String)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name is required".into()));
    }
    match Ingredient::update(&state.db, user_id, id, name, payload.quantity, &payload.unit)
        .await
        .map_err(internal)?
    {
        Some(item) => Ok(Json(item)),
        None => {
            warn!(%user_id, %id, "edit of missing ingredient");
            Err((StatusCode::NOT_FOUND, "Ingredient not found".into()))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if Ingredient::delete(&state.db, user_id, id)
        .await
        .map_err(internal)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Ingredient not found".into()))
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
