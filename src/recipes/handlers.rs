use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, state::AppState};

use super::dto::{RecipeBody, RecipeItem};
use super::repo::{normalize_ingredients, RecipeRow};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(add_recipe))
        .route("/recipes/:id", put(edit_recipe).delete(delete_recipe))
}

fn to_item(row: RecipeRow) -> RecipeItem {
    let created_at = row.created_at;
    let recipe = row.normalized();
    RecipeItem {
        id: recipe.id,
        name: recipe.name,
        description: recipe.description,
        instructions: recipe.instructions,
        ingredients: recipe.ingredients,
        created_at,
    }
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<RecipeItem>>, (StatusCode, String)> {
    let rows = RecipeRow::list_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(rows.into_iter().map(to_item).collect()))
}

#[instrument(skip(state, payload))]
pub async fn add_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RecipeBody>,
) -> Result<(StatusCode, Json<RecipeItem>), (StatusCode, String)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name is required".into()));
    }
    let ingredients = normalize_ingredients(&payload.ingredients);
    let row = RecipeRow::create(
        &state.db,
        user_id,
        name,
        &payload.description,
        &payload.instructions,
        &ingredients,
    )
    .await
    .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(to_item(row))))
}

#[instrument(skip(state, payload))]
pub async fn edit_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipeBody>,
) -> Result<Json<RecipeItem>, (StatusCode, String)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name is required".into()));
    }
    let ingredients = normalize_ingredients(&payload.ingredients);
    match RecipeRow::update(
        &state.db,
        user_id,
        id,
        name,
        &payload.description,
        &payload.instructions,
        &ingredients,
    )
    .await
    .map_err(internal)?
    {
        Some(row) => Ok(Json(to_item(row))),
        None => {
            warn!(%user_id, %id, "edit of missing recipe");
            Err((StatusCode::NOT_FOUND, "Recipe not found".into()))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if RecipeRow::delete(&state.db, user_id, id)
        .await
        .map_err(internal)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Recipe not found".into()))
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
