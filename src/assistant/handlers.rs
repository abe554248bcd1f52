use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    assistant::{
        router,
        session::{ChatRole, ChatTurn},
    },
    auth::jwt::AuthUser,
    fridge::repo::Ingredient,
    recipes::repo::RecipeRow,
    state::AppState,
};

pub fn assistant_routes() -> Router<AppState> {
    Router::new().route("/assistant", get(open_assistant).post(send_message))
}

#[derive(Debug, Serialize)]
pub struct AssistantView {
    pub history: Vec<ChatTurn>,
    pub fridge: Vec<Ingredient>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub history: Vec<ChatTurn>,
}

/// Opening the assistant view starts a fresh session: the previous chat log
/// is dropped and the current fridge snapshot is returned alongside.
#[instrument(skip(state))]
pub async fn open_assistant(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<AssistantView>, (StatusCode, String)> {
    state.sessions.clear(user_id);
    let fridge = Ingredient::list_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(AssistantView {
        history: Vec::new(),
        fridge,
    }))
}

/// One chat turn: snapshot fridge and recipes, log the user turn, route, log
/// the assistant turn. The router converts every generation failure into a
/// reply string, so this handler only fails on storage errors.
#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<ChatReply>, (StatusCode, String)> {
    let fridge = Ingredient::list_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    let recipes: Vec<_> = RecipeRow::list_by_user(&state.db, user_id)
        .await
        .map_err(internal)?
        .into_iter()
        .map(RecipeRow::normalized)
        .collect();

    let hour = OffsetDateTime::now_utc().hour();

    state
        .sessions
        .append(user_id, ChatRole::User, payload.message.clone());
    let reply = router::route(
        &payload.message,
        &fridge,
        &recipes,
        hour,
        state.ai.as_ref(),
    )
    .await;
    state
        .sessions
        .append(user_id, ChatRole::Assistant, reply.clone());

    Ok(Json(ChatReply {
        reply,
        history: state.sessions.history(user_id),
    }))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
