pub mod handlers;
pub mod meal_time;
pub mod prompts;
pub mod router;
pub mod session;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::assistant_routes()
}
