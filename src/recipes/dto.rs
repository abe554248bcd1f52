use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// Request body for adding or editing a recipe. `ingredients` accepts either
/// a JSON array of strings or a single comma-joined string (the form the old
/// UI submits); both are normalized before storage.
#[derive(Debug, Deserialize)]
pub struct RecipeBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub ingredients: Value,
}

#[derive(Debug, Serialize)]
pub struct RecipeItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub ingredients: Vec<String>,
    pub created_at: OffsetDateTime,
}
