use serde::Deserialize;

/// Request body for adding or editing a fridge item.
#[derive(Debug, Deserialize)]
pub struct IngredientBody {
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}
