use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A recipe row as stored. `ingredients` is JSONB: normally an array of
/// strings, but legacy rows hold a single comma-joined string.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub ingredients: Value,
    pub created_at: OffsetDateTime,
}

/// Normalized projection consumed by the assistant: ingredients are always a
/// list of trimmed, non-empty tokens, whatever shape the row held.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub ingredients: Vec<String>,
}

/// Tolerate the legacy persisted form: a comma-joined string instead of an
/// array. Empty tokens are dropped, whitespace trimmed; anything else
/// normalizes to an empty list rather than surfacing an error.
pub fn normalize_ingredients(raw: &Value) -> Vec<String> {
    let tokens: Vec<String> = match raw {
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };
    tokens
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

impl RecipeRow {
    pub fn normalized(self) -> Recipe {
        let ingredients = normalize_ingredients(&self.ingredients);
        Recipe {
            id: self.id,
            name: self.name,
            description: self.description,
            instructions: self.instructions,
            ingredients,
        }
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<RecipeRow>> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, user_id, name, description, instructions, ingredients, created_at
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        description: &str,
        instructions: &str,
        ingredients: &[String],
    ) -> anyhow::Result<RecipeRow> {
        let row = sqlx::query_as::<_, RecipeRow>(
            r#"
            INSERT INTO recipes (user_id, name, description, instructions, ingredients)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, description, instructions, ingredients, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(instructions)
        .bind(Value::from(ingredients.to_vec()))
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        name: &str,
        description: &str,
        instructions: &str,
        ingredients: &[String],
    ) -> anyhow::Result<Option<RecipeRow>> {
        let row = sqlx::query_as::<_, RecipeRow>(
            r#"
            UPDATE recipes
            SET name = $3, description = $4, instructions = $5, ingredients = $6
            WHERE id = $2 AND user_id = $1
            RETURNING id, user_id, name, description, instructions, ingredients, created_at
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(instructions)
        .bind(Value::from(ingredients.to_vec()))
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM recipes
            WHERE id = $2 AND user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_rows_pass_through_trimmed() {
        let tokens = normalize_ingredients(&json!(["ou", " faina ", "lapte"]));
        assert_eq!(tokens, vec!["ou", "faina", "lapte"]);
    }

    #[test]
    fn legacy_string_rows_split_on_commas() {
        let tokens = normalize_ingredients(&json!("ou,faina,lapte"));
        assert_eq!(tokens, vec!["ou", "faina", "lapte"]);
    }

    #[test]
    fn empty_tokens_are_dropped() {
        let tokens = normalize_ingredients(&json!("ou,,lapte"));
        assert_eq!(tokens, vec!["ou", "lapte"]);
        let tokens = normalize_ingredients(&json!("ou,faina,lapte,"));
        assert_eq!(tokens, vec!["ou", "faina", "lapte"]);
    }

    #[test]
    fn non_list_shapes_normalize_to_empty() {
        assert!(normalize_ingredients(&json!(null)).is_empty());
        assert!(normalize_ingredients(&json!(42)).is_empty());
        assert!(normalize_ingredients(&json!({"a": 1})).is_empty());
        assert!(normalize_ingredients(&json!("")).is_empty());
    }
}
