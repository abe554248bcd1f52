use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A stored fridge item. Duplicate names per user are allowed; the assistant
/// reads these as an immutable snapshot per request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl Ingredient {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, user_id, name, quantity, unit
            FROM ingredients
            WHERE user_id = $1
            ORDER BY created_at ASC
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
        quantity: f64,
        unit: &str,
    ) -> anyhow::Result<Ingredient> {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (user_id, name, quantity, unit)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, quantity, unit
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(quantity)
        .bind(unit)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        name: &str,
        quantity: f64,
        unit: &str,
    ) -> anyhow::Result<Option<Ingredient>> {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            UPDATE ingredients
            SET name = $3, quantity = $4, unit = $5
            WHERE id = $2 AND user_id = $1
            RETURNING id, user_id, name, quantity, unit
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(name)
        .bind(quantity)
        .bind(unit)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM ingredients
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
