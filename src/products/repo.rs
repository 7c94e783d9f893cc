use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Product record. Not owned by anyone; readable by any client.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub brand: String,
    pub created_at: OffsetDateTime,
}

impl Product {
    /// Stable `ORDER BY id` keeps pagination deterministic across requests.
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, brand, created_at
            FROM products
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, brand, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        price: Decimal,
        description: Option<&str>,
        brand: &str,
    ) -> anyhow::Result<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, description, brand)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, description, brand, created_at
            "#,
        )
        .bind(name)
        .bind(price)
        .bind(description)
        .bind(brand)
        .fetch_one(db)
        .await?;
        Ok(product)
    }

    /// Returns `RowNotFound` when the product vanished between the caller's
    /// existence check and this statement, so the API can answer 404.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        price: Decimal,
        description: Option<&str>,
        brand: &str,
    ) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2, price = $3, description = $4, brand = $5
            WHERE id = $1
            RETURNING id, name, price, description, brand, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .bind(description)
        .bind(brand)
        .fetch_one(db)
        .await
    }

    /// Returns whether a row was actually removed.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
