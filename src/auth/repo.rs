use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Customer record: the authentication principal. Owns zero or more Users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub roles: Vec<String>,
    pub created_at: OffsetDateTime,
}

impl Customer {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, email, password_hash, name, roles, created_at
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(customer)
    }

    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
        roles: &[String],
    ) -> anyhow::Result<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (email, password_hash, name, roles)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, name, roles, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(roles)
        .fetch_one(db)
        .await?;
        Ok(customer)
    }
}
