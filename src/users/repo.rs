use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record, always owned by exactly one Customer. Every query here is
/// scoped by `customer_id`, so a user belonging to another customer is
/// indistinguishable from a missing one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn list_by_customer(
        db: &PgPool,
        customer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, customer_id, username, email, password_hash, created_at
            FROM users
            WHERE customer_id = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_owned(
        db: &PgPool,
        customer_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, customer_id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1 AND customer_id = $2
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create(
        db: &PgPool,
        customer_id: Uuid,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (customer_id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, customer_id, username, email, password_hash, created_at
            "#,
        )
        .bind(customer_id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        customer_id: Uuid,
        id: Uuid,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $3, email = $4, password_hash = $5
            WHERE id = $1 AND customer_id = $2
            RETURNING id, customer_id, username, email, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Returns whether a row owned by `customer_id` was actually removed.
    pub async fn delete_owned(db: &PgPool, customer_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND customer_id = $2")
            .bind(id)
            .bind(customer_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::Customer;
    use sqlx::postgres::PgPoolOptions;

    async fn test_pool() -> PgPool {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect to database");
        sqlx::migrate!("./migrations").run(&pool).await.expect("migrate");
        pool
    }

    async fn make_customer(db: &PgPool, label: &str) -> Customer {
        let suffix = Uuid::new_v4().simple().to_string();
        Customer::create(
            db,
            &format!("{label}-{suffix}@example.com"),
            "$argon2id$unused",
            &format!("Customer {label}"),
            &["client".to_string()],
        )
        .await
        .expect("create customer")
    }

    #[tokio::test]
    #[ignore = "requires a live Postgres at DATABASE_URL"]
    async fn other_customers_cannot_see_or_delete_a_user() {
        let db = test_pool().await;
        let owner = make_customer(&db, "owner").await;
        let other = make_customer(&db, "other").await;

        let suffix = Uuid::new_v4().simple().to_string();
        let user = User::create(
            &db,
            owner.id,
            &format!("u-{suffix}"),
            &format!("u-{suffix}@example.com"),
            "$argon2id$unused",
        )
        .await
        .expect("create user");

        assert!(User::find_owned(&db, other.id, user.id)
            .await
            .expect("query")
            .is_none());
        assert!(!User::delete_owned(&db, other.id, user.id)
            .await
            .expect("query"));

        // The owner still sees it and may remove it.
        let found = User::find_owned(&db, owner.id, user.id)
            .await
            .expect("query")
            .expect("owner sees own user");
        assert_eq!(found.id, user.id);
        assert!(User::delete_owned(&db, owner.id, user.id)
            .await
            .expect("query"));
    }

    #[tokio::test]
    #[ignore = "requires a live Postgres at DATABASE_URL"]
    async fn list_is_scoped_and_ordered_by_id() {
        let db = test_pool().await;
        let owner = make_customer(&db, "lister").await;
        let other = make_customer(&db, "bystander").await;

        for i in 0..4 {
            let suffix = Uuid::new_v4().simple().to_string();
            User::create(
                &db,
                owner.id,
                &format!("u{i}-{suffix}"),
                &format!("u{i}-{suffix}@example.com"),
                "$argon2id$unused",
            )
            .await
            .expect("create user");
        }

        let page = User::list_by_customer(&db, owner.id, 3, 0).await.expect("list");
        assert_eq!(page.len(), 3);
        assert!(page.windows(2).all(|w| w[0].id <= w[1].id));
        assert!(page.iter().all(|u| u.customer_id == owner.id));

        let rest = User::list_by_customer(&db, owner.id, 3, 3).await.expect("list");
        assert_eq!(rest.len(), 1);

        assert!(User::list_by_customer(&db, other.id, 3, 0)
            .await
            .expect("list")
            .is_empty());
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("jdoe@example.com"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2id"));
    }
}
