//! Loads demo fixtures: two customers and a product catalog with random
//! prices. Run once against an empty database: `cargo run --bin seed`.

use rand::Rng;
use rust_decimal::Decimal;

use bilemo::auth::password::hash_password;
use bilemo::auth::repo::Customer;
use bilemo::products::repo::Product;
use bilemo::state::AppState;

const BRANDS: &[&str] = &["Acme", "Globex", "Initech", "Umbrella", "Stark"];
const NAMES: &[&str] = &[
    "Widget", "Gadget", "Sprocket", "Gizmo", "Doohickey", "Contraption",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "seed=info".into()))
        .init();

    let state = AppState::init().await?;
    sqlx::migrate!("./migrations").run(&state.db).await?;

    let (existing,): (i64,) = sqlx::query_as("SELECT count(*) FROM customers")
        .fetch_one(&state.db)
        .await?;
    if existing > 0 {
        tracing::info!("database already seeded, nothing to do");
        return Ok(());
    }

    let client = Customer::create(
        &state.db,
        "client@example.com",
        &hash_password("client-password")?,
        "Demo Client",
        &["client".to_string()],
    )
    .await?;
    let admin = Customer::create(
        &state.db,
        "admin@example.com",
        &hash_password("admin-password")?,
        "Demo Admin",
        &["client".to_string(), "admin".to_string()],
    )
    .await?;
    tracing::info!(client = %client.id, admin = %admin.id, "customers created");

    let mut rng = rand::thread_rng();
    for brand in BRANDS {
        for name in NAMES {
            // 8.00 .. 5000.00, two decimal places
            let price = Decimal::new(rng.gen_range(800..=500_000), 2);
            Product::create(
                &state.db,
                &format!("{brand} {name}"),
                price,
                Some(&format!("{name} by {brand}")),
                brand,
            )
            .await?;
        }
    }
    tracing::info!(count = BRANDS.len() * NAMES.len(), "products created");

    Ok(())
}
