//! One-shot utility: provision the default admin accounts.
//!
//! Requires `DATABASE_URL`; the password comes from `SEED_ADMIN_PASSWORD`
//! (falling back to a well-known dev default).

use assetforge_infra::store::PostgresStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    assetforge_observability::init();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set to seed admin users"))?;
    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!("SEED_ADMIN_PASSWORD not set; using the dev default");
        "Admin123!".to_string()
    });

    let store = PostgresStore::connect(&database_url).await?;
    let created = assetforge_infra::seed_default_admins(&store, &password).await?;

    tracing::info!(created = created.len(), "admin seeding complete");
    Ok(())
}
