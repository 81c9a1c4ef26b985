//! Collaborator wiring: stores + token codec, selected once at startup.

use std::sync::Arc;

use chrono::Duration;

use assetforge_auth::Hs256TokenCodec;
use assetforge_infra::store::{
    AssetStore, CategoryStore, DepartmentStore, HealthProbe, InMemoryStore, PostgresStore,
    StatsStore, UserStore,
};

use crate::config::ApiConfig;

/// Process-wide collaborator handles.
///
/// Constructed once at startup and shared immutably by reference; request
/// handling never mutates these.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<dyn UserStore>,
    pub assets: Arc<dyn AssetStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub departments: Arc<dyn DepartmentStore>,
    pub stats: Arc<dyn StatsStore>,
    pub health: Arc<dyn HealthProbe>,
    pub tokens: Arc<Hs256TokenCodec>,
    pub token_ttl: Duration,
}

/// Wire services from config: PostgreSQL when `DATABASE_URL` is set, the
/// in-memory stores otherwise (dev mode).
pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let tokens = Arc::new(Hs256TokenCodec::new(config.jwt_secret.as_bytes()));

    match &config.database_url {
        Some(url) => {
            let store = Arc::new(PostgresStore::connect(url).await?);
            tracing::info!("connected to postgres");
            Ok(wire(store, tokens, config.token_ttl))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores (dev mode)");
            Ok(wire(
                Arc::new(InMemoryStore::new()),
                tokens,
                config.token_ttl,
            ))
        }
    }
}

/// Wire services over the in-memory stores (tests, dev tooling).
pub fn build_services_in_memory(jwt_secret: &str, token_ttl: Duration) -> AppServices {
    wire(
        Arc::new(InMemoryStore::new()),
        Arc::new(Hs256TokenCodec::new(jwt_secret.as_bytes())),
        token_ttl,
    )
}

fn wire<S>(store: Arc<S>, tokens: Arc<Hs256TokenCodec>, token_ttl: Duration) -> AppServices
where
    S: UserStore
        + AssetStore
        + CategoryStore
        + DepartmentStore
        + StatsStore
        + HealthProbe
        + 'static,
{
    AppServices {
        users: store.clone(),
        assets: store.clone(),
        categories: store.clone(),
        departments: store.clone(),
        stats: store.clone(),
        health: store,
        tokens,
        token_ttl,
    }
}
