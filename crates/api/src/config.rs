//! Environment-driven configuration, read once at startup.

use chrono::Duration;

/// Runtime configuration for the API process.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HS256 signing/verification secret (`JWT_SECRET`).
    pub jwt_secret: String,
    /// PostgreSQL connection string. `None` selects the in-memory stores
    /// (dev mode).
    pub database_url: Option<String>,
    /// Listen port (`PORT`), default 8080.
    pub port: u16,
    /// Lifetime of issued tokens (`TOKEN_TTL_SECS`), default one hour.
    pub token_ttl: Duration,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let token_ttl_secs: i64 = std::env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        Self {
            jwt_secret,
            database_url: std::env::var("DATABASE_URL").ok(),
            port,
            token_ttl: Duration::seconds(token_ttl_secs),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
