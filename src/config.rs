use std::env;

// ============================================================================
// Runtime Configuration
// ============================================================================

/// Settings pulled from the environment at startup. There is no config
/// file; everything is overridable per-deployment the same way logging is
/// (RUST_LOG).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds, e.g. "0.0.0.0:8080".
    pub bind_addr: String,
    /// Postgres connection string. Unset means in-memory storage.
    pub database_url: Option<String>,
    /// Maximum connections in the Postgres pool.
    pub max_db_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            max_db_connections: env::var("MAX_DB_CONNECTIONS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(5),
        }
    }
}
