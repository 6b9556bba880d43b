use once_cell::sync::Lazy;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::env;
use std::time::Duration;

/// Resolved connection string: `DATABASE_URL` env wins, then config.toml,
/// then the local SQLite default so a fresh checkout runs unconfigured.
pub static DATABASE_URL: Lazy<String> = Lazy::new(|| {
    // Load .env if present
    let _ = dotenvy::dotenv();
    if let Ok(url) = env::var("DATABASE_URL") {
        return url;
    }
    match configs::load_default() {
        Ok(mut cfg) => {
            cfg.database.normalize_from_env();
            cfg.database.url
        }
        Err(_) => configs::DEFAULT_DATABASE_URL.to_string(),
    }
});

pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let pool = configs::load_default()
        .map(|cfg| cfg.database)
        .unwrap_or_default();
    let mut opt = ConnectOptions::new(DATABASE_URL.as_str());
    if pool.max_connections > 0 {
        opt.max_connections(pool.max_connections)
            .min_connections(pool.min_connections)
            .connect_timeout(Duration::from_secs(pool.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(pool.idle_timeout_secs))
            .acquire_timeout(Duration::from_secs(pool.acquire_timeout_secs));
    }
    opt.sqlx_logging(pool.sqlx_logging);
    let db = Database::connect(opt).await?;
    Ok(db)
}

/// Connect to an explicit URL, bypassing env/config resolution. Used by the
/// test suites for isolated databases. An in-memory SQLite store is pinned to
/// a single pooled connection, otherwise every checkout would see a
/// different empty database.
pub async fn connect_to(url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(url);
    if url.contains(":memory:") {
        opt.max_connections(1).min_connections(1);
    }
    opt.sqlx_logging(false);
    let db = Database::connect(opt).await?;
    Ok(db)
}
