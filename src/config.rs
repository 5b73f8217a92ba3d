use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub jwt_secret: String,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub cache_default_ttl_secs: u64,
    pub search_cache_ttl_secs: u64,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://reelrate.db?mode=rwc".to_string());

        let jwt_secret = std::env::var("JWT_SECRET_KEY").context("JWT_SECRET_KEY")?;

        let tmdb_api_key = std::env::var("TMDB_API_KEY").context("TMDB_API_KEY")?;
        let tmdb_base_url = std::env::var("TMDB_BASE_URL")
            .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string());

        let cache_default_ttl_secs: u64 =
            std::env::var("CACHE_DEFAULT_TTL_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(300);

        let search_cache_ttl_secs: u64 = std::env::var("SEARCH_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86_400);

        let http_timeout_secs: u64 =
            std::env::var("HTTP_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(10);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            jwt_secret,
            tmdb_api_key,
            tmdb_base_url,
            cache_default_ttl_secs,
            search_cache_ttl_secs,
            http_timeout_secs,
        })
    }
}
