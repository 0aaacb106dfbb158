use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderName;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/planner";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_ACTOR_HEADER: &str = "x-user-id";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub storage: StorageBackend,
    pub server_addr: SocketAddr,
    /// Trusted header carrying the authenticated user id.
    pub actor_header: HeaderName,
    /// Enables HSTS.
    pub production: bool,
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Self {
        let production = get("RUST_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        let actor_header = get("ACTOR_HEADER")
            .and_then(|name| match HeaderName::from_bytes(name.trim().as_bytes()) {
                Ok(header) => Some(header),
                Err(e) => {
                    tracing::warn!("Config: invalid ACTOR_HEADER '{}': {}", name, e);
                    None
                }
            })
            .unwrap_or_else(|| HeaderName::from_static(DEFAULT_ACTOR_HEADER));

        Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parse_or(
                &get,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            ),
            storage: parse_or(&get, "STORAGE_BACKEND", StorageBackend::Postgres),
            server_addr: parse_or(
                &get,
                "SERVER_ADDR",
                SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            ),
            actor_header,
            production,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
        }
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Config: invalid {} '{}' ({}), using default", key, raw, e);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database_max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.server_addr.to_string(), "0.0.0.0:3001");
        assert_eq!(config.actor_header.as_str(), DEFAULT_ACTOR_HEADER);
        assert!(!config.production);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STORAGE_BACKEND", "Memory"),
            ("SERVER_ADDR", "127.0.0.1:8080"),
            ("ACTOR_HEADER", "X-Authenticated-User"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("RUST_ENV", "production"),
        ]);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.server_addr.port(), 8080);
        assert_eq!(config.actor_header.as_str(), "x-authenticated-user");
        assert_eq!(config.database_max_connections, 12);
        assert!(config.production);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("STORAGE_BACKEND", "redis"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
            ("ACTOR_HEADER", "not a header"),
        ]);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.database_max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.actor_header.as_str(), DEFAULT_ACTOR_HEADER);
    }
}
