use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres URL. Without one the service runs on the in-memory store.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub store_timeout_ms: u64,
    pub password_min_len: usize,
    pub base_path: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "order-mgmt".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "order-mgmt-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let store_timeout_ms = std::env::var("STORE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5_000);
        let password_min_len = std::env::var("PASSWORD_MIN_LEN")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1);
        let base_path = normalize_base_path(
            &std::env::var("AUTH_BASE_PATH").unwrap_or_else(|_| "/auth".into()),
        );
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v.parse::<u16>().context("APP_PORT must be a port number")?,
            Err(_) => 8080,
        };
        Ok(Self {
            database_url,
            jwt,
            store_timeout_ms,
            password_min_len,
            base_path,
            host,
            port,
        })
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Leading slash, no trailing slash. The root collapses to "".
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(normalize_base_path("/auth"), "/auth");
        assert_eq!(normalize_base_path("auth/"), "/auth");
        assert_eq!(normalize_base_path("/api/v1/auth/"), "/api/v1/auth");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
    }

    fn config_with_host(host: &str, port: u16) -> AppConfig {
        AppConfig {
            database_url: None,
            jwt: JwtConfig {
                secret: "s".into(),
                issuer: "i".into(),
                audience: "a".into(),
                ttl_minutes: 5,
            },
            store_timeout_ms: 5_000,
            password_min_len: 1,
            base_path: "/auth".into(),
            host: host.into(),
            port,
        }
    }

    #[test]
    fn listen_addr_joins_host_and_port() {
        let addr = config_with_host("127.0.0.1", 9090).listen_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:9090");
    }

    #[test]
    fn listen_addr_rejects_bad_host() {
        assert!(config_with_host("not a host", 8080).listen_addr().is_err());
    }
}
