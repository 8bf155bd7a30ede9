use std::sync::Arc;

use crate::auth::jwt::{JwtKeys, TokenIssuer};
use crate::config::AppConfig;
use crate::store::{CredentialStore, MemoryCredentialStore, PgCredentialStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let store = match config.database_url.as_deref() {
            Some(url) => {
                let pg = PgCredentialStore::connect(url, config.store_timeout()).await?;
                if let Err(e) = pg.migrate().await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }
                Arc::new(pg) as Arc<dyn CredentialStore>
            }
            None => {
                tracing::warn!("DATABASE_URL not set; users are kept in memory only");
                Arc::new(MemoryCredentialStore::new()) as Arc<dyn CredentialStore>
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// State with HS256 tokens from `config.jwt` over the given store.
    pub fn with_store(config: AppConfig, store: Arc<dyn CredentialStore>) -> Self {
        let tokens = Arc::new(JwtKeys::from_config(&config.jwt)) as Arc<dyn TokenIssuer>;
        Self::from_parts(store, tokens, Arc::new(config))
    }

    pub fn from_parts(
        store: Arc<dyn CredentialStore>,
        tokens: Arc<dyn TokenIssuer>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            tokens,
            config,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::with_store(test_config(), Arc::new(MemoryCredentialStore::new()))
    }
}

#[cfg(test)]
pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: None,
        jwt: crate::config::JwtConfig {
            secret: "test".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        },
        store_timeout_ms: 5_000,
        password_min_len: 1,
        base_path: "/auth".into(),
        host: "127.0.0.1".into(),
        port: 0,
    }
}
