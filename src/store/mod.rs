//! Credential store: the only shared mutable resource behind the auth flows.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod postgres;
mod types;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;
pub use types::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("email {0} violates the unique constraint")]
    DuplicateEmail(String),

    #[error("could not map store row: {0}")]
    Mapping(String),

    #[error("store backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Keyed record store for the `users` collection.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Insert a user and return the created row.
    ///
    /// Implementations must reject a second row with the same email with
    /// [`StoreError::DuplicateEmail`], even under concurrent inserts.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}

/// Run a store call under `limit`. Fails with [`StoreError::Timeout`] instead of waiting longer.
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bounded_passes_through_fast_calls() {
        let out = bounded(Duration::from_millis(100), async { Ok::<_, StoreError>(7) })
            .await
            .expect("fast call");
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn bounded_times_out_slow_calls() {
        let err = bounded(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)));
    }
}
