use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, NewUser, StoreError, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Tables>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .by_email
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        // Check and write under one lock so concurrent signups cannot both win.
        let mut tables = self.inner.write().await;
        if tables.by_email.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.by_email.insert(row.email.clone(), row.id);
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".into(),
            email: email.into(),
            password_hash: "$argon2id$stub".into(),
        }
    }

    #[tokio::test]
    async fn insert_then_find_by_email_and_id() {
        let store = MemoryCredentialStore::new();
        let created = store.insert(new_user("ann@x.com")).await.expect("insert");

        let by_email = store.find_by_email("ann@x.com").await.unwrap().expect("by email");
        assert_eq!(by_email.id, created.id);

        let by_id = store.find_by_id(created.id).await.unwrap().expect("by id");
        assert_eq!(by_id.email, "ann@x.com");
        assert_eq!(by_id.name, "Ann");
    }

    #[tokio::test]
    async fn missing_rows_are_none() {
        let store = MemoryCredentialStore::new();
        assert!(store.find_by_email("nobody@x.com").await.unwrap().is_none());
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_insert_with_same_email_is_rejected() {
        let store = MemoryCredentialStore::new();
        store.insert(new_user("ann@x.com")).await.expect("first insert");

        let err = store.insert(new_user("ann@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(ref e) if e == "ann@x.com"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_inserts_keep_email_unique() {
        let store = Arc::new(MemoryCredentialStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(new_user("race@x.com")).await
            }));
        }

        let mut created = 0;
        for h in handles {
            if h.await.expect("join").is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }
}
