use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::repo_types::{NewUser, User};

const EMAIL_CONSTRAINT: &str = "users_email_key";
const USERNAME_CONSTRAINT: &str = "users_username_key";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already exists")]
    EmailConflict,
    #[error("username already exists")]
    UsernameConflict,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Persistence for user accounts.
///
/// Uniqueness of `username` and `email` is enforced here, atomically with the
/// insert; callers never check-then-insert.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    /// Create a new user with hashed password.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(classify_insert_error)
    }

    /// Find a user by email.
    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| StoreError::Other(anyhow::Error::new(e).context("find user by email")))?
        .ok_or(StoreError::NotFound)
    }
}

fn classify_insert_error(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            if let Some(conflict) = conflict_for_constraint(db_err.constraint()) {
                return conflict;
            }
        }
    }
    StoreError::Other(anyhow::Error::new(err).context("insert user"))
}

/// Map a violated unique constraint to the field it guards.
fn conflict_for_constraint(constraint: Option<&str>) -> Option<StoreError> {
    match constraint {
        Some(EMAIL_CONSTRAINT) => Some(StoreError::EmailConflict),
        Some(USERNAME_CONSTRAINT) => Some(StoreError::UsernameConflict),
        _ => None,
    }
}

#[cfg(test)]
pub mod memory {
    use std::sync::Mutex;

    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    /// Mutex-guarded stand-in for the users table.
    #[derive(Default)]
    pub struct InMemoryUserStore {
        users: Mutex<Vec<User>>,
    }

    impl InMemoryUserStore {
        pub fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UserStore for InMemoryUserStore {
        async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(StoreError::EmailConflict);
            }
            if users.iter().any(|u| u.username == user.username) {
                return Err(StoreError::UsernameConflict);
            }
            let stored = User {
                id: Uuid::new_v4(),
                username: user.username,
                email: user.email,
                password_hash: user.password_hash,
                created_at: OffsetDateTime::now_utc(),
            };
            users.push(stored.clone());
            Ok(stored)
        }

        async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned()
                .ok_or(StoreError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryUserStore;
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn memory_store_enforces_uniqueness() {
        let store = InMemoryUserStore::default();
        let created = store.insert(new_user("test", "test@test.com")).await.unwrap();
        assert_eq!(created.username, "test");

        let err = store.insert(new_user("other", "test@test.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::EmailConflict));

        let err = store.insert(new_user("test", "other@test.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UsernameConflict));

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn memory_store_finds_by_email() {
        let store = InMemoryUserStore::default();
        let created = store.insert(new_user("test", "test@test.com")).await.unwrap();

        let found = store.find_by_email("test@test.com").await.unwrap();
        assert_eq!(found.id, created.id);

        let err = store.find_by_email("nobody@test.com").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn unique_constraints_map_to_conflicts() {
        assert!(matches!(
            conflict_for_constraint(Some("users_email_key")),
            Some(StoreError::EmailConflict)
        ));
        assert!(matches!(
            conflict_for_constraint(Some("users_username_key")),
            Some(StoreError::UsernameConflict)
        ));
        assert!(conflict_for_constraint(Some("users_pkey")).is_none());
        assert!(conflict_for_constraint(None).is_none());
    }

    #[test]
    fn non_database_errors_are_opaque() {
        let err = classify_insert_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Other(_)));
    }
}
