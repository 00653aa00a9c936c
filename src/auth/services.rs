//! Registration and login.
//!
//! Create: validate -> hash -> insert. Login: validate -> look up by email ->
//! verify -> issue token. Any failing step ends the request; nothing here is
//! retried and nothing is written before the single insert.

use std::sync::Arc;

use lazy_static::lazy_static;
use tracing::{error, info, warn};

use crate::auth::{
    dto::{PublicUser, UserPayload},
    errors::AccountError,
    jwt::TokenIssuer,
    password::{hash_password, verify_password},
    repo::{StoreError, UserStore},
    repo_types::NewUser,
    validation::{validate_for_create, validate_for_login},
};

lazy_static! {
    // Verified against when the email is unknown, so both login failures cost
    // the same hashing work.
    static ref DUMMY_HASH: Option<String> = hash_password("gira-dummy-password").ok();
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    issuer: Arc<dyn TokenIssuer>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self { store, issuer }
    }

    pub fn issuer(&self) -> &dyn TokenIssuer {
        self.issuer.as_ref()
    }

    /// Register a user. The returned record never carries password material.
    pub async fn create(&self, payload: UserPayload) -> Result<PublicUser, AccountError> {
        if let Err(e) = validate_for_create(&payload) {
            warn!(field = e.field, "create user: validation failed");
            return Err(e.into());
        }

        let password_hash = hash_password(&payload.password).map_err(|e| {
            error!(error = %e, "create user: hashing failed");
            AccountError::Storage
        })?;
        let new_user = NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
        };

        match self.store.insert(new_user).await {
            Ok(user) => {
                info!(user_id = %user.id, "user registered");
                Ok(user.into())
            }
            Err(StoreError::EmailConflict) => {
                warn!("create user: email already registered");
                Err(AccountError::EmailConflict)
            }
            Err(StoreError::UsernameConflict) => {
                warn!("create user: username already taken");
                Err(AccountError::UsernameConflict)
            }
            Err(e) => {
                error!(error = %e, "create user: insert failed");
                Err(AccountError::Storage)
            }
        }
    }

    /// Check `email`/`password` and mint a bearer token for the account.
    pub async fn authenticate(&self, credentials: &UserPayload) -> Result<String, AccountError> {
        if let Err(e) = validate_for_login(credentials) {
            warn!(field = e.field, "login: validation failed");
            return Err(e.into());
        }

        let user = match self.store.find_by_email(&credentials.email).await {
            Ok(u) => u,
            Err(StoreError::NotFound) => {
                verify_password(&credentials.password, DUMMY_HASH.as_deref());
                warn!("login: unknown email");
                return Err(AccountError::AuthenticationFailed);
            }
            Err(e) => {
                error!(error = %e, "login: user lookup failed");
                return Err(AccountError::Storage);
            }
        };

        if !verify_password(&credentials.password, Some(&user.password_hash)) {
            warn!(user_id = %user.id, "login: invalid password");
            return Err(AccountError::AuthenticationFailed);
        }

        let token = self.issuer.issue(user.id).map_err(|e| {
            error!(error = %e, user_id = %user.id, "login: token signing failed");
            AccountError::Storage
        })?;

        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }
}
