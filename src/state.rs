use crate::auth::jwt::JwtKeys;
use crate::auth::repo::{PgUserStore, UserStore};
use crate::auth::services::AccountService;
use crate::config::{AppConfig, JwtConfig};
use crate::games::repo::{GameStore, PgGameStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub games: Arc<dyn GameStore>,
}

impl AppState {
    pub fn init(config: &AppConfig, db: PgPool) -> anyhow::Result<Self> {
        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let games = Arc::new(PgGameStore::new(db)) as Arc<dyn GameStore>;
        Self::from_parts(&config.jwt, users, games)
    }

    /// Wire the services over arbitrary stores. The signing secret is copied
    /// into the keys here and is read-only from then on.
    pub fn from_parts(
        jwt: &JwtConfig,
        users: Arc<dyn UserStore>,
        games: Arc<dyn GameStore>,
    ) -> anyhow::Result<Self> {
        let keys = Arc::new(JwtKeys::new(jwt)?);
        Ok(Self {
            accounts: AccountService::new(users, keys),
            games,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::auth::repo::memory::InMemoryUserStore;
        use crate::games::repo::memory::InMemoryGameStore;

        let jwt = JwtConfig {
            secret: "test".into(),
            ..JwtConfig::default()
        };
        Self::from_parts(
            &jwt,
            Arc::new(InMemoryUserStore::default()),
            Arc::new(InMemoryGameStore::default()),
        )
        .expect("fake state")
    }
}
