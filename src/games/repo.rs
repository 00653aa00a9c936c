use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Game record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub id: Uuid,
    pub name: String,
}

#[async_trait]
pub trait GameStore: Send + Sync {
    async fn all(&self) -> anyhow::Result<Vec<Game>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Game>>;
    async fn insert(&self, name: &str) -> anyhow::Result<Game>;
}

#[derive(Clone)]
pub struct PgGameStore {
    db: PgPool,
}

impl PgGameStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn all(&self) -> anyhow::Result<Vec<Game>> {
        let rows = sqlx::query_as::<_, Game>(
            r#"
            SELECT id, name
            FROM games
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Game>> {
        let row = sqlx::query_as::<_, Game>(
            r#"
            SELECT id, name
            FROM games
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, name: &str) -> anyhow::Result<Game> {
        let game = sqlx::query_as::<_, Game>(
            r#"
            INSERT INTO games (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.db)
        .await?;
        Ok(game)
    }
}

#[cfg(test)]
pub mod memory {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryGameStore {
        games: Mutex<Vec<Game>>,
    }

    #[async_trait]
    impl GameStore for InMemoryGameStore {
        async fn all(&self) -> anyhow::Result<Vec<Game>> {
            let mut games = self.games.lock().unwrap().clone();
            games.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(games)
        }

        async fn get(&self, id: Uuid) -> anyhow::Result<Option<Game>> {
            Ok(self.games.lock().unwrap().iter().find(|g| g.id == id).cloned())
        }

        async fn insert(&self, name: &str) -> anyhow::Result<Game> {
            let game = Game {
                id: Uuid::new_v4(),
                name: name.to_string(),
            };
            self.games.lock().unwrap().push(game.clone());
            Ok(game)
        }
    }
}
