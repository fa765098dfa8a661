use crate::core::games::{Game, TagError, TagStore};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

pub struct SqliteTagStore {
    pool: Pool<Sqlite>,
}

impl SqliteTagStore {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure the file exists if it's a file path
        let path_str = database_url.trim_start_matches("sqlite://");
        if !in_memory && !Path::new(path_str).exists() {
            if let Some(parent) = Path::new(path_str).parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::File::create(path_str)?;
        }

        let conn_str = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{}", database_url)
        };

        // Every connection to `:memory:` gets its own database.
        let max_connections = if in_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&conn_str)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS player_tags (
                user_id INTEGER NOT NULL,
                game TEXT NOT NULL,
                tag TEXT NOT NULL,
                saved_at TEXT NOT NULL,
                PRIMARY KEY (user_id, game)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl TagStore for SqliteTagStore {
    async fn get_tag(&self, user_id: u64, game: Game) -> Result<Option<String>, TagError> {
        let row = sqlx::query("SELECT tag FROM player_tags WHERE user_id = ? AND game = ?")
            .bind(user_id as i64)
            .bind(game.key())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TagError::Storage(e.to_string()))?;

        Ok(row.map(|row| row.get::<String, _>(0)))
    }

    async fn save_tag(&self, user_id: u64, game: Game, tag: &str) -> Result<(), TagError> {
        sqlx::query(
            r#"
            INSERT INTO player_tags (user_id, game, tag, saved_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, game) DO UPDATE SET
            tag = excluded.tag,
            saved_at = excluded.saved_at
            "#,
        )
        .bind(user_id as i64)
        .bind(game.key())
        .bind(tag)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| TagError::Storage(e.to_string()))?;

        Ok(())
    }
}
