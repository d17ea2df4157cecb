use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub full_name: String,
    pub role: String,
    pub created_at: String,
}

impl User {
    /// Insert-or-update keyed by `telegram_id`.
    ///
    /// Refreshes `username` and `full_name` on every call; `role` is set to
    /// `student` on first insert and never touched afterwards by this path.
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        username: Option<String>,
        full_name: String,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO users (telegram_id, username, full_name, role, created_at)
            VALUES (?, ?, ?, 'student', ?)
            ON CONFLICT(telegram_id) DO UPDATE SET
                username = excluded.username,
                full_name = excluded.full_name
            "#,
        )
        .bind(telegram_id)
        .bind(username)
        .bind(full_name)
        .bind(now)
        .execute(pool)
        .await?;

        Self::find_by_telegram_id(pool, telegram_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_telegram_id(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT telegram_id, username, full_name, role, created_at FROM users WHERE telegram_id = ?",
        )
        .bind(telegram_id)
        .fetch_optional(pool)
        .await
    }
}
