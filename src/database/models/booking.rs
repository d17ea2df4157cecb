use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A confirmed lesson booking. Rows are immutable once written; there is no
/// edit or reschedule operation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub subject: String,
    /// `YYYY-MM-DD`
    pub booking_date: String,
    /// `HH:MM`
    pub booking_time: String,
    pub phone: String,
    pub status: String,
    pub created_at: String,
}

impl Booking {
    pub async fn insert(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        subject: &str,
        booking_date: &str,
        booking_time: &str,
        phone: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO bookings (user_id, subject, booking_date, booking_time, phone, status, created_at)
            VALUES (?, ?, ?, ?, ?, 'confirmed', ?)
            "#,
        )
        .bind(user_id)
        .bind(subject)
        .bind(booking_date)
        .bind(booking_time)
        .bind(phone)
        .bind(now)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT id, user_id, subject, booking_date, booking_time, phone, status, created_at FROM bookings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT id, user_id, subject, booking_date, booking_time, phone, status, created_at FROM bookings WHERE user_id = ? ORDER BY booking_date, booking_time",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
