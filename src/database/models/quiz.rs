use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One answered quiz question, appended per submission.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub user_answer: String,
    pub is_correct: bool,
    pub answered_at: String,
}

impl QuizAnswer {
    pub async fn record(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        question_id: i64,
        user_answer: &str,
        is_correct: bool,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO user_progress (user_id, question_id, user_answer, is_correct, answered_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(question_id)
        .bind(user_answer)
        .bind(is_correct)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, QuizAnswer>(
            "SELECT id, user_id, question_id, user_answer, is_correct, answered_at FROM user_progress WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}

/// Per-user aggregate quiz counters.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: i64,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub last_quiz_at: String,
}

impl UserStats {
    /// Bumps the counters for one submitted answer.
    ///
    /// Expressed as a single upsert statement so concurrent submissions for
    /// the same user cannot lose updates.
    pub async fn increment(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        is_correct: bool,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let correct = i64::from(is_correct);

        sqlx::query(
            r#"
            INSERT INTO user_stats (user_id, total_questions, correct_answers, last_quiz_at)
            VALUES (?, 1, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                total_questions = total_questions + 1,
                correct_answers = correct_answers + excluded.correct_answers,
                last_quiz_at = excluded.last_quiz_at
            "#,
        )
        .bind(user_id)
        .bind(correct)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn find(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserStats>(
            "SELECT user_id, total_questions, correct_answers, last_quiz_at FROM user_stats WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Share of correct answers as a percentage with one decimal place.
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        let ratio = self.correct_answers as f64 / self.total_questions as f64;
        (ratio * 1000.0).round() / 10.0
    }
}
