//! The embedded quiz mini-application: static pages plus a small JSON API
//! backed by the same database as the bot.

pub mod questions;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::database::connection::Database;
use crate::database::models::{QuizAnswer, UserStats};
use questions::{find_question, question_bank, Question};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// The axum application served next to the bot.
pub struct QuizApp {
    pub router: Router,
}

impl QuizApp {
    pub fn new(db: Arc<Database>) -> Self {
        let state = AppState { db };

        let router = Router::new()
            .route("/", get(index_page))
            .route("/progress", get(progress_page))
            .route("/schedule", get(schedule_page))
            .route("/secret", get(secret_page))
            .route("/api/questions", get(list_questions))
            .route("/api/submit_answer", post(submit_answer))
            .route("/api/user_stats/:user_id", get(user_stats))
            .nest_service("/static", ServeDir::new("static"))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

#[derive(Debug, Serialize)]
struct QuestionList {
    questions: &'static [Question],
}

async fn list_questions() -> Json<QuestionList> {
    Json(QuestionList { questions: question_bank() })
}

#[derive(Debug, Deserialize)]
struct SubmitAnswerRequest {
    user_id: i64,
    question_id: i64,
    #[serde(default)]
    user_answer: String,
}

#[derive(Debug, Serialize)]
struct SubmitAnswerResponse {
    is_correct: bool,
    /// Echoed only when the submission was wrong.
    #[serde(skip_serializing_if = "Option::is_none")]
    correct_answer: Option<&'static str>,
}

async fn submit_answer(
    State(state): State<AppState>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, StatusCode> {
    let question = find_question(request.question_id).ok_or(StatusCode::BAD_REQUEST)?;

    let user_answer = request.user_answer.trim().to_lowercase();
    let is_correct = user_answer == question.answer;

    let pool = &state.db.pool;
    if let Err(e) = QuizAnswer::record(pool, request.user_id, request.question_id, &user_answer, is_correct).await {
        tracing::error!("Failed to record quiz answer: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    if let Err(e) = UserStats::increment(pool, request.user_id, is_correct).await {
        tracing::error!("Failed to update quiz stats: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(Json(SubmitAnswerResponse {
        is_correct,
        correct_answer: (!is_correct).then_some(question.answer),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatsResponse {
    pub total_questions: i64,
    pub correct_answers: i64,
    pub accuracy: f64,
}

async fn user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserStatsResponse>, StatusCode> {
    match UserStats::find(&state.db.pool, user_id).await {
        Ok(Some(stats)) => Ok(Json(UserStatsResponse {
            total_questions: stats.total_questions,
            correct_answers: stats.correct_answers,
            accuracy: stats.accuracy(),
        })),
        Ok(None) => Ok(Json(UserStatsResponse {
            total_questions: 0,
            correct_answers: 0,
            accuracy: 0.0,
        })),
        Err(e) => {
            tracing::error!("Failed to load quiz stats for {}: {}", user_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn index_page() -> Result<Html<String>, StatusCode> {
    match tokio::fs::read_to_string("static/index.html").await {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to read quiz page: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn progress_page() -> Html<&'static str> {
    Html("<html><body><h1>Progress</h1><p>Open this page from the bot to see your quiz statistics.</p></body></html>")
}

async fn schedule_page() -> Html<&'static str> {
    Html("<html><body><h1>Schedule</h1><p>Lesson schedule is published here.</p></body></html>")
}

async fn secret_page() -> Html<&'static str> {
    Html("<html><body><h1>Secret section</h1><p>Nothing to see here yet.</p></body></html>")
}
