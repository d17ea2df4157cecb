use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tutor_bot::database::connection::Database;
use tutor_bot::web::QuizApp;

async fn create_test_server() -> Result<(TestServer, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db = Database::new(&database_url).await?;
    db.init_schema().await?;

    let app = QuizApp::new(Arc::new(db));
    let server = TestServer::new(app.router).map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok((server, temp_dir))
}

#[tokio::test]
async fn test_questions_endpoint_hides_answers() -> Result<()> {
    let (server, _temp_dir) = create_test_server().await?;

    let response = server.get("/api/questions").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let questions = body["questions"].as_array().expect("questions array");
    assert_eq!(questions.len(), 5);
    for question in questions {
        assert!(question["id"].is_i64());
        assert!(question["question"].is_string());
        assert_eq!(question["options"].as_array().map(Vec::len), Some(4));
        assert!(question.get("answer").is_none(), "answer leaked: {question}");
    }
    Ok(())
}

#[tokio::test]
async fn test_submit_correct_answer() -> Result<()> {
    let (server, _temp_dir) = create_test_server().await?;

    let response = server
        .post("/api/submit_answer")
        .json(&json!({"user_id": 1, "question_id": 2, "user_answer": "4"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["is_correct"], json!(true));
    assert!(body.get("correct_answer").is_none());
    Ok(())
}

#[tokio::test]
async fn test_submit_wrong_answer_reveals_correct_one() -> Result<()> {
    let (server, _temp_dir) = create_test_server().await?;

    // Case and surrounding whitespace are ignored.
    let response = server
        .post("/api/submit_answer")
        .json(&json!({"user_id": 1, "question_id": 2, "user_answer": "  5 "}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["is_correct"], json!(false));
    assert_eq!(body["correct_answer"], json!("4"));
    Ok(())
}

#[tokio::test]
async fn test_submit_answer_unknown_question() -> Result<()> {
    let (server, _temp_dir) = create_test_server().await?;

    let response = server
        .post("/api/submit_answer")
        .json(&json!({"user_id": 1, "question_id": 999, "user_answer": "4"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_user_stats_reflect_submissions() -> Result<()> {
    let (server, _temp_dir) = create_test_server().await?;

    // Unknown users get zeros rather than an error.
    let response = server.get("/api/user_stats/55").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total_questions"], json!(0));
    assert_eq!(body["correct_answers"], json!(0));
    assert_eq!(body["accuracy"], json!(0.0));

    // Submitting the same answer twice counts twice: one correct, one wrong.
    server
        .post("/api/submit_answer")
        .json(&json!({"user_id": 55, "question_id": 2, "user_answer": "4"}))
        .await;
    server
        .post("/api/submit_answer")
        .json(&json!({"user_id": 55, "question_id": 2, "user_answer": "6"}))
        .await;

    let response = server.get("/api/user_stats/55").await;
    let body: Value = response.json();
    assert_eq!(body["total_questions"], json!(2));
    assert_eq!(body["correct_answers"], json!(1));
    assert_eq!(body["accuracy"], json!(50.0));
    Ok(())
}
