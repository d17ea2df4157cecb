use anyhow::Result;
use tempfile::{tempdir, TempDir};
use tutor_bot::database::connection::Database;
use tutor_bot::database::models::{Booking, QuizAnswer, User, UserStats};

async fn setup_test_db() -> Result<(Database, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db = Database::new(&database_url).await?;
    db.init_schema().await?;

    Ok((db, temp_dir))
}

#[tokio::test]
async fn test_init_schema_is_idempotent() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    // A second run must not fail or clobber data.
    User::upsert(&db.pool, 1, None, "Someone".to_string()).await?;
    db.init_schema().await?;
    assert!(User::find_by_telegram_id(&db.pool, 1).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_user_upsert_creates_then_refreshes() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let created = User::upsert(&db.pool, 42, Some("alice".to_string()), "Alice".to_string()).await?;
    assert_eq!(created.telegram_id, 42);
    assert_eq!(created.username.as_deref(), Some("alice"));
    assert_eq!(created.role, "student");

    // Second /start with a renamed account refreshes the profile fields but
    // keeps role and created_at.
    let updated =
        User::upsert(&db.pool, 42, Some("alice_new".to_string()), "Alice Smith".to_string()).await?;
    assert_eq!(updated.username.as_deref(), Some("alice_new"));
    assert_eq!(updated.full_name, "Alice Smith");
    assert_eq!(updated.role, "student");
    assert_eq!(updated.created_at, created.created_at);

    Ok(())
}

#[tokio::test]
async fn test_booking_insert_defaults_to_confirmed() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    User::upsert(&db.pool, 7, None, "Bob".to_string()).await?;

    let booking =
        Booking::insert(&db.pool, 7, "science", "2025-06-04", "16:00", "+15550100").await?;
    assert_eq!(booking.user_id, 7);
    assert_eq!(booking.subject, "science");
    assert_eq!(booking.status, "confirmed");

    let found = Booking::find_by_id(&db.pool, booking.id).await?;
    assert!(found.is_some());
    Ok(())
}

#[tokio::test]
async fn test_bookings_are_listed_in_lesson_order() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    User::upsert(&db.pool, 7, None, "Bob".to_string()).await?;

    Booking::insert(&db.pool, 7, "programming", "2025-06-13", "18:00", "123").await?;
    Booking::insert(&db.pool, 7, "science", "2025-06-04", "16:00", "123").await?;
    Booking::insert(&db.pool, 7, "science", "2025-06-04", "20:00", "123").await?;

    let rows = Booking::find_by_user(&db.pool, 7).await?;
    let order: Vec<(String, String)> = rows
        .into_iter()
        .map(|b| (b.booking_date, b.booking_time))
        .collect();
    assert_eq!(
        order,
        vec![
            ("2025-06-04".to_string(), "16:00".to_string()),
            ("2025-06-04".to_string(), "20:00".to_string()),
            ("2025-06-13".to_string(), "18:00".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_quiz_answers_append_and_stats_accumulate() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user_id = 9;

    QuizAnswer::record(&db.pool, user_id, 1, "4", true).await?;
    UserStats::increment(&db.pool, user_id, true).await?;
    QuizAnswer::record(&db.pool, user_id, 1, "5", false).await?;
    UserStats::increment(&db.pool, user_id, false).await?;

    let answers = QuizAnswer::find_by_user(&db.pool, user_id).await?;
    assert_eq!(answers.len(), 2);
    assert!(answers[0].is_correct);
    assert!(!answers[1].is_correct);

    let stats = UserStats::find(&db.pool, user_id).await?.expect("stats row");
    assert_eq!(stats.total_questions, 2);
    assert_eq!(stats.correct_answers, 1);
    assert_eq!(stats.accuracy(), 50.0);
    Ok(())
}

#[tokio::test]
async fn test_stats_survive_concurrent_submissions() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user_id = 11;

    // The upsert is a single atomic statement, so parallel submissions for
    // the same user must not lose increments.
    let mut handles = Vec::new();
    for i in 0..10 {
        let pool = db.pool.clone();
        handles.push(tokio::spawn(async move {
            UserStats::increment(&pool, user_id, i % 2 == 0).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let stats = UserStats::find(&db.pool, user_id).await?.expect("stats row");
    assert_eq!(stats.total_questions, 10);
    assert_eq!(stats.correct_answers, 5);
    Ok(())
}

#[tokio::test]
async fn test_stats_missing_for_unknown_user() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    assert!(UserStats::find(&db.pool, 999).await?.is_none());
    Ok(())
}
