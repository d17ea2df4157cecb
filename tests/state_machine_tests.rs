//! End-to-end conversation flows: the state machine driven the way the
//! callback and message handlers drive it, with confirmed bookings persisted
//! into a throwaway SQLite database.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use tempfile::{tempdir, TempDir};
use tutor_bot::booking::calendar::CalendarPolicy;
use tutor_bot::booking::machine::{handle_event, Event, Reply};
use tutor_bot::booking::payload::CallbackPayload;
use tutor_bot::booking::session::SessionStore;
use tutor_bot::booking::Subject;
use tutor_bot::database::connection::Database;
use tutor_bot::database::models::{Booking, User};

async fn setup_test_db() -> Result<(Database, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db = Database::new(&database_url).await?;
    db.init_schema().await?;

    Ok((db, temp_dir))
}

fn today() -> NaiveDate {
    // A Monday; the next Friday is 2025-06-06.
    NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")
}

fn callback(store: &SessionStore, user: i64, data: &str) -> tutor_bot::booking::machine::Outcome {
    let payload = CallbackPayload::decode(data).expect("decodable payload");
    handle_event(store, user, Event::Callback(payload), today(), CalendarPolicy::default())
}

/// Walks a user to the confirmation summary using raw wire payloads.
fn walk_to_confirmation(store: &SessionStore, user: i64) {
    callback(store, user, "book_lesson");
    callback(store, user, "subject_programming");
    callback(store, user, "date_programming_2025_6_6");
    callback(store, user, "time_programming_18:00");
    let outcome = handle_event(
        store,
        user,
        Event::Text("89001234567".to_string()),
        today(),
        CalendarPolicy::default(),
    );
    assert!(matches!(outcome.reply, Reply::Summary(_)));
}

#[tokio::test]
async fn test_confirm_inserts_exactly_one_row_and_clears_session() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user_id = 100;
    User::upsert(&db.pool, user_id, None, "Test Student".to_string()).await?;

    let store = SessionStore::new();
    walk_to_confirmation(&store, user_id);

    let outcome = callback(&store, user_id, "confirm_booking");
    let booking = outcome.booking.expect("confirm produces a booking");
    assert_eq!(booking.subject, Subject::Programming);
    assert_eq!(booking.date, NaiveDate::from_ymd_opt(2025, 6, 6).expect("valid date"));
    assert_eq!(booking.time, NaiveTime::from_hms_opt(18, 0, 0).expect("valid time"));
    assert_eq!(booking.phone, "89001234567");

    // Persist the way the callback handler does.
    Booking::insert(
        &db.pool,
        user_id,
        booking.subject.as_str(),
        &booking.date.format("%Y-%m-%d").to_string(),
        &booking.time.format("%H:%M").to_string(),
        &booking.phone,
    )
    .await?;

    let rows = Booking::find_by_user(&db.pool, user_id).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].subject, "programming");
    assert_eq!(rows[0].booking_date, "2025-06-06");
    assert_eq!(rows[0].booking_time, "18:00");
    assert_eq!(rows[0].status, "confirmed");

    // Session is gone; a replayed confirm is dropped without a new booking.
    let replay = callback(&store, user_id, "confirm_booking");
    assert!(replay.booking.is_none());
    assert_eq!(Booking::find_by_user(&db.pool, user_id).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_cancel_from_confirmation_inserts_nothing() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user_id = 101;
    User::upsert(&db.pool, user_id, None, "Test Student".to_string()).await?;

    let store = SessionStore::new();
    walk_to_confirmation(&store, user_id);

    let outcome = callback(&store, user_id, "cancel_booking");
    assert_eq!(outcome.reply, Reply::Cancelled);
    assert!(outcome.booking.is_none());
    assert!(store.get(user_id).is_none());

    assert!(Booking::find_by_user(&db.pool, user_id).await?.is_empty());
    Ok(())
}

#[test]
fn test_booked_date_matches_subject_weekday() {
    let store = SessionStore::new();
    let user = 102;
    callback(&store, user, "book_lesson");
    callback(&store, user, "subject_programming");
    // 2025-06-04 is a Wednesday: valid for science, not for programming.
    let outcome = callback(&store, user, "date_programming_2025_6_4");
    assert!(matches!(outcome.reply, Reply::Calendar { .. }));
    assert!(store.get(user).expect("session kept").draft.date.is_none());
}

#[test]
fn test_stale_calendar_button_for_another_subject_cannot_book() {
    let store = SessionStore::new();
    let user = 105;
    callback(&store, user, "book_lesson");
    callback(&store, user, "subject_programming");

    // A date button from an earlier science calendar message. 2025-06-04 is a
    // Wednesday; accepting it would put a programming lesson on a science day.
    let outcome = callback(&store, user, "date_science_2025_6_4");
    assert_eq!(outcome.reply, Reply::MainMenu);
    assert!(store.get(user).is_none());

    // No amount of follow-up button mashing can turn this into a booking.
    let outcome = callback(&store, user, "time_programming_18:00");
    assert!(outcome.booking.is_none());
    let outcome = callback(&store, user, "confirm_booking");
    assert!(outcome.booking.is_none());
}

#[test]
fn test_shared_contact_skips_phone_validation() {
    let store = SessionStore::new();
    let user = 103;
    callback(&store, user, "book_lesson");
    callback(&store, user, "subject_science");
    callback(&store, user, "date_science_2025_6_4");
    callback(&store, user, "time_science_16:00");

    let outcome = handle_event(
        &store,
        user,
        Event::Contact { phone: "+15550100".to_string() },
        today(),
        CalendarPolicy::default(),
    );
    match outcome.reply {
        Reply::Summary(booking) => assert_eq!(booking.phone, "+15550100"),
        other => panic!("expected summary, got {other:?}"),
    }
}

#[test]
fn test_back_to_calendar_returns_to_current_month() {
    let store = SessionStore::new();
    let user = 104;
    callback(&store, user, "book_lesson");
    callback(&store, user, "subject_science");
    // Navigate two months ahead, then select a date there.
    callback(&store, user, "next_science_2025_6");
    callback(&store, user, "next_science_2025_7");
    callback(&store, user, "date_science_2025_8_6");

    let outcome = callback(&store, user, "back_to_calendar_science");
    assert_eq!(
        outcome.reply,
        Reply::Calendar { subject: Subject::Science, year: 2025, month: 6 }
    );
}

#[test]
fn test_sessions_are_isolated_per_user() {
    let store = SessionStore::new();
    callback(&store, 1, "book_lesson");
    callback(&store, 1, "subject_science");
    callback(&store, 2, "book_lesson");

    // User 2 cancelling leaves user 1 mid-flow.
    callback(&store, 2, "back_to_main");
    assert!(store.get(2).is_none());
    assert!(store.get(1).is_some());
}
