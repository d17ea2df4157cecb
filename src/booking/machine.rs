//! The booking conversation state machine.
//!
//! Transitions are pure: the machine mutates the session store and describes
//! what to render and what to persist, while message delivery and database
//! writes stay in the transport layer. This keeps every transition testable
//! without a bot or a database.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::utils::validation::validate_phone;

use super::calendar::{self, CalendarPolicy};
use super::payload::CallbackPayload;
use super::session::{BookingSession, BookingState, ConfirmedBooking, SessionStore};
use super::{Subject, TIME_SLOTS};

/// An inbound user action, decoded by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Callback(CallbackPayload),
    /// A shared contact; the structured phone number needs no validation.
    Contact { phone: String },
    /// A plain text message.
    Text(String),
}

/// What the transport layer should render next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    MainMenu,
    SubjectMenu,
    Calendar { subject: Subject, year: i32, month: u32 },
    TimeSlots { subject: Subject },
    PhonePrompt,
    /// Invalid phone input: re-prompt without leaving `AwaitingPhone`.
    PhoneRetry,
    Summary(ConfirmedBooking),
    /// Terminal success; the carried booking is also in `Outcome::booking`.
    Booked(ConfirmedBooking),
    Cancelled,
    /// Inert button press, acknowledge and do nothing.
    Ignored,
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reply: Reply,
    /// Set exactly once per conversation, on the confirm transition.
    pub booking: Option<ConfirmedBooking>,
}

impl Outcome {
    fn reply(reply: Reply) -> Self {
        Self { reply, booking: None }
    }
}

/// Applies `event` for `user_id` against the session store.
///
/// `today` anchors all date comparisons so transitions stay deterministic in
/// tests. Callbacks that do not fit the current state (stale buttons, replays)
/// discard the session and fall back to the main menu instead of faulting.
pub fn handle_event(
    store: &SessionStore,
    user_id: i64,
    event: Event,
    today: NaiveDate,
    policy: CalendarPolicy,
) -> Outcome {
    match event {
        Event::Callback(payload) => handle_callback(store, user_id, payload, today, policy),
        Event::Contact { phone } => accept_phone(store, user_id, phone),
        Event::Text(text) => handle_text(store, user_id, text),
    }
}

fn handle_callback(
    store: &SessionStore,
    user_id: i64,
    payload: CallbackPayload,
    today: NaiveDate,
    policy: CalendarPolicy,
) -> Outcome {
    match payload {
        CallbackPayload::Ignore => Outcome::reply(Reply::Ignored),

        CallbackPayload::BackToMain => {
            store.clear(user_id);
            Outcome::reply(Reply::MainMenu)
        }

        CallbackPayload::BookLesson => {
            store.set(user_id, BookingSession::new());
            Outcome::reply(Reply::SubjectMenu)
        }

        CallbackPayload::Subject(subject) => {
            match store.get(user_id) {
                Some(mut session) if session.state == BookingState::AwaitingSubject => {
                    session.draft.subject = Some(subject);
                    session.state = BookingState::AwaitingDate;
                    store.set(user_id, session);
                    Outcome::reply(Reply::Calendar {
                        subject,
                        year: today.year(),
                        month: today.month(),
                    })
                }
                _ => out_of_state(store, user_id, "subject"),
            }
        }

        CallbackPayload::PrevMonth { subject, year, month } => {
            match store.get(user_id) {
                Some(session)
                    if session.state == BookingState::AwaitingDate
                        && session.draft.subject == Some(subject) =>
                {
                    let grid = calendar::generate(year, month, subject, today, policy);
                    if !grid.prev_enabled {
                        return Outcome::reply(Reply::Ignored);
                    }
                    let (year, month) = calendar::prev_month(year, month);
                    Outcome::reply(Reply::Calendar { subject, year, month })
                }
                _ => out_of_state(store, user_id, "prev"),
            }
        }

        CallbackPayload::NextMonth { subject, year, month } => {
            match store.get(user_id) {
                Some(session)
                    if session.state == BookingState::AwaitingDate
                        && session.draft.subject == Some(subject) =>
                {
                    let (year, month) = calendar::next_month(year, month);
                    Outcome::reply(Reply::Calendar { subject, year, month })
                }
                _ => out_of_state(store, user_id, "next"),
            }
        }

        // Buttons on an old message for a different subject are stale; every
        // dated arm checks the payload's subject against the draft before
        // trusting anything else in it.
        CallbackPayload::Date { subject, date } => {
            match store.get(user_id) {
                Some(mut session)
                    if session.state == BookingState::AwaitingDate
                        && session.draft.subject == Some(subject) =>
                {
                    if !date_is_bookable(subject, date, today, policy) {
                        // Stale button for a day that has since passed.
                        return Outcome::reply(Reply::Calendar {
                            subject,
                            year: date.year(),
                            month: date.month(),
                        });
                    }
                    session.draft.date = Some(date);
                    session.state = BookingState::AwaitingTime;
                    store.set(user_id, session);
                    Outcome::reply(Reply::TimeSlots { subject })
                }
                _ => out_of_state(store, user_id, "date"),
            }
        }

        CallbackPayload::Time { subject, time } => {
            match store.get(user_id) {
                Some(mut session)
                    if session.state == BookingState::AwaitingTime
                        && session.draft.subject == Some(subject) =>
                {
                    let slot = time.format("%H:%M").to_string();
                    if !TIME_SLOTS.contains(&slot.as_str()) {
                        return Outcome::reply(Reply::TimeSlots { subject });
                    }
                    session.draft.time = Some(time);
                    session.state = BookingState::AwaitingPhone;
                    store.set(user_id, session);
                    Outcome::reply(Reply::PhonePrompt)
                }
                _ => out_of_state(store, user_id, "time"),
            }
        }

        CallbackPayload::BackToCalendar(subject) => {
            match store.get(user_id) {
                Some(mut session)
                    if session.state == BookingState::AwaitingTime
                        && session.draft.subject == Some(subject) =>
                {
                    // Re-entry always shows the current month, not whatever
                    // month the user had navigated to earlier.
                    session.draft.date = None;
                    session.state = BookingState::AwaitingDate;
                    store.set(user_id, session);
                    Outcome::reply(Reply::Calendar {
                        subject,
                        year: today.year(),
                        month: today.month(),
                    })
                }
                _ => out_of_state(store, user_id, "back_to_calendar"),
            }
        }

        CallbackPayload::ConfirmBooking => {
            match store.get(user_id) {
                Some(session) if session.state == BookingState::AwaitingConfirmation => {
                    match session.draft.complete() {
                        Some(booking) => {
                            store.clear(user_id);
                            Outcome {
                                reply: Reply::Booked(booking.clone()),
                                booking: Some(booking),
                            }
                        }
                        None => out_of_state(store, user_id, "confirm_incomplete"),
                    }
                }
                _ => out_of_state(store, user_id, "confirm"),
            }
        }

        CallbackPayload::CancelBooking => {
            store.clear(user_id);
            Outcome::reply(Reply::Cancelled)
        }
    }
}

fn accept_phone(store: &SessionStore, user_id: i64, phone: String) -> Outcome {
    match store.get(user_id) {
        Some(mut session) if session.state == BookingState::AwaitingPhone => {
            session.draft.phone = Some(phone);
            session.state = BookingState::AwaitingConfirmation;
            store.set(user_id, session.clone());
            match session.draft.complete() {
                Some(booking) => Outcome::reply(Reply::Summary(booking)),
                // Unreachable: phone was the last missing field.
                None => out_of_state(store, user_id, "phone_incomplete"),
            }
        }
        _ => {
            store.clear(user_id);
            Outcome::reply(Reply::MainMenu)
        }
    }
}

fn handle_text(store: &SessionStore, user_id: i64, text: String) -> Outcome {
    match store.get(user_id) {
        Some(session) if session.state == BookingState::AwaitingPhone => {
            let trimmed = text.trim();
            if validate_phone(trimmed).is_ok() {
                accept_phone(store, user_id, trimmed.to_string())
            } else {
                Outcome::reply(Reply::PhoneRetry)
            }
        }
        _ => {
            // Free text outside the phone step ends any conversation and
            // falls back to the main menu.
            store.clear(user_id);
            Outcome::reply(Reply::MainMenu)
        }
    }
}

fn date_is_bookable(
    subject: Subject,
    date: NaiveDate,
    today: NaiveDate,
    policy: CalendarPolicy,
) -> bool {
    let future = date > today || (policy.allow_today && date == today);
    date.weekday() == subject.lesson_weekday() && future
}

fn out_of_state(store: &SessionStore, user_id: i64, action: &str) -> Outcome {
    debug!("Dropping out-of-state '{}' callback from user {}", action, user_id);
    store.clear(user_id);
    Outcome::reply(Reply::MainMenu)
}
