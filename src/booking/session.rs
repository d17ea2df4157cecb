//! In-memory store of in-progress booking conversations.
//!
//! Sessions are keyed by Telegram user id and never persisted: a restart
//! drops every in-flight booking, which is acceptable for an interaction
//! that lasts a few minutes.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};

use super::Subject;

/// Where a user currently is in the booking conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    AwaitingSubject,
    AwaitingDate,
    AwaitingTime,
    AwaitingPhone,
    AwaitingConfirmation,
}

/// Fields accumulated while walking through the conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub subject: Option<Subject>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub phone: Option<String>,
}

/// A draft with every field present, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedBooking {
    pub subject: Subject,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub phone: String,
}

impl BookingDraft {
    /// Returns the completed booking iff all four fields are filled in.
    pub fn complete(&self) -> Option<ConfirmedBooking> {
        Some(ConfirmedBooking {
            subject: self.subject?,
            date: self.date?,
            time: self.time?,
            phone: self.phone.clone()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSession {
    pub state: BookingState,
    pub draft: BookingDraft,
}

impl BookingSession {
    pub fn new() -> Self {
        Self {
            state: BookingState::AwaitingSubject,
            draft: BookingDraft::default(),
        }
    }
}

impl Default for BookingSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyed session store shared between the message and callback handlers.
///
/// A user interacts serially, so per-key atomicity of the map is the only
/// coordination required; transitions lock the map for their full duration.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<i64, BookingSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: i64) -> Option<BookingSession> {
        match self.inner.lock() {
            Ok(map) => map.get(&user_id).cloned(),
            Err(poisoned) => poisoned.into_inner().get(&user_id).cloned(),
        }
    }

    pub fn set(&self, user_id: i64, session: BookingSession) {
        match self.inner.lock() {
            Ok(mut map) => {
                map.insert(user_id, session);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(user_id, session);
            }
        }
    }

    pub fn clear(&self, user_id: i64) {
        match self.inner.lock() {
            Ok(mut map) => {
                map.remove(&user_id);
            }
            Err(poisoned) => {
                poisoned.into_inner().remove(&user_id);
            }
        }
    }
}
