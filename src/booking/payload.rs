//! Callback payload codec.
//!
//! Button payloads are `_`-delimited strings that must stay bit-exact for
//! compatibility with messages already delivered to clients. Decoding turns
//! them into a closed set of typed variants at the transport boundary, so no
//! string parsing leaks into the state machine.

use chrono::{NaiveDate, NaiveTime};

use super::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackPayload {
    /// Start the booking conversation.
    BookLesson,
    /// Pick a subject in the subject menu.
    Subject(Subject),
    /// Navigate the calendar one month back.
    PrevMonth { subject: Subject, year: i32, month: u32 },
    /// Navigate the calendar one month forward.
    NextMonth { subject: Subject, year: i32, month: u32 },
    /// Pick a selectable day.
    Date { subject: Subject, date: NaiveDate },
    /// Pick a time slot.
    Time { subject: Subject, time: NaiveTime },
    ConfirmBooking,
    CancelBooking,
    BackToMain,
    BackToCalendar(Subject),
    /// Bound to inert calendar cells; acknowledged and dropped.
    Ignore,
}

impl CallbackPayload {
    pub fn encode(&self) -> String {
        match self {
            CallbackPayload::BookLesson => "book_lesson".to_string(),
            CallbackPayload::Subject(s) => format!("subject_{}", s.as_str()),
            CallbackPayload::PrevMonth { subject, year, month } => {
                format!("prev_{}_{}_{}", subject.as_str(), year, month)
            }
            CallbackPayload::NextMonth { subject, year, month } => {
                format!("next_{}_{}_{}", subject.as_str(), year, month)
            }
            CallbackPayload::Date { subject, date } => format!(
                "date_{}_{}",
                subject.as_str(),
                date.format("%Y_%-m_%-d")
            ),
            CallbackPayload::Time { subject, time } => {
                format!("time_{}_{}", subject.as_str(), time.format("%H:%M"))
            }
            CallbackPayload::ConfirmBooking => "confirm_booking".to_string(),
            CallbackPayload::CancelBooking => "cancel_booking".to_string(),
            CallbackPayload::BackToMain => "back_to_main".to_string(),
            CallbackPayload::BackToCalendar(s) => format!("back_to_calendar_{}", s.as_str()),
            CallbackPayload::Ignore => "ignore".to_string(),
        }
    }

    /// Decodes a raw payload; unknown or malformed strings yield `None`.
    pub fn decode(data: &str) -> Option<Self> {
        match data {
            "book_lesson" => return Some(CallbackPayload::BookLesson),
            "confirm_booking" => return Some(CallbackPayload::ConfirmBooking),
            "cancel_booking" => return Some(CallbackPayload::CancelBooking),
            "back_to_main" => return Some(CallbackPayload::BackToMain),
            "ignore" => return Some(CallbackPayload::Ignore),
            _ => {}
        }

        if let Some(rest) = data.strip_prefix("back_to_calendar_") {
            return Subject::parse(rest).map(CallbackPayload::BackToCalendar);
        }
        if let Some(rest) = data.strip_prefix("subject_") {
            return Subject::parse(rest).map(CallbackPayload::Subject);
        }
        if let Some(rest) = data.strip_prefix("prev_") {
            let (subject, year, month) = decode_month(rest)?;
            return Some(CallbackPayload::PrevMonth { subject, year, month });
        }
        if let Some(rest) = data.strip_prefix("next_") {
            let (subject, year, month) = decode_month(rest)?;
            return Some(CallbackPayload::NextMonth { subject, year, month });
        }
        if let Some(rest) = data.strip_prefix("date_") {
            let mut parts = rest.split('_');
            let subject = Subject::parse(parts.next()?)?;
            let year: i32 = parts.next()?.parse().ok()?;
            let month: u32 = parts.next()?.parse().ok()?;
            let day: u32 = parts.next()?.parse().ok()?;
            if parts.next().is_some() {
                return None;
            }
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            return Some(CallbackPayload::Date { subject, date });
        }
        if let Some(rest) = data.strip_prefix("time_") {
            let (subject_token, time_token) = rest.split_once('_')?;
            let subject = Subject::parse(subject_token)?;
            let time = NaiveTime::parse_from_str(time_token, "%H:%M").ok()?;
            return Some(CallbackPayload::Time { subject, time });
        }

        None
    }
}

fn decode_month(rest: &str) -> Option<(Subject, i32, u32)> {
    let mut parts = rest.split('_');
    let subject = Subject::parse(parts.next()?)?;
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(1..=12).contains(&month) {
        return None;
    }
    Some((subject, year, month))
}
