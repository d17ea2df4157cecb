//! Lesson-booking conversation: calendar generation, session state,
//! callback payload codec, and the state machine itself.

pub mod calendar;
pub mod machine;
pub mod payload;
pub mod session;

use chrono::Weekday;

/// Lesson category. Each subject is taught on exactly one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Science,
    Programming,
}

impl Subject {
    /// The single weekday on which lessons for this subject take place.
    pub fn lesson_weekday(&self) -> Weekday {
        match self {
            Subject::Science => Weekday::Wed,
            Subject::Programming => Weekday::Fri,
        }
    }

    /// Token used in callback payloads and database rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Science => "science",
            Subject::Programming => "programming",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "science" => Some(Subject::Science),
            "programming" => Some(Subject::Programming),
            _ => None,
        }
    }

    /// Human-readable name for prompts and summaries.
    pub fn title(&self) -> &'static str {
        match self {
            Subject::Science => "Science",
            Subject::Programming => "Programming",
        }
    }
}

/// The five bookable lesson slots, hourly from 16:00 to 20:00.
pub const TIME_SLOTS: [&str; 5] = ["16:00", "17:00", "18:00", "19:00", "20:00"];
