//! Pure keyboard builders. Everything the user can press is produced here;
//! handlers only decide which keyboard to show.

use chrono::{NaiveDate, NaiveTime};
use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    WebAppInfo,
};
use url::Url;

use crate::booking::calendar::{DayCell, MonthGrid};
use crate::booking::payload::CallbackPayload;
use crate::booking::{Subject, TIME_SLOTS};

/// The five fixed main-menu entries. Web-app buttons resolve against the
/// configured base URL; "book a lesson" starts the conversation.
pub fn main_menu(webapp_base: &Url) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![web_app_button("🧠 Take the quiz", webapp_base, "/")],
        vec![InlineKeyboardButton::callback(
            "📅 Book a lesson",
            CallbackPayload::BookLesson.encode(),
        )],
        vec![web_app_button("📊 My progress", webapp_base, "/progress")],
        vec![web_app_button("🗓 Lesson schedule", webapp_base, "/schedule")],
        vec![web_app_button("🔐 Secret section", webapp_base, "/secret")],
    ])
}

pub fn subject_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "🔬 Science",
            CallbackPayload::Subject(Subject::Science).encode(),
        )],
        vec![InlineKeyboardButton::callback(
            "💻 Programming",
            CallbackPayload::Subject(Subject::Programming).encode(),
        )],
        vec![InlineKeyboardButton::callback(
            "⬅️ Back",
            CallbackPayload::BackToMain.encode(),
        )],
    ])
}

/// Renders a month grid: navigation header, weekday header, then the weeks.
/// Inert and blank cells are bound to the `ignore` payload.
pub fn calendar_keyboard(grid: &MonthGrid) -> InlineKeyboardMarkup {
    let subject = grid.subject;
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::with_capacity(grid.weeks.len() + 2);

    let prev = if grid.prev_enabled {
        InlineKeyboardButton::callback(
            "«",
            CallbackPayload::PrevMonth { subject, year: grid.year, month: grid.month }.encode(),
        )
    } else {
        ignore_button(" ")
    };
    let next = InlineKeyboardButton::callback(
        "»",
        CallbackPayload::NextMonth { subject, year: grid.year, month: grid.month }.encode(),
    );
    rows.push(vec![prev, ignore_button(month_label(grid.year, grid.month)), next]);

    rows.push(
        ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
            .into_iter()
            .map(ignore_button)
            .collect(),
    );

    for week in &grid.weeks {
        let row = week
            .iter()
            .map(|cell| match cell {
                DayCell::Blank => ignore_button(" "),
                DayCell::Inert(day) => ignore_button(day.to_string()),
                DayCell::Selectable(day) => {
                    let payload = NaiveDate::from_ymd_opt(grid.year, grid.month, *day)
                        .map(|date| CallbackPayload::Date { subject, date }.encode())
                        .unwrap_or_else(|| CallbackPayload::Ignore.encode());
                    InlineKeyboardButton::callback(format!("· {day} ·"), payload)
                }
            })
            .collect();
        rows.push(row);
    }

    rows.push(vec![InlineKeyboardButton::callback(
        "⬅️ Back",
        CallbackPayload::BackToMain.encode(),
    )]);

    InlineKeyboardMarkup::new(rows)
}

/// The five fixed time slots plus a way back to the calendar.
pub fn time_slot_menu(subject: Subject) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = TIME_SLOTS
        .iter()
        .filter_map(|slot| {
            let time = NaiveTime::parse_from_str(slot, "%H:%M").ok()?;
            Some(vec![InlineKeyboardButton::callback(
                format!("🕐 {slot}"),
                CallbackPayload::Time { subject, time }.encode(),
            )])
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        "⬅️ Back to calendar",
        CallbackPayload::BackToCalendar(subject).encode(),
    )]);
    InlineKeyboardMarkup::new(rows)
}

pub fn confirm_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Confirm", CallbackPayload::ConfirmBooking.encode()),
        InlineKeyboardButton::callback("❌ Cancel", CallbackPayload::CancelBooking.encode()),
    ]])
}

/// Reply keyboard offering to share the account's phone number as a contact.
pub fn phone_request_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new("📱 Share my phone number").request(ButtonRequest::Contact),
    ]])
    .resize_keyboard(true)
    .one_time_keyboard(true)
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"))
}

fn ignore_button(label: impl Into<String>) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label.into(), CallbackPayload::Ignore.encode())
}

fn web_app_button(label: &str, base: &Url, path: &str) -> InlineKeyboardButton {
    let url = base.join(path).unwrap_or_else(|_| base.clone());
    InlineKeyboardButton::web_app(label, WebAppInfo { url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::calendar::{generate, CalendarPolicy};

    #[test]
    fn test_time_slot_payloads_match_wire_format() {
        let menu = time_slot_menu(Subject::Science);
        // Five slots plus the back row.
        assert_eq!(menu.inline_keyboard.len(), 6);
        match &menu.inline_keyboard[2][0].kind {
            teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => {
                assert_eq!(data, "time_science_18:00");
            }
            other => panic!("expected callback button, got {other:?}"),
        }
        // Every slot button decodes back through the codec.
        for row in &menu.inline_keyboard[..5] {
            match &row[0].kind {
                teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => {
                    assert!(
                        matches!(
                            CallbackPayload::decode(data),
                            Some(CallbackPayload::Time { subject: Subject::Science, .. })
                        ),
                        "{data}"
                    );
                }
                other => panic!("expected callback button, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_calendar_rows_are_seven_wide() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
        let grid = generate(2025, 3, Subject::Programming, today, CalendarPolicy::default());
        let keyboard = calendar_keyboard(&grid);
        // Skip nav header, weekday header and the trailing back row.
        let week_rows = &keyboard.inline_keyboard[2..keyboard.inline_keyboard.len() - 1];
        assert_eq!(week_rows.len(), grid.weeks.len());
        for row in week_rows {
            assert_eq!(row.len(), 7);
        }
    }

    #[test]
    fn test_main_menu_has_five_entries() {
        let base = Url::parse("https://quiz.example.com").expect("valid url");
        let menu = main_menu(&base);
        assert_eq!(menu.inline_keyboard.len(), 5);
    }
}
