//! Turns machine replies into outbound messages. Shared between the message
//! and callback handlers so both render identically.

use chrono::NaiveDate;
use teloxide::prelude::*;

use crate::booking::calendar::{self, CalendarPolicy};
use crate::booking::machine::Reply;
use crate::booking::session::ConfirmedBooking;
use crate::booking::Subject;
use crate::bot::keyboards;
use crate::config::Config;

use super::HandlerResult;

pub const MAIN_MENU_TEXT: &str = "What would you like to do?";
pub const SUBJECT_PROMPT: &str = "Which subject would you like to book?";
pub const TIME_PROMPT: &str = "Choose a time slot:";
pub const PHONE_PROMPT: &str =
    "Almost done! Share your phone number with the button below, or just type it in.";
pub const PHONE_RETRY: &str =
    "That doesn't look like a phone number. Digits, '+', spaces and hyphens only. Please try again.";
pub const CANCELLED_TEXT: &str = "Booking cancelled. Maybe another time!";

pub fn calendar_text(subject: Subject) -> String {
    format!(
        "{} lessons run on {}s. Pick a date:",
        subject.title(),
        weekday_name(subject)
    )
}

pub fn summary_text(booking: &ConfirmedBooking) -> String {
    format!(
        "Please check your booking:\n\n📚 Subject: {}\n📅 Date: {}\n🕐 Time: {}\n📱 Phone: {}",
        booking.subject.title(),
        booking.date.format("%A, %-d %B %Y"),
        booking.time.format("%H:%M"),
        booking.phone,
    )
}

pub fn booked_text(booking: &ConfirmedBooking) -> String {
    format!(
        "✅ Your {} lesson is booked for {} at {}.\n\nWe'll send you a reminder before the lesson. See you there!",
        booking.subject.title(),
        booking.date.format("%A, %-d %B %Y"),
        booking.time.format("%H:%M"),
    )
}

fn weekday_name(subject: Subject) -> &'static str {
    match subject {
        Subject::Science => "Wednesday",
        Subject::Programming => "Friday",
    }
}

/// Sends `reply` as a fresh message. Used by the message handler; the
/// callback handler edits in place where it can and falls back to this.
pub async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    reply: &Reply,
    config: &Config,
    today: NaiveDate,
    policy: CalendarPolicy,
) -> HandlerResult {
    match reply {
        Reply::MainMenu => {
            bot.send_message(chat_id, MAIN_MENU_TEXT)
                .reply_markup(keyboards::main_menu(&config.webapp_url))
                .await?;
        }
        Reply::SubjectMenu => {
            bot.send_message(chat_id, SUBJECT_PROMPT)
                .reply_markup(keyboards::subject_menu())
                .await?;
        }
        Reply::Calendar { subject, year, month } => {
            let grid = calendar::generate(*year, *month, *subject, today, policy);
            bot.send_message(chat_id, calendar_text(*subject))
                .reply_markup(keyboards::calendar_keyboard(&grid))
                .await?;
        }
        Reply::TimeSlots { subject } => {
            bot.send_message(chat_id, TIME_PROMPT)
                .reply_markup(keyboards::time_slot_menu(*subject))
                .await?;
        }
        Reply::PhonePrompt => {
            bot.send_message(chat_id, PHONE_PROMPT)
                .reply_markup(keyboards::phone_request_keyboard())
                .await?;
        }
        Reply::PhoneRetry => {
            bot.send_message(chat_id, PHONE_RETRY).await?;
        }
        Reply::Summary(booking) => {
            bot.send_message(chat_id, summary_text(booking))
                .reply_markup(keyboards::confirm_menu())
                .await?;
        }
        Reply::Booked(booking) => {
            bot.send_message(chat_id, booked_text(booking))
                .reply_markup(keyboards::main_menu(&config.webapp_url))
                .await?;
        }
        Reply::Cancelled => {
            bot.send_message(chat_id, CANCELLED_TEXT)
                .reply_markup(keyboards::main_menu(&config.webapp_url))
                .await?;
        }
        Reply::Ignored => {}
    }
    Ok(())
}
