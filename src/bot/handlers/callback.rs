use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::{error, info, warn};

use crate::booking::calendar::{self, CalendarPolicy};
use crate::booking::machine::{self, Event, Reply};
use crate::booking::payload::CallbackPayload;
use crate::booking::session::SessionStore;
use crate::bot::keyboards;
use crate::config::Config;
use crate::database::connection::Database;
use crate::database::models::Booking;

use super::render;
use super::HandlerResult;

/// Decodes the button payload, runs the state machine, persists a confirmed
/// booking if the transition produced one, and renders the reply. Navigation
/// inside the booking flow edits the originating message in place; terminal
/// replies arrive as fresh messages.
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    db: &Database,
    store: &SessionStore,
    config: &Config,
    policy: CalendarPolicy,
) -> HandlerResult {
    let user_id = q.from.id.0 as i64;

    let data = match q.data.clone() {
        Some(data) => data,
        None => {
            bot.answer_callback_query(q.id).await?;
            return Ok(());
        }
    };

    info!("Callback '{}' from user {}", data, user_id);

    let payload = match CallbackPayload::decode(&data) {
        Some(payload) => payload,
        None => {
            warn!("Undecodable callback payload '{}' from user {}", data, user_id);
            bot.answer_callback_query(q.id).await?;
            return Ok(());
        }
    };

    let today = Utc::now().date_naive();
    let outcome = machine::handle_event(store, user_id, Event::Callback(payload), today, policy);

    // Callbacks reach us from private chats, so the user id doubles as the
    // chat id when the originating message is no longer available.
    let chat_id = q.message.as_ref().map(|m| m.chat.id).unwrap_or(ChatId(user_id));

    if let Some(booking) = &outcome.booking {
        let inserted = Booking::insert(
            &db.pool,
            user_id,
            booking.subject.as_str(),
            &booking.date.format("%Y-%m-%d").to_string(),
            &booking.time.format("%H:%M").to_string(),
            &booking.phone,
        )
        .await;
        match inserted {
            Ok(row) => info!("Booking {} stored for user {}", row.id, user_id),
            Err(e) => {
                error!("Failed to store booking for user {}: {}", user_id, e);
                bot.send_message(
                    chat_id,
                    "⚠️ Something went wrong while saving your booking. Please try again.",
                )
                .await?;
                bot.answer_callback_query(q.id).await?;
                return Ok(());
            }
        }
    }

    match &outcome.reply {
        Reply::Ignored => {}
        Reply::SubjectMenu => {
            edit_or_send(
                &bot,
                q.message.as_ref(),
                chat_id,
                render::SUBJECT_PROMPT.to_string(),
                keyboards::subject_menu(),
            )
            .await?;
        }
        Reply::Calendar { subject, year, month } => {
            let grid = calendar::generate(*year, *month, *subject, today, policy);
            edit_or_send(
                &bot,
                q.message.as_ref(),
                chat_id,
                render::calendar_text(*subject),
                keyboards::calendar_keyboard(&grid),
            )
            .await?;
        }
        Reply::TimeSlots { subject } => {
            edit_or_send(
                &bot,
                q.message.as_ref(),
                chat_id,
                render::TIME_PROMPT.to_string(),
                keyboards::time_slot_menu(*subject),
            )
            .await?;
        }
        Reply::MainMenu => {
            edit_or_send(
                &bot,
                q.message.as_ref(),
                chat_id,
                render::MAIN_MENU_TEXT.to_string(),
                keyboards::main_menu(&config.webapp_url),
            )
            .await?;
        }
        Reply::Cancelled => {
            edit_or_send(
                &bot,
                q.message.as_ref(),
                chat_id,
                render::CANCELLED_TEXT.to_string(),
                keyboards::main_menu(&config.webapp_url),
            )
            .await?;
        }
        // The phone prompt needs a reply keyboard, and the remaining replies
        // are terminal; all of these go out as fresh messages.
        reply => {
            render::send_reply(&bot, chat_id, reply, config, today, policy).await?;
        }
    }

    bot.answer_callback_query(q.id).await?;
    Ok(())
}

/// Edits the originating message in place; callbacks that arrive without one
/// (messages older than what Telegram retains) get a fresh message instead.
async fn edit_or_send(
    bot: &Bot,
    message: Option<&Message>,
    fallback_chat: ChatId,
    text: String,
    keyboard: teloxide::types::InlineKeyboardMarkup,
) -> HandlerResult {
    match message {
        Some(message) => {
            bot.edit_message_text(message.chat.id, message.id, text)
                .reply_markup(keyboard)
                .await?;
        }
        None => {
            bot.send_message(fallback_chat, text)
                .reply_markup(keyboard)
                .await?;
        }
    }
    Ok(())
}
