use chrono::Utc;
use teloxide::prelude::*;
use tracing::{error, info, warn};

use crate::booking::calendar::CalendarPolicy;
use crate::booking::machine::{self, Event};
use crate::booking::session::SessionStore;
use crate::bot::commands::Command;
use crate::bot::keyboards;
use crate::config::Config;
use crate::database::connection::Database;
use crate::database::models::{User, UserStats};

use super::render;
use super::HandlerResult;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    db: &Database,
    config: &Config,
) -> HandlerResult {
    match cmd {
        Command::Start => handle_start(bot, msg, db, config).await,
    }
}

/// `/start`: refresh the user row, show a greeting with quiz statistics (if
/// any) and the main menu. Database trouble degrades to a greeting without
/// statistics rather than a failed interaction.
async fn handle_start(bot: Bot, msg: Message, db: &Database, config: &Config) -> HandlerResult {
    let user = match msg.from() {
        Some(user) => user,
        None => return Ok(()),
    };
    let telegram_id = user.id.0 as i64;

    if let Err(e) = User::upsert(
        &db.pool,
        telegram_id,
        user.username.clone(),
        user.full_name(),
    )
    .await
    {
        warn!("Failed to upsert user {}: {}", telegram_id, e);
    }

    let stats_text = match UserStats::find(&db.pool, telegram_id).await {
        Ok(Some(stats)) if stats.total_questions > 0 => format!(
            "\n\nYour quiz stats:\n📊 Questions answered: {}\n✅ Correct answers: {}\n🎯 Accuracy: {}%",
            stats.total_questions,
            stats.correct_answers,
            stats.accuracy(),
        ),
        Ok(_) => String::new(),
        Err(e) => {
            error!("Failed to load stats for {}: {}", telegram_id, e);
            String::new()
        }
    };

    let admin_note = if config.admin_id == Some(telegram_id) {
        "\n\n🛠 You are signed in as the administrator."
    } else {
        ""
    };

    info!("User {} ({}) started the bot", telegram_id, user.full_name());

    bot.send_message(
        msg.chat.id,
        format!(
            "Hi, {}! 👋\n\nWelcome to the tutoring bot! Take the quiz to test yourself, or book a lesson below.{stats_text}{admin_note}",
            user.first_name
        ),
    )
    .reply_markup(keyboards::main_menu(&config.webapp_url))
    .await?;

    Ok(())
}

/// Non-command messages: shared contacts and typed text feed the booking
/// machine (phone capture); anything else ends up back at the main menu.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    store: &SessionStore,
    config: &Config,
    policy: CalendarPolicy,
) -> HandlerResult {
    let user_id = match msg.from() {
        Some(user) => user.id.0 as i64,
        None => return Ok(()),
    };

    let event = if let Some(contact) = msg.contact() {
        Event::Contact { phone: contact.phone_number.clone() }
    } else if let Some(text) = msg.text() {
        Event::Text(text.to_string())
    } else {
        return Ok(());
    };

    let today = Utc::now().date_naive();
    let outcome = machine::handle_event(store, user_id, event, today, policy);

    // The confirm transition only fires from a callback, so there is never a
    // booking to persist here.
    debug_assert!(outcome.booking.is_none());

    render::send_reply(&bot, msg.chat.id, &outcome.reply, config, today, policy).await
}
