pub mod callback;
pub mod message;
pub mod render;

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;

use crate::booking::calendar::CalendarPolicy;
use crate::booking::session::SessionStore;
use crate::bot::commands::Command;
use crate::config::Config;
use crate::database::connection::Database;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Wires commands, plain messages and callback queries to their handlers.
/// All shared state (pool, session store, config) is captured here; the
/// dispatcher itself carries no extra dependencies.
pub struct BotHandler {
    pub db: Database,
    pub store: Arc<SessionStore>,
    pub config: Arc<Config>,
    pub policy: CalendarPolicy,
}

impl BotHandler {
    pub fn new(db: Database, store: Arc<SessionStore>, config: Arc<Config>) -> Self {
        Self {
            db,
            store,
            config,
            policy: CalendarPolicy::default(),
        }
    }

    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        let command_state = (self.db.clone(), self.config.clone());
        let message_state = (self.store.clone(), self.config.clone(), self.policy);
        let callback_state = (
            self.db.clone(),
            self.store.clone(),
            self.config.clone(),
            self.policy,
        );

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let (db, config) = command_state.clone();
                        async move { message::command_handler(bot, msg, cmd, &db, &config).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let (store, config, policy) = message_state.clone();
                async move { message::message_handler(bot, msg, &store, &config, policy).await }
            }))
            .branch(
                Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                    let (db, store, config, policy) = callback_state.clone();
                    async move { callback::callback_handler(bot, q, &db, &store, &config, policy).await }
                }),
            )
    }
}
