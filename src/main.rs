//! # Tutor Bot Main Entry Point
//!
//! Initializes logging, loads configuration, prepares the database schema,
//! and runs the Telegram bot and the quiz web server side by side.

use anyhow::Result;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod booking;
mod bot;
mod config;
mod database;
mod utils;
mod web;

use crate::booking::session::SessionStore;
use crate::bot::handlers::BotHandler;
use crate::config::Config;
use crate::database::connection::Database;
use crate::web::QuizApp;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutor_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    info!("Starting Tutor Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}",
        config.database_url, config.http_port
    );

    // Initialize database
    info!("Initializing database connection...");
    let db = Database::new(&config.database_url).await?;
    db.init_schema().await?;
    let db_arc = Arc::new(db);
    info!("Database initialized successfully");

    // Initialize bot
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let store = Arc::new(SessionStore::new());
    let handler = BotHandler::new(db_arc.as_ref().clone(), store, config.clone());
    info!("Telegram bot initialized successfully");

    // Initialize the quiz web application
    let quiz_app = QuizApp::new(db_arc.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Quiz web server starting on port {}", config.http_port);

    // Run both the bot and the web server concurrently
    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let web_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, quiz_app.router).await {
            tracing::error!("Web server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = web_task => {
            if let Err(e) = result2 {
                tracing::error!("Web task error: {}", e);
            }
        }
    }

    info!("Application stopped");
    Ok(())
}
