//! # Tutor Bot
//!
//! A Telegram tutoring bot with two faces sharing one SQLite database:
//!
//! - a conversation flow for booking lessons (subject, calendar date picker,
//!   time slot, phone number, confirmation)
//! - an embedded quiz mini-application served over HTTP, with per-user
//!   progress statistics
//!
//! Science lessons run on Wednesdays, programming lessons on Fridays; the
//! calendar only offers matching future dates.

/// The booking conversation: calendar, sessions, payloads, state machine
pub mod booking;
/// Telegram command, message and callback handling
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and schema setup
pub mod database;
/// Small shared helpers (input validation)
pub mod utils;
/// The quiz web application
pub mod web;
