//! # shift-bot
//!
//! Telegram front-end for [`shift_engine`]: reads chat messages, queries the
//! Toggl reports API and answers with the tracked total.
//!
//! ## Modules
//!
//! - [`config`] — CLI flags and environment
//! - [`toggl`] — Reports API client
//! - [`telegram`] — Bot API long polling and replies
//! - [`handler`] — Per-message pipeline and the catch-all error boundary
//! - [`bot`] — Polling loop

pub mod bot;
pub mod config;
pub mod handler;
pub mod telegram;
pub mod toggl;

pub use bot::Bot;
pub use handler::answer;
pub use telegram::TelegramClient;
pub use toggl::ReportsClient;
