//! Polling loop: one task per incoming message.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use shift_engine::ShiftOptions;
use tracing::{error, info, info_span, warn, Instrument};

use crate::handler::answer;
use crate::telegram::{IncomingMessage, TelegramClient};
use crate::toggl::ReportsClient;

/// Pause after a failed `getUpdates` before polling again.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct Bot {
    telegram: TelegramClient,
    reports: ReportsClient,
    options: ShiftOptions,
}

impl Bot {
    pub fn new(telegram: TelegramClient, reports: ReportsClient, options: ShiftOptions) -> Self {
        Self {
            telegram,
            reports,
            options,
        }
    }

    /// Poll until Ctrl-C. Handler and transport faults never end the loop.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let me = self
            .telegram
            .get_me()
            .await
            .context("Fetching bot identity")?;
        info!(
            "@{} is running... Press Ctrl-C to terminate",
            me.username.as_deref().unwrap_or("unknown")
        );

        let mut offset = None;
        loop {
            let updates = tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down");
                    return Ok(());
                }
                updates = self.telegram.get_updates(offset) => updates,
            };

            let updates = match updates {
                Ok(updates) => updates,
                Err(err) => {
                    warn!("Polling for updates failed: {err:#}");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);
                if let Some(message) = update.into_incoming() {
                    let span = info_span!("message", chat_id = message.chat_id);
                    tokio::spawn(Arc::clone(&self).handle(message).instrument(span));
                }
            }
        }
    }

    async fn handle(self: Arc<Self>, message: IncomingMessage) {
        let reply = answer(
            message.text.as_deref(),
            Utc::now,
            &self.reports,
            &self.options,
        )
        .await;

        if let Err(err) = self
            .telegram
            .send_message(message.chat_id, &reply.to_string())
            .await
        {
            error!("Sending reply failed: {err:#}");
        }
    }
}
