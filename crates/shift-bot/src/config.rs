//! Command-line and environment configuration.
//!
//! Environment names follow the deployment convention of the bot
//! (`BotToken`, `ToggleToken`, `ToggleWorkspace`); flags override them.

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use shift_engine::{ShiftOptions, DEFAULT_NIGHT_CUTOFF_HOUR};

pub const DEFAULT_TOGGL_API_URL: &str = "https://api.track.toggl.com";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Parser, Debug)]
#[command(name = "shift-bot")]
#[command(about = "Telegram bot that totals Toggl time entries for the current shift")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub toggl: TogglArgs,

    #[command(flatten)]
    pub shift: ShiftArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the bot: poll Telegram and answer every message
    Run {
        /// Telegram bot token
        #[arg(long, env = "BotToken", hide_env_values = true)]
        bot_token: String,

        /// Telegram Bot API base URL
        #[arg(long, env = "TELEGRAM_API_URL", default_value = DEFAULT_TELEGRAM_API_URL)]
        telegram_api_url: String,
    },

    /// Answer a single message and print the reply
    Ask {
        /// Message text, e.g. "Task Coding"
        text: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TogglArgs {
    /// Toggl API token
    #[arg(long, env = "ToggleToken", hide_env_values = true)]
    pub toggl_token: String,

    /// Toggl workspace id
    #[arg(long, env = "ToggleWorkspace")]
    pub workspace: String,

    /// Toggl API base URL
    #[arg(long, env = "TOGGL_API_URL", default_value = DEFAULT_TOGGL_API_URL)]
    pub toggl_api_url: String,
}

#[derive(Args, Debug, Clone)]
pub struct ShiftArgs {
    /// IANA timezone of the bot's wall clock
    #[arg(long, env = "SHIFT_BOT_TIMEZONE", default_value = "UTC")]
    pub timezone: String,

    /// Hour before which messages refer to the previous day's shift
    #[arg(long, env = "SHIFT_BOT_NIGHT_CUTOFF", default_value_t = DEFAULT_NIGHT_CUTOFF_HOUR)]
    pub night_cutoff_hour: u32,
}

impl ShiftArgs {
    pub fn to_options(&self) -> Result<ShiftOptions> {
        let timezone: Tz = self
            .timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone '{}'", self.timezone))
            .context("Parsing --timezone")?;
        if self.night_cutoff_hour > 23 {
            bail!(
                "night cutoff hour must be between 0 and 23, got {}",
                self.night_cutoff_hour
            );
        }
        Ok(ShiftOptions {
            night_cutoff_hour: self.night_cutoff_hour,
            timezone,
        })
    }
}
