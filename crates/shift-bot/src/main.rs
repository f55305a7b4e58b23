use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use shift_bot::config::{Cli, Command};
use shift_bot::{answer, Bot, ReportsClient, TelegramClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shift_bot=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.shift.to_options()?;
    let reports = ReportsClient::new(
        &cli.toggl.toggl_api_url,
        &cli.toggl.toggl_token,
        &cli.toggl.workspace,
    )?;

    match cli.command {
        Command::Run {
            bot_token,
            telegram_api_url,
        } => {
            let telegram = TelegramClient::new(&telegram_api_url, &bot_token)?;
            Arc::new(Bot::new(telegram, reports, options)).run().await
        }
        Command::Ask { text } => {
            let reply = answer(Some(&text), Utc::now, &reports, &options).await;
            println!("{reply}");
            Ok(())
        }
    }
}
