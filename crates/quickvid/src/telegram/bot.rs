//! Bot instance creation and command registration

use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use teloxide::prelude::*;
use teloxide::types::BotCommand;

use crate::core::config::{self, Config};
use crate::core::error::AppResult;
use crate::telegram::commands::BOT_COMMANDS;

/// Creates a Bot with the configured token and, if set, a custom Bot API URL.
///
/// The HTTP client timeout covers uploads of artifacts up to the delivery ceiling.
pub fn create_bot(config: &Config) -> AppResult<Bot> {
    let token = config.require_bot_token()?;
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(token.expose_secret(), client);

    let bot = match config.bot_api_url {
        Some(ref url) => {
            log::info!("Using custom Bot API URL: {}", url);
            bot.set_api_url(url.clone())
        }
        None => bot,
    };

    Ok(bot)
}

/// Commands shown in Telegram's command menu
pub fn bot_commands() -> Vec<BotCommand> {
    BOT_COMMANDS
        .iter()
        .map(|(command, description)| BotCommand::new(*command, *description))
        .collect()
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(bot_commands()).await?;
    Ok(())
}
