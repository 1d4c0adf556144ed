use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InputFile, KeyboardButton, KeyboardMarkup, ParseMode, ReplyMarkup,
};

use crate::core::error::AppResult;
use crate::download::send::{Attachment, Menu, OutboundSink};

/// [`OutboundSink`] over the Bot API.
#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn reply_markup(menu: Menu) -> ReplyMarkup {
    match menu {
        Menu::Inline(rows) => ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows.into_iter().map(|row| {
            row.into_iter()
                .map(|(label, data)| InlineKeyboardButton::callback(label, data))
                .collect::<Vec<_>>()
        }))),
        Menu::Reply(rows) => ReplyMarkup::Keyboard(
            KeyboardMarkup::new(
                rows.into_iter()
                    .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>()),
            )
            .resize_keyboard(),
        ),
    }
}

#[async_trait]
impl OutboundSink for TelegramSink {
    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }

    async fn send_markdown(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::MarkdownV2)
            .await?;
        Ok(())
    }

    async fn send_menu(&self, chat_id: i64, text: &str, menu: Menu) -> AppResult<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_markup(reply_markup(menu))
            .await?;
        Ok(())
    }

    async fn send_attachment(&self, chat_id: i64, attachment: &Attachment) -> AppResult<()> {
        let chat = ChatId(chat_id);
        match attachment {
            Attachment::Audio(path) => {
                log::info!("Sending audio {} to chat {}", path.display(), chat_id);
                self.bot.send_audio(chat, InputFile::file(path)).await?;
            }
            Attachment::Document(path) => {
                log::info!("Sending document {} to chat {}", path.display(), chat_id);
                self.bot.send_document(chat, InputFile::file(path)).await?;
            }
        }
        Ok(())
    }
}
