use async_trait::async_trait;
use teloxide::{
    payloads::{AnswerCallbackQuerySetters, SendMessageSetters},
    prelude::Requester,
    types::{ChatId, MessageId},
    Bot, RequestError,
};
use thiserror::Error;
use tracing::instrument;

use crate::{callback::CallbackToken, keyboard, state::UserId};

/// Identifies a sent message so it can be edited later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub i32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub token: CallbackToken,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, token: CallbackToken) -> Self {
        Self {
            label: label.into(),
            token,
        }
    }
}

/// Transport-agnostic description of the buttons attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent buttons that send their label back as text.
    Reply(Vec<Vec<String>>),
    /// Buttons attached to the message that answer with a callback token.
    Inline(Vec<Vec<InlineButton>>),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("telegram request failed: {0}")]
    Request(#[from] RequestError),
}

#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn send_message(
        &self,
        user: UserId,
        text: String,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageHandle, GatewayError>;

    async fn edit_message(
        &self,
        user: UserId,
        message: MessageHandle,
        text: String,
    ) -> Result<(), GatewayError>;

    async fn send_ephemeral_ack(&self, event_id: &str, text: String) -> Result<(), GatewayError>;
}

/// `MessageGateway` over the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessageGateway for TelegramGateway {
    #[instrument(level = "debug", skip(self, text, keyboard))]
    async fn send_message(
        &self,
        user: UserId,
        text: String,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageHandle, GatewayError> {
        let request = self.bot.send_message(ChatId(user.0), text);
        let sent = match keyboard {
            Some(markup) => request.reply_markup(keyboard::render(markup)).await?,
            None => request.await?,
        };

        Ok(MessageHandle(sent.id.0))
    }

    #[instrument(level = "debug", skip(self, text))]
    async fn edit_message(
        &self,
        user: UserId,
        message: MessageHandle,
        text: String,
    ) -> Result<(), GatewayError> {
        self.bot
            .edit_message_text(ChatId(user.0), MessageId(message.0), text)
            .await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self, text))]
    async fn send_ephemeral_ack(&self, event_id: &str, text: String) -> Result<(), GatewayError> {
        self.bot
            .answer_callback_query(event_id.to_owned())
            .text(text)
            .await?;
        Ok(())
    }
}
