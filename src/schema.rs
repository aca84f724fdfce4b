use std::sync::Arc;

use teloxide::{
    dispatching::{dialogue::GetChatId, UpdateFilterExt, UpdateHandler},
    dptree,
    types::{CallbackQuery, Message, Update},
};
use tracing::{debug, instrument};

use crate::{
    commands::Command,
    dispatch::{route, Inbound},
    gateway::MessageHandle,
    runner::QuizEngine,
    state::UserId,
    HandlerResult,
};

pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let command_handler = teloxide::filter_command::<Command, _>().endpoint(on_command);

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .endpoint(on_text);

    let callback_handler = Update::filter_callback_query().endpoint(on_callback);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}

#[instrument(level = "info", skip(msg, engine))]
async fn on_command(msg: Message, command: Command, engine: Arc<QuizEngine>) -> HandlerResult {
    route(&engine, UserId(msg.chat.id.0), Inbound::Command(command)).await;
    Ok(())
}

#[instrument(level = "debug", skip(msg, engine))]
async fn on_text(msg: Message, engine: Arc<QuizEngine>) -> HandlerResult {
    let Some(text) = msg.text() else {
        debug!(chat = msg.chat.id.0, "ignoring message without text");
        return Ok(());
    };

    route(&engine, UserId(msg.chat.id.0), Inbound::Text(text.to_owned())).await;
    Ok(())
}

#[instrument(level = "info", skip(q, engine), fields(data = ?q.data))]
async fn on_callback(q: CallbackQuery, engine: Arc<QuizEngine>) -> HandlerResult {
    let Some(chat_id) = q.chat_id() else {
        debug!("ignoring callback without a chat");
        return Ok(());
    };
    let Some(data) = q.data.clone() else {
        return Ok(());
    };

    let event = Inbound::Callback {
        message: q.message.as_ref().map(|message| MessageHandle(message.id().0)),
        event_id: q.id.to_string(),
        data,
    };
    route(&engine, UserId(chat_id.0), event).await;
    Ok(())
}
