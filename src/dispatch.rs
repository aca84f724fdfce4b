use std::sync::Arc;

use tracing::debug;

use crate::{
    callback::CallbackToken,
    commands::Command,
    gateway::MessageHandle,
    keyboard::{FINISH_QUIZ, MY_SCORE, START_QUIZ},
    runner::QuizEngine,
    state::UserId,
};

pub(crate) const QUIZ_FINISHED_ACK: &str = "Quiz finished";
pub(crate) const QUIZ_RESTARTED_ACK: &str = "Quiz restarted!";

/// An inbound chat event, already stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    Text(String),
    Callback {
        message: Option<MessageHandle>,
        event_id: String,
        data: String,
    },
}

/// Maps one inbound event onto at most one engine operation.
pub async fn route(engine: &Arc<QuizEngine>, user: UserId, event: Inbound) {
    match event {
        Inbound::Command(command) => match command {
            Command::Help => engine.help(user).await,
            Command::Start => engine.welcome(user).await,
            Command::Quiz => engine.start(user).await,
            Command::Score => engine.score(user).await,
        },
        Inbound::Text(text) => match text.as_str() {
            START_QUIZ => engine.start(user).await,
            MY_SCORE => engine.score(user).await,
            FINISH_QUIZ => engine.terminate(user).await,
            other => debug!(%user, text = other, "ignoring text"),
        },
        Inbound::Callback {
            message,
            event_id,
            data,
        } => match data.parse::<CallbackToken>() {
            Ok(CallbackToken::Answer { question, option }) => {
                engine
                    .submit(user, message, &event_id, question, option)
                    .await
            }
            Ok(CallbackToken::EndQuiz) => {
                engine.terminate(user).await;
                engine
                    .acknowledge(&event_id, QUIZ_FINISHED_ACK.to_owned())
                    .await;
            }
            Ok(CallbackToken::RestartQuiz) => {
                engine.start(user).await;
                engine
                    .acknowledge(&event_id, QUIZ_RESTARTED_ACK.to_owned())
                    .await;
            }
            Err(e) => debug!(%user, error = %e, "ignoring callback"),
        },
    }
}
