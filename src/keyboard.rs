use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};

use crate::{
    callback::CallbackToken,
    gateway::{InlineButton, Keyboard},
    storage::QuizQuestion,
};

pub(crate) const START_QUIZ: &str = "Start quiz";
pub(crate) const MY_SCORE: &str = "My score";
pub(crate) const FINISH_QUIZ: &str = "Finish quiz";
pub(crate) const TAKE_AGAIN: &str = "Take it again";

pub(crate) fn render(keyboard: Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Reply(rows) => {
            let keyboard = rows
                .into_iter()
                .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>());

            KeyboardMarkup::new(keyboard).into()
        }
        Keyboard::Inline(rows) => {
            let keyboard = rows.into_iter().map(|row| {
                row.into_iter()
                    .map(|button| {
                        InlineKeyboardButton::callback(button.label, button.token.to_string())
                    })
                    .collect::<Vec<_>>()
            });

            InlineKeyboardMarkup::new(keyboard).into()
        }
    }
}

pub(crate) fn action_keyboard() -> Keyboard {
    Keyboard::Reply(vec![vec![START_QUIZ.to_owned(), MY_SCORE.to_owned()]])
}

pub(crate) fn answers_keyboard(question_idx: usize, question: &QuizQuestion) -> Keyboard {
    let mut rows: Vec<Vec<InlineButton>> = question
        .options()
        .iter()
        .enumerate()
        .map(|(option, text)| {
            vec![InlineButton::new(
                *text,
                CallbackToken::Answer {
                    question: question_idx,
                    option,
                },
            )]
        })
        .collect();

    rows.push(vec![InlineButton::new(FINISH_QUIZ, CallbackToken::EndQuiz)]);

    Keyboard::Inline(rows)
}

pub(crate) fn restart_keyboard() -> Keyboard {
    Keyboard::Inline(vec![vec![InlineButton::new(
        TAKE_AGAIN,
        CallbackToken::RestartQuiz,
    )]])
}
