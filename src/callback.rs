use std::{fmt, str::FromStr};

use thiserror::Error;

const ANSWER_PREFIX: &str = "answer";
const END_QUIZ: &str = "end_quiz";
const RESTART_QUIZ: &str = "restart_quiz";

/// Data round-tripped through inline keyboard buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackToken {
    Answer { question: usize, option: usize },
    EndQuiz,
    RestartQuiz,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed callback token '{0}'")]
pub struct MalformedToken(pub String);

impl FromStr for CallbackToken {
    type Err = MalformedToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedToken(s.to_owned());

        match s {
            END_QUIZ => return Ok(Self::EndQuiz),
            RESTART_QUIZ => return Ok(Self::RestartQuiz),
            _ => {}
        }

        let mut parts = s.split('_');
        if parts.next() != Some(ANSWER_PREFIX) {
            return Err(malformed());
        }
        let question = parts.next().and_then(parse_index).ok_or_else(malformed)?;
        let option = parts.next().and_then(parse_index).ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self::Answer { question, option })
    }
}

// Only plain decimal digits, so "+1" or " 1" never alias a real button.
fn parse_index(part: &str) -> Option<usize> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Answer { question, option } => {
                write!(f, "{ANSWER_PREFIX}_{question}_{option}")
            }
            Self::EndQuiz => f.write_str(END_QUIZ),
            Self::RestartQuiz => f.write_str(RESTART_QUIZ),
        }
    }
}
