use thiserror::Error;
use tracing::error;

pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("correct option {correct} is out of range for question '{text}'")]
    CorrectOutOfRange { text: String, correct: usize },
}

/// A single multiple-choice item of the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    text: &'static str,
    options: [&'static str; OPTIONS_PER_QUESTION],
    correct: usize,
}

impl QuizQuestion {
    pub fn new(
        text: &'static str,
        options: [&'static str; OPTIONS_PER_QUESTION],
        correct: usize,
    ) -> Result<Self, QuestionError> {
        if correct >= OPTIONS_PER_QUESTION {
            return Err(QuestionError::CorrectOutOfRange {
                text: text.to_owned(),
                correct,
            });
        }

        Ok(Self {
            text,
            options,
            correct,
        })
    }

    pub fn text(&self) -> &str {
        self.text
    }

    pub fn options(&self) -> &[&'static str; OPTIONS_PER_QUESTION] {
        &self.options
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn correct_text(&self) -> &str {
        self.options[self.correct]
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct
    }
}

/// Ordered, immutable sequence of questions shared by every session.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<QuizQuestion>,
}

impl QuestionBank {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&QuizQuestion> {
        self.questions.get(idx)
    }
}

const BUILTIN: [(&str, [&str; OPTIONS_PER_QUESTION], usize); 5] = [
    ("What is the capital of France?", ["London", "Berlin", "Paris", "Madrid"], 2),
    ("How many planets are there in the Solar System?", ["7", "8", "9", "10"], 1),
    ("Which programming language is the best?", ["Python", "Java", "Go", "C#"], 3),
    ("Which animal is the symbol of Russia?", ["Bear", "Eagle", "Wolf", "Tiger"], 0),
    ("In which year did a human first fly into space?", ["1957", "1961", "1969", "1975"], 1),
];

impl Default for QuestionBank {
    fn default() -> Self {
        let questions = BUILTIN
            .into_iter()
            .filter_map(|(text, options, correct)| {
                QuizQuestion::new(text, options, correct)
                    .inspect_err(|e| error!(error = %e, "skipping built-in question"))
                    .ok()
            })
            .collect();

        Self::new(questions)
    }
}
