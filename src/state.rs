use std::fmt;

use uuid::Uuid;

/// Stable identity of a quiz taker (the Telegram chat id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingAnswer(usize),
    Completed,
    Abandoned { answered: usize },
}

/// Progress of one user through the question bank.
///
/// `score <= current_idx <= question_count` holds after every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    run: Uuid,
    current_idx: usize,
    score: usize,
    active: bool,
}

impl UserSession {
    pub fn new() -> Self {
        Self {
            run: Uuid::new_v4(),
            current_idx: 0,
            score: 0,
            active: true,
        }
    }

    pub fn run(&self) -> Uuid {
        self.run
    }

    pub fn current_idx(&self) -> usize {
        self.current_idx
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self, question_count: usize) -> SessionPhase {
        match (self.active, self.current_idx < question_count) {
            (true, true) => SessionPhase::AwaitingAnswer(self.current_idx),
            (_, false) => SessionPhase::Completed,
            (false, true) => SessionPhase::Abandoned {
                answered: self.current_idx,
            },
        }
    }

    /// Applies an evaluated answer and returns the index of the next question.
    pub(crate) fn record_answer(&mut self, correct: bool) -> usize {
        if correct {
            self.score += 1;
        }
        self.current_idx += 1;
        self.current_idx
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    /// True if a deferred prompt for `expected_idx` of run `run` may still be shown.
    pub(crate) fn awaits(&self, run: Uuid, expected_idx: usize) -> bool {
        self.active && self.run == run && self.current_idx == expected_idx
    }
}

impl Default for UserSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_awaits_first_question() {
        let session = UserSession::new();

        assert_eq!(session.phase(5), SessionPhase::AwaitingAnswer(0));
        assert_eq!(session.score(), 0);
        assert!(session.is_active());
    }

    #[test]
    fn record_answer_advances_and_scores() {
        let mut session = UserSession::new();

        assert_eq!(session.record_answer(true), 1);
        assert_eq!(session.record_answer(false), 2);
        assert_eq!(session.score(), 1);
        assert_eq!(session.current_idx(), 2);
    }

    #[test]
    fn phases_after_deactivation() {
        let mut session = UserSession::new();
        session.record_answer(true);
        session.deactivate();
        assert_eq!(session.phase(5), SessionPhase::Abandoned { answered: 1 });

        for _ in 0..4 {
            session.record_answer(false);
        }
        assert_eq!(session.phase(5), SessionPhase::Completed);
    }

    #[test]
    fn awaits_checks_run_and_index() {
        let session = UserSession::new();
        let other = UserSession::new();

        assert!(session.awaits(session.run(), 0));
        assert!(!session.awaits(session.run(), 1));
        assert!(!session.awaits(other.run(), 0));
    }
}
