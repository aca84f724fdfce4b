use std::fmt;

use rand::{seq::SliceRandom, RngCore};

const AFFIRMATIONS: [&str; 5] = [
    "Excellent!",
    "Superb!",
    "Well done!",
    "Nice one!",
    "Magnificent!",
];

/// Whole percentage of correct answers, truncated.
pub fn percentage(score: usize, question_count: usize) -> usize {
    if question_count == 0 {
        return 0;
    }
    score * 100 / question_count
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTier {
    Top,
    Strong,
    Middling,
    Retry,
}

impl FeedbackTier {
    pub fn for_percentage(percentage: usize) -> Self {
        match percentage {
            90.. => Self::Top,
            70.. => Self::Strong,
            50.. => Self::Middling,
            _ => Self::Retry,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Top => "You're a genius! Flawless!",
            Self::Strong => "Great result! You know the subject well!",
            Self::Middling => "Good result! There is still room to grow!",
            Self::Retry => "Don't give up! Try again!",
        }
    }
}

impl fmt::Display for FeedbackTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Result of a run as shown to the user by the summary and score views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReport {
    pub score: usize,
    pub total: usize,
    pub percentage: usize,
    pub tier: FeedbackTier,
}

impl ScoreReport {
    pub fn new(score: usize, total: usize) -> Self {
        let percentage = percentage(score, total);
        Self {
            score,
            total,
            percentage,
            tier: FeedbackTier::for_percentage(percentage),
        }
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Your result: {}/{} correct answers\nCorrect answers: {}%\n\n{}",
            self.score, self.total, self.percentage, self.tier
        )
    }
}

pub fn affirmation(rng: &mut dyn RngCore) -> &'static str {
    AFFIRMATIONS.choose(rng).copied().unwrap_or(AFFIRMATIONS[0])
}
