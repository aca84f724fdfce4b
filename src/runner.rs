use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use rand::{rngs::StdRng, RngCore, SeedableRng};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    commands::help_text,
    gateway::{Keyboard, MessageGateway, MessageHandle},
    keyboard::{action_keyboard, answers_keyboard, restart_keyboard},
    scoring::{self, ScoreReport},
    state::UserId,
    storage::{question::OPTIONS_PER_QUESTION, QuestionBank, SessionSlot, SessionStore},
};

pub const DEFAULT_QUESTION_DELAY: Duration = Duration::from_secs(2);

pub(crate) const WELCOME: &str = "Welcome to the quiz!\n\
    Test your knowledge across different subjects.\n\
    Every question has 4 answer options.\n\
    Commands:\n\
    /quiz - start the quiz.\n\
    /score - show your score.\n\
    Or use the buttons below:";
pub(crate) const NOT_TAKEN: &str = "You have not taken the quiz yet! Use /quiz to start.";

/// Drives every user's session through the question bank.
///
/// Each operation holds the user's slot lock from the first read to the last
/// emitted message, so events for one user are applied one at a time.
pub struct QuizEngine {
    bank: QuestionBank,
    store: SessionStore,
    gateway: Arc<dyn MessageGateway>,
    rng: Mutex<Box<dyn RngCore + Send>>,
    question_delay: Duration,
}

impl QuizEngine {
    pub fn new(
        bank: QuestionBank,
        gateway: Arc<dyn MessageGateway>,
        question_delay: Duration,
    ) -> Self {
        Self {
            bank,
            store: SessionStore::new(),
            gateway,
            rng: Mutex::new(Box::new(StdRng::from_entropy())),
            question_delay,
        }
    }

    /// Replaces the source used to pick affirmations.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[instrument(level = "info", skip(self))]
    pub async fn welcome(&self, user: UserId) {
        self.send(user, WELCOME.to_owned(), Some(action_keyboard()))
            .await;
    }

    #[instrument(level = "info", skip(self))]
    pub async fn help(&self, user: UserId) {
        self.send(user, help_text(), None).await;
    }

    /// Starts a new run, discarding whatever the user had before.
    #[instrument(level = "info", skip(self))]
    pub async fn start(&self, user: UserId) {
        let mut slot = self.store.lock(user).await;
        let run = slot.restart().run();
        info!(%user, %run, "quiz started");

        self.prompt(user, &mut slot, 0).await;
    }

    /// Evaluates an answer to `question_idx`.
    ///
    /// Answers for anything but the question the session currently waits on
    /// are dropped, which makes duplicate taps and stale buttons harmless.
    #[instrument(level = "info", skip(self, message, event_id))]
    pub async fn submit(
        self: &Arc<Self>,
        user: UserId,
        message: Option<MessageHandle>,
        event_id: &str,
        question_idx: usize,
        option: usize,
    ) {
        let Some(mut slot) = self.store.lock_existing(user).await else {
            debug!(%user, "answer without a session");
            return;
        };
        let Some(session) = slot.session_mut() else {
            return;
        };
        if !session.is_active() {
            debug!(%user, "answer for a finished quiz");
            return;
        }
        if session.current_idx() != question_idx {
            debug!(
                %user,
                expected = session.current_idx(),
                got = question_idx,
                "stale answer"
            );
            return;
        }
        let Some(question) = self.bank.get(question_idx) else {
            return;
        };
        if option >= OPTIONS_PER_QUESTION {
            debug!(%user, option, "option out of range");
            return;
        }

        let correct = question.is_correct(option);
        let next_idx = session.record_answer(correct);
        let run = session.run();
        info!(%user, question = question_idx, option, correct, "answer recorded");

        let outcome = if correct {
            format!("Correct! {}", self.affirmation())
        } else {
            format!("Wrong. The correct answer is: {}", question.correct_text())
        };

        self.acknowledge(event_id, outcome.clone()).await;
        if let Some(message) = message {
            let text = format!("{}\n\n{}", self.question_text(question_idx), outcome);
            if let Err(e) = self.gateway.edit_message(user, message, text).await {
                warn!(%user, error = %e, "failed to edit question");
            }
        }

        if next_idx < self.bank.len() {
            self.schedule_prompt(&mut slot, user, run, next_idx);
        } else {
            self.finish(user, &mut slot).await;
        }
    }

    /// Ends the user's run and sends the summary. Safe to call repeatedly.
    #[instrument(level = "info", skip(self))]
    pub async fn terminate(&self, user: UserId) {
        let Some(mut slot) = self.store.lock_existing(user).await else {
            debug!(%user, "nothing to terminate");
            return;
        };

        self.finish(user, &mut slot).await;
    }

    #[instrument(level = "info", skip(self))]
    pub async fn score(&self, user: UserId) {
        let text = match self.store.snapshot(user).await {
            Some(session) => ScoreReport::new(session.score(), self.bank.len()).to_string(),
            None => NOT_TAKEN.to_owned(),
        };

        self.send(user, text, None).await;
    }

    pub async fn acknowledge(&self, event_id: &str, text: String) {
        if let Err(e) = self.gateway.send_ephemeral_ack(event_id, text).await {
            warn!(event_id, error = %e, "failed to answer callback");
        }
    }

    /// Timer body: shows `question_idx` only if the run is still waiting on it.
    pub(crate) async fn deliver_scheduled(&self, user: UserId, run: Uuid, question_idx: usize) {
        let Some(mut slot) = self.store.lock_existing(user).await else {
            return;
        };
        let awaiting = slot
            .session()
            .is_some_and(|session| session.awaits(run, question_idx));
        if !awaiting {
            debug!(%user, %run, question = question_idx, "dropping stale prompt");
            return;
        }

        slot.clear_pending();
        self.prompt(user, &mut slot, question_idx).await;
    }

    async fn prompt(&self, user: UserId, slot: &mut SessionSlot, question_idx: usize) {
        let Some(question) = self.bank.get(question_idx) else {
            self.finish(user, slot).await;
            return;
        };

        debug!(%user, question = question_idx, "sending question");
        self.send(
            user,
            self.question_text(question_idx),
            Some(answers_keyboard(question_idx, question)),
        )
        .await;
    }

    fn schedule_prompt(
        self: &Arc<Self>,
        slot: &mut SessionSlot,
        user: UserId,
        run: Uuid,
        question_idx: usize,
    ) {
        let engine = Arc::clone(self);
        let delay = self.question_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            engine.deliver_scheduled(user, run, question_idx).await;
        });

        slot.set_pending(handle);
    }

    async fn finish(&self, user: UserId, slot: &mut SessionSlot) {
        slot.cancel_pending();
        let Some(session) = slot.session_mut() else {
            return;
        };
        session.deactivate();

        let report = ScoreReport::new(session.score(), self.bank.len());
        info!(
            %user,
            score = report.score,
            total = report.total,
            percentage = report.percentage,
            "quiz finished"
        );

        self.send(
            user,
            format!("Quiz finished!\n\n{report}"),
            Some(restart_keyboard()),
        )
        .await;
    }

    fn question_text(&self, question_idx: usize) -> String {
        let text = self
            .bank
            .get(question_idx)
            .map(|question| question.text())
            .unwrap_or_default();

        format!("Question {}/{}:\n{}", question_idx + 1, self.bank.len(), text)
    }

    fn affirmation(&self) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        scoring::affirmation(&mut **rng)
    }

    async fn send(&self, user: UserId, text: String, keyboard: Option<Keyboard>) {
        if let Err(e) = self.gateway.send_message(user, text, keyboard).await {
            warn!(%user, error = %e, "failed to send message");
        }
    }
}
