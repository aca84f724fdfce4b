use std::{collections::HashMap, sync::Arc};

use tokio::{
    sync::{Mutex, OwnedMutexGuard, RwLock},
    task::JoinHandle,
};

use crate::state::{UserId, UserSession};

/// Per-user entry of the store. The slot lock serializes every operation
/// touching the user's session.
#[derive(Debug, Default)]
pub struct SessionSlot {
    pub(crate) session: Option<UserSession>,
    pending_prompt: Option<JoinHandle<()>>,
}

impl SessionSlot {
    pub fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut UserSession> {
        self.session.as_mut()
    }

    /// Replaces the session with a fresh one and cancels the previous run's timer.
    pub(crate) fn restart(&mut self) -> &mut UserSession {
        self.cancel_pending();
        self.session.insert(UserSession::new())
    }

    pub(crate) fn set_pending(&mut self, handle: JoinHandle<()>) {
        self.cancel_pending();
        self.pending_prompt = Some(handle);
    }

    /// Drops the handle of a timer that is currently firing without aborting it.
    pub(crate) fn clear_pending(&mut self) {
        self.pending_prompt = None;
    }

    pub(crate) fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending_prompt.take() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn has_pending(&self) -> bool {
        self.pending_prompt
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

pub type SlotGuard = OwnedMutexGuard<SessionSlot>;

/// In-memory mapping from user to session.
///
/// The map lock is held only for lookup and insert, so operations on
/// different users never wait on each other.
#[derive(Debug, Default)]
pub struct SessionStore {
    slots: RwLock<HashMap<UserId, Arc<Mutex<SessionSlot>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the user's slot, creating an empty one if needed.
    pub async fn lock(&self, user: UserId) -> SlotGuard {
        let existing = self.slots.read().await.get(&user).cloned();
        let slot = match existing {
            Some(slot) => slot,
            None => self.slots.write().await.entry(user).or_default().clone(),
        };

        slot.lock_owned().await
    }

    /// Locks the user's slot only if the user has one.
    pub async fn lock_existing(&self, user: UserId) -> Option<SlotGuard> {
        let slot = self.slots.read().await.get(&user).cloned()?;
        Some(slot.lock_owned().await)
    }

    pub async fn snapshot(&self, user: UserId) -> Option<UserSession> {
        self.lock_existing(user)
            .await
            .and_then(|slot| slot.session.clone())
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn unknown_user_has_no_session() {
        let store = SessionStore::new();

        assert!(store.snapshot(UserId(1)).await.is_none());
        assert!(store.lock_existing(UserId(1)).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn restart_overwrites_previous_session() {
        let store = SessionStore::new();

        let first_run = {
            let mut slot = store.lock(UserId(7)).await;
            let session = slot.restart();
            session.record_answer(true);
            session.run()
        };

        let mut slot = store.lock(UserId(7)).await;
        let session = slot.restart();
        assert_ne!(session.run(), first_run);
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_idx(), 0);
        drop(slot);

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn users_do_not_share_slots() {
        let store = SessionStore::new();

        let _held = store.lock(UserId(1)).await;
        let other = tokio::time::timeout(Duration::from_secs(1), store.lock(UserId(2))).await;

        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn restart_aborts_pending_prompt() {
        let store = SessionStore::new();
        let mut slot = store.lock(UserId(3)).await;
        slot.restart();
        slot.set_pending(tokio::spawn(std::future::pending()));
        assert!(slot.has_pending());

        slot.restart();
        assert!(!slot.has_pending());
    }
}
