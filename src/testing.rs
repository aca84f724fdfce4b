use std::sync::{
    atomic::{AtomicBool, AtomicI32, Ordering},
    Mutex,
};

use async_trait::async_trait;
use teloxide::{ApiError, RequestError};

use crate::{
    gateway::{GatewayError, Keyboard, MessageGateway, MessageHandle},
    state::UserId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outbound {
    Send {
        user: UserId,
        handle: MessageHandle,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Edit {
        user: UserId,
        handle: MessageHandle,
        text: String,
    },
    Ack {
        event_id: String,
        text: String,
    },
}

/// Gateway double that records everything the engine emits.
#[derive(Debug, Default)]
pub(crate) struct RecordingGateway {
    outbound: Mutex<Vec<Outbound>>,
    next_handle: AtomicI32,
    failing: AtomicBool,
}

impl RecordingGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail after recording it.
    pub(crate) fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub(crate) fn take(&self) -> Vec<Outbound> {
        std::mem::take(&mut *self.outbound.lock().unwrap())
    }

    pub(crate) fn sent_texts(&self) -> Vec<String> {
        self.outbound
            .lock()
            .unwrap()
            .iter()
            .filter_map(|out| match out {
                Outbound::Send { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, out: Outbound) -> Result<(), GatewayError> {
        self.outbound.lock().unwrap().push(out);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RequestError::Api(ApiError::BotBlocked).into());
        }
        Ok(())
    }
}

#[async_trait]
impl MessageGateway for RecordingGateway {
    async fn send_message(
        &self,
        user: UserId,
        text: String,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageHandle, GatewayError> {
        let handle = MessageHandle(self.next_handle.fetch_add(1, Ordering::SeqCst) + 1);
        self.record(Outbound::Send {
            user,
            handle,
            text,
            keyboard,
        })?;
        Ok(handle)
    }

    async fn edit_message(
        &self,
        user: UserId,
        handle: MessageHandle,
        text: String,
    ) -> Result<(), GatewayError> {
        self.record(Outbound::Edit { user, handle, text })
    }

    async fn send_ephemeral_ack(&self, event_id: &str, text: String) -> Result<(), GatewayError> {
        self.record(Outbound::Ack {
            event_id: event_id.to_owned(),
            text,
        })
    }
}
