//! Outbox - Routed sends and last-message bookkeeping

use std::sync::{Arc, Mutex, PoisonError};

use crate::application::errors::BotError;
use crate::domain::entities::OutboundMessage;
use crate::domain::traits::OutboundSink;

/// Whether a send counts as the last real message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendKind {
    UserVisible,
    /// Part of the throttle recovery sequence, never recorded
    Recovery,
}

/// Single-slot cell holding the most recent user-visible message
#[derive(Debug, Clone, Default)]
pub struct LastOutbound {
    slot: Arc<Mutex<Option<OutboundMessage>>>,
}

impl LastOutbound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<OutboundMessage> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record(&self, message: &OutboundMessage) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.clone());
    }
}

/// Sends routed messages through the transport and keeps [`LastOutbound`] current
#[derive(Clone)]
pub struct Outbox {
    sink: Arc<dyn OutboundSink>,
    last: LastOutbound,
}

impl Outbox {
    pub fn new(sink: Arc<dyn OutboundSink>) -> Self {
        Self {
            sink,
            last: LastOutbound::new(),
        }
    }

    pub fn last(&self) -> &LastOutbound {
        &self.last
    }

    /// Render and send a message.
    ///
    /// User-visible messages are recorded before the transport sees them, so
    /// a rejection notice always refers to what is in the slot.
    pub async fn send(&self, message: &OutboundMessage, kind: SendKind) -> Result<(), BotError> {
        if kind == SendKind::UserVisible {
            self.last.record(message);
        }

        let line = message.render();
        tracing::info!("<< {}", line);
        self.sink.send_line(&line).await
    }
}
