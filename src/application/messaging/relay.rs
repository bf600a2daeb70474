//! External relay - Forwards messages from an outside chat into the game channel

use super::outbox::{Outbox, SendKind};
use crate::application::errors::BotError;
use crate::domain::entities::{OutboundMessage, Route};

/// A message seen on the external chat platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMessage {
    pub channel_id: String,
    pub author: String,
    pub content: String,
}

impl RelayMessage {
    pub fn new(channel_id: impl Into<String>, author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            author: author.into(),
            content: content.into(),
        }
    }
}

pub struct ExternalRelay {
    outbox: Outbox,
    route: Route,
    channel_id: String,
}

impl ExternalRelay {
    pub fn new(outbox: Outbox, route: Route, channel_id: impl Into<String>) -> Self {
        Self {
            outbox,
            route,
            channel_id: channel_id.into(),
        }
    }

    /// Forward a message if it came from the relayed channel.
    /// Returns whether anything was sent.
    pub async fn forward(&self, message: &RelayMessage) -> Result<bool, BotError> {
        if message.channel_id != self.channel_id {
            tracing::debug!("Ignoring relay message from channel {}", message.channel_id);
            return Ok(false);
        }

        let text = format!("{}: {}", message.author, message.content);
        let outbound = OutboundMessage::new(self.route.clone(), text);
        self.outbox.send(&outbound, SendKind::UserVisible).await?;
        Ok(true)
    }
}
