use async_trait::async_trait;
use crate::application::errors::BotError;

/// The transport's "say a line in chat" primitive.
///
/// Lines arrive fully rendered (route prefix included); implementations
/// must not add prefixes of their own.
#[async_trait]
pub trait OutboundSink: Send + Sync {
    async fn send_line(&self, line: &str) -> Result<(), BotError>;
}
