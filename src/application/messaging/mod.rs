//! Message handling - Chat line parsing, dispatch and throttle recovery

pub mod dispatcher;
pub mod outbox;
pub mod parser;
pub mod recovery;
pub mod relay;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatcher::{stat_check, CommandDispatcher, Dispatch, ReplyPolicy};
pub use outbox::{LastOutbound, Outbox, SendKind};
pub use parser::ChatLineParser;
pub use recovery::{RecoveryPlan, ThrottleRecoveryScheduler};
pub use relay::{ExternalRelay, RelayMessage};
