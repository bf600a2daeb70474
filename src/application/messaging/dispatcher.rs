//! Command dispatcher - Routes parsed chat lines to lookups and recovery

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::outbox::{Outbox, SendKind};
use super::parser::ChatLineParser;
use super::recovery::{RecoveryRun, ThrottleRecoveryScheduler};
use crate::domain::entities::{format_reply, ChatLine, OutboundMessage, ParseOutcome, ParsedCommand, Route};
use crate::domain::traits::{OutboundSink, StatsLookup};

/// Where stat check replies go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplyPolicy {
    /// Back into the scope channel the command came from
    #[default]
    Broadcast,
    /// Private message to whoever asked
    Direct,
    /// Scope channel, plus a copy to the external relay
    RelayEcho,
}

impl std::str::FromStr for ReplyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "broadcast" => Ok(ReplyPolicy::Broadcast),
            "direct" => Ok(ReplyPolicy::Direct),
            "relay-echo" | "relay" => Ok(ReplyPolicy::RelayEcho),
            other => Err(format!("unknown reply mode: {}", other)),
        }
    }
}

/// What the dispatcher did with a line
#[derive(Debug)]
pub enum Dispatch {
    /// A lookup task was spawned
    Lookup(JoinHandle<()>),
    Recovery(RecoveryRun),
    Ignored,
}

impl Dispatch {
    pub fn is_finished(&self) -> bool {
        match self {
            Dispatch::Lookup(handle) => handle.is_finished(),
            Dispatch::Recovery(run) => run.is_finished(),
            Dispatch::Ignored => true,
        }
    }

    /// Wait for whatever work the line started
    pub async fn finish(self) {
        match self {
            Dispatch::Lookup(handle) => {
                if let Err(e) = handle.await {
                    tracing::error!("Lookup task failed: {}", e);
                }
            }
            Dispatch::Recovery(run) => run.join().await,
            Dispatch::Ignored => {}
        }
    }
}

/// Counts lookups in flight; decrements when dropped, whatever the outcome
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Resolve a player and format their stat line. `None` if any stage comes back empty.
///
/// The reply names the player as the requester typed it.
pub async fn stat_check(lookup: &dyn StatsLookup, username: &str) -> Option<String> {
    let Some(identity) = lookup.resolve_identity(username).await else {
        tracing::info!("No identity for {}, dropping", username);
        return None;
    };

    let Some(summary) = lookup.fetch_summary(&identity).await else {
        tracing::info!("No Bedwars stats for {}, dropping", identity);
        return None;
    };

    Some(format_reply(username, &summary))
}

/// Feeds chat lines through the parser and acts on the result
pub struct CommandDispatcher {
    parser: ChatLineParser,
    lookup: Arc<dyn StatsLookup>,
    outbox: Outbox,
    recovery: ThrottleRecoveryScheduler,
    policy: ReplyPolicy,
    channel_route: Route,
    direct_command: String,
    echo: Option<Arc<dyn OutboundSink>>,
    in_flight: Arc<AtomicUsize>,
}

impl CommandDispatcher {
    pub fn new(
        parser: ChatLineParser,
        lookup: Arc<dyn StatsLookup>,
        outbox: Outbox,
        recovery: ThrottleRecoveryScheduler,
        channel_route: Route,
    ) -> Self {
        Self {
            parser,
            lookup,
            outbox,
            recovery,
            policy: ReplyPolicy::Broadcast,
            channel_route,
            direct_command: "/msg".to_string(),
            echo: None,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_policy(mut self, policy: ReplyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_direct_command(mut self, command: impl Into<String>) -> Self {
        self.direct_command = command.into();
        self
    }

    /// Sink that receives a copy of each reply under [`ReplyPolicy::RelayEcho`]
    pub fn with_echo(mut self, echo: Arc<dyn OutboundSink>) -> Self {
        self.echo = Some(echo);
        self
    }

    /// Lookups started but not yet finished
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Handle one incoming line. Never blocks on network or timers.
    pub fn handle_line(&self, line: &ChatLine) -> Dispatch {
        tracing::debug!(">> [{}] {}", line.received_at.format("%H:%M:%S"), line);

        match self.parser.parse(line) {
            ParseOutcome::Command(cmd) => self.dispatch_command(cmd),
            ParseOutcome::Rejection => Dispatch::Recovery(self.recovery.start()),
            ParseOutcome::Ignored => Dispatch::Ignored,
        }
    }

    fn reply_route(&self, cmd: &ParsedCommand) -> Route {
        match (self.policy, cmd.sender.as_deref()) {
            (ReplyPolicy::Direct, Some(sender)) => Route::direct(&self.direct_command, sender),
            (ReplyPolicy::Direct, None) => {
                tracing::warn!("No sender on {} command, replying in channel", cmd.name);
                self.channel_route.clone()
            }
            _ => self.channel_route.clone(),
        }
    }

    fn dispatch_command(&self, cmd: ParsedCommand) -> Dispatch {
        let Some(username) = cmd.target().map(str::to_string) else {
            return Dispatch::Ignored;
        };
        tracing::info!(
            "{} requested {} {}",
            cmd.sender.as_deref().unwrap_or("someone"),
            cmd.name,
            username
        );

        let route = self.reply_route(&cmd);
        let lookup = Arc::clone(&self.lookup);
        let outbox = self.outbox.clone();
        let echo = match self.policy {
            ReplyPolicy::RelayEcho => self.echo.clone(),
            _ => None,
        };
        let guard = InFlight::enter(&self.in_flight);

        let handle = tokio::spawn(async move {
            let _guard = guard;

            let Some(reply) = stat_check(lookup.as_ref(), &username).await else {
                return;
            };

            let message = OutboundMessage::new(route, reply);
            if let Err(e) = outbox.send(&message, SendKind::UserVisible).await {
                tracing::error!("Failed to send reply for {}: {}", username, e);
            }

            if let Some(echo) = echo {
                if let Err(e) = echo.send_line(&message.text).await {
                    tracing::warn!("Failed to echo reply to relay: {}", e);
                }
            }
        });

        Dispatch::Lookup(handle)
    }
}
