//! Throttle recovery - Timed message sequence after a spam rejection
//!
//! The server lets a message through again once a few different messages
//! have been sent in between. After a rejection we send a warning, a few
//! filler lines, then the rejected message once more.

use std::time::Duration;
use tokio::task::JoinHandle;

use super::outbox::{Outbox, SendKind};
use crate::domain::entities::{OutboundMessage, Route};

/// Fixed content and pacing of a recovery run
#[derive(Debug, Clone)]
pub struct RecoveryPlan {
    pub delay: Duration,
    pub warning: String,
    pub fillers: Vec<String>,
}

impl Default for RecoveryPlan {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(250),
            warning: "flagged for spam!".to_string(),
            fillers: vec!["a".to_string(), "b".to_string()],
        }
    }
}

/// Handles to one in-progress recovery run
#[derive(Debug)]
pub struct RecoveryRun {
    handles: Vec<JoinHandle<()>>,
}

impl RecoveryRun {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(JoinHandle::is_finished)
    }

    /// Wait until every scheduled send has gone out
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!("Recovery send task failed: {}", e);
            }
        }
    }
}

/// Starts recovery runs on rejection notices
#[derive(Clone)]
pub struct ThrottleRecoveryScheduler {
    outbox: Outbox,
    plan: RecoveryPlan,
    fallback_route: Route,
}

impl ThrottleRecoveryScheduler {
    pub fn new(outbox: Outbox, plan: RecoveryPlan, fallback_route: Route) -> Self {
        Self {
            outbox,
            plan,
            fallback_route,
        }
    }

    /// Messages for one run, given the last real message at the time of rejection
    pub fn sequence(&self, last: Option<OutboundMessage>) -> Vec<OutboundMessage> {
        let route = last
            .as_ref()
            .map(|m| m.route.clone())
            .unwrap_or_else(|| self.fallback_route.clone());

        let mut sequence = Vec::with_capacity(self.plan.fillers.len() + 2);
        sequence.push(OutboundMessage::new(route.clone(), self.plan.warning.clone()));
        for filler in &self.plan.fillers {
            sequence.push(OutboundMessage::new(route.clone(), filler.clone()));
        }
        // Nothing to resend when no real message has gone out yet
        sequence.extend(last);
        sequence
    }

    /// Schedule element i at i * delay. Returns immediately.
    pub fn start(&self) -> RecoveryRun {
        let last = self.outbox.last().snapshot();
        let sequence = self.sequence(last);

        let handles = sequence
            .into_iter()
            .enumerate()
            .map(|(i, message)| {
                let outbox = self.outbox.clone();
                let at = self.plan.delay * i as u32;
                tokio::spawn(async move {
                    tokio::time::sleep(at).await;
                    if let Err(e) = outbox.send(&message, SendKind::Recovery).await {
                        tracing::error!("Recovery send failed: {}", e);
                    }
                })
            })
            .collect();

        let run = RecoveryRun { handles };
        tracing::warn!("Message rejected, started recovery ({} sends)", run.len());
        run
    }
}
