//! Fakes shared by the messaging tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::application::errors::BotError;
use crate::domain::entities::{BedwarsSummary, PlayerIdentity};
use crate::domain::traits::{OutboundSink, StatsLookup};

/// Sink that remembers every line and when it was sent
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(Instant, String)>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, l)| l.clone()).collect()
    }

    pub fn timed(&self) -> Vec<(Instant, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutboundSink for RecordingSink {
    async fn send_line(&self, line: &str) -> Result<(), BotError> {
        self.sent.lock().unwrap().push((Instant::now(), line.to_string()));
        if self.fail {
            return Err(BotError::Send("transport closed".to_string()));
        }
        Ok(())
    }
}

/// Lookup backed by a fixed table, with optional per-player latency
#[derive(Default)]
pub struct FakeLookup {
    players: HashMap<String, (PlayerIdentity, Option<BedwarsSummary>)>,
    latency: HashMap<String, Duration>,
    identity_calls: AtomicUsize,
    summary_calls: AtomicUsize,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, name: &str, summary: Option<BedwarsSummary>) -> Self {
        let identity = PlayerIdentity::new(name, format!("uuid-{}", name.to_lowercase()));
        self.players.insert(name.to_lowercase(), (identity, summary));
        self
    }

    pub fn with_latency(mut self, name: &str, latency: Duration) -> Self {
        self.latency.insert(name.to_lowercase(), latency);
        self
    }

    pub fn identity_calls(&self) -> usize {
        self.identity_calls.load(Ordering::SeqCst)
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatsLookup for FakeLookup {
    async fn resolve_identity(&self, username: &str) -> Option<PlayerIdentity> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        let key = username.to_lowercase();
        if let Some(latency) = self.latency.get(&key) {
            tokio::time::sleep(*latency).await;
        }
        self.players.get(&key).map(|(identity, _)| identity.clone())
    }

    async fn fetch_summary(&self, identity: &PlayerIdentity) -> Option<BedwarsSummary> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        self.players
            .get(&identity.username.to_lowercase())
            .and_then(|(_, summary)| summary.clone())
    }
}

pub fn summary(star_level: u64) -> BedwarsSummary {
    BedwarsSummary {
        star_level,
        final_kills: 20,
        fkdr: "4.00".to_string(),
        wins: 15,
        wlr: "1.50".to_string(),
    }
}
