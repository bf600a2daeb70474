use async_trait::async_trait;
use crate::domain::entities::{BedwarsSummary, PlayerIdentity};

/// Identity and statistics lookups.
///
/// `None` means "not found" for any reason, including transport failures;
/// implementations log the cause themselves.
#[async_trait]
pub trait StatsLookup: Send + Sync {
    async fn resolve_identity(&self, username: &str) -> Option<PlayerIdentity>;

    async fn fetch_summary(&self, identity: &PlayerIdentity) -> Option<BedwarsSummary>;
}
