//! Hypixel stats lookup - Mojang identity API plus Hypixel player API

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::application::errors::LookupError;
use crate::domain::entities::{BedwarsStats, BedwarsSummary, PlayerIdentity};
use crate::domain::traits::StatsLookup;
use crate::infrastructure::config::LookupConfig;

/// Mojang profile response
#[derive(Deserialize, Debug)]
struct ProfileResponse {
    id: String,
    name: Option<String>,
}

/// Hypixel `/player` response
#[derive(Deserialize, Debug)]
struct PlayerResponse {
    success: bool,
    cause: Option<String>,
    player: Option<Player>,
}

#[derive(Deserialize, Debug)]
struct Player {
    stats: Option<PlayerStats>,
}

#[derive(Deserialize, Debug)]
struct PlayerStats {
    #[serde(rename = "Bedwars")]
    bedwars: Option<BedwarsStats>,
}

// Replies still use the name as typed; the canonical name is only for logs
fn identity_from_profile(requested: &str, profile: ProfileResponse) -> PlayerIdentity {
    let username = profile.name.unwrap_or_else(|| requested.to_string());
    PlayerIdentity::new(username, profile.id)
}

fn bedwars_from_response(response: PlayerResponse) -> Result<BedwarsStats, LookupError> {
    if !response.success {
        return Err(LookupError::Api(response.cause.unwrap_or_default()));
    }

    response
        .player
        .ok_or(LookupError::PlayerMissing)?
        .stats
        .and_then(|s| s.bedwars)
        .ok_or(LookupError::StatsMissing)
}

/// HTTP client for both lookup services
pub struct StatsLookupClient {
    client: Client,
    identity_url: String,
    stats_url: String,
    api_key: String,
}

impl StatsLookupClient {
    pub fn new(identity_url: impl Into<String>, stats_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            identity_url: identity_url.into(),
            stats_url: stats_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &LookupConfig) -> Self {
        Self::new(
            &config.identity_url,
            &config.stats_url,
            config.api_key.clone().unwrap_or_default(),
        )
    }

    /// Username goes in as a single escaped path segment
    fn profile_url(&self, username: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.identity_url)
            .map_err(|e| LookupError::Parse(format!("identity url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::Parse(format!("identity url cannot take a path: {}", self.identity_url)))?
            .pop_if_empty()
            .push(username);
        Ok(url)
    }

    pub async fn try_resolve_identity(&self, username: &str) -> Result<PlayerIdentity, LookupError> {
        let response = self.client.get(self.profile_url(username)?).send().await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        let profile: ProfileResponse = response.json().await?;
        Ok(identity_from_profile(username, profile))
    }

    pub async fn try_fetch_stats(&self, identity: &PlayerIdentity) -> Result<BedwarsStats, LookupError> {
        let response = self
            .client
            .get(&self.stats_url)
            .query(&[("key", self.api_key.as_str()), ("uuid", identity.uuid.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        let body: PlayerResponse = response.json().await?;
        bedwars_from_response(body)
    }
}

#[async_trait]
impl StatsLookup for StatsLookupClient {
    async fn resolve_identity(&self, username: &str) -> Option<PlayerIdentity> {
        match self.try_resolve_identity(username).await {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!("Identity lookup for {} failed: {}", username, e);
                None
            }
        }
    }

    async fn fetch_summary(&self, identity: &PlayerIdentity) -> Option<BedwarsSummary> {
        match self.try_fetch_stats(identity).await {
            Ok(stats) => Some(BedwarsSummary::derive(&stats)),
            Err(e) => {
                tracing::warn!("Stats lookup for {} failed: {}", identity, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn player_response(value: serde_json::Value) -> PlayerResponse {
        serde_json::from_value(value).expect("fixture should deserialize")
    }

    #[test]
    fn test_identity_uses_returned_name() {
        let profile: ProfileResponse = serde_json::from_value(json!({
            "id": "069a79f444e94726a5befca90e38aaf5",
            "name": "Notch"
        }))
        .unwrap();

        let identity = identity_from_profile("notch", profile);
        assert_eq!(identity.username, "Notch");
        assert_eq!(identity.uuid, "069a79f444e94726a5befca90e38aaf5");
    }

    #[test]
    fn test_identity_falls_back_to_requested_name() {
        let profile: ProfileResponse = serde_json::from_value(json!({ "id": "abc" })).unwrap();
        assert_eq!(identity_from_profile("steve", profile).username, "steve");
    }

    #[test]
    fn test_bedwars_block_extracted() {
        let response = player_response(json!({
            "success": true,
            "player": {
                "displayname": "Notch",
                "stats": {
                    "Bedwars": {
                        "Experience": 12345,
                        "final_kills_bedwars": 50,
                        "wins_bedwars": 10,
                        "beds_broken_bedwars": 3
                    },
                    "SkyWars": { "wins": 2 }
                }
            }
        }));

        let stats = bedwars_from_response(response).unwrap();
        let summary = BedwarsSummary::derive(&stats);
        assert_eq!(summary.star_level, 2);
        assert_eq!(summary.fkdr, "50.00");
        assert_eq!(summary.wlr, "10.00");
    }

    #[test]
    fn test_unsuccessful_response() {
        let response = player_response(json!({ "success": false, "cause": "Invalid API key" }));
        assert!(matches!(bedwars_from_response(response), Err(LookupError::Api(cause)) if cause == "Invalid API key"));
    }

    #[test]
    fn test_null_player() {
        let response = player_response(json!({ "success": true, "player": null }));
        assert!(matches!(bedwars_from_response(response), Err(LookupError::PlayerMissing)));
    }

    #[test]
    fn test_player_without_bedwars() {
        let response = player_response(json!({
            "success": true,
            "player": { "stats": { "SkyWars": {} } }
        }));
        assert!(matches!(bedwars_from_response(response), Err(LookupError::StatsMissing)));

        let response = player_response(json!({ "success": true, "player": {} }));
        assert!(matches!(bedwars_from_response(response), Err(LookupError::StatsMissing)));
    }

    #[test]
    fn test_profile_url() {
        let client = StatsLookupClient::new("https://api.mojang.com/users/profiles/minecraft/", "http://x", "k");
        assert_eq!(
            client.profile_url("Notch").unwrap().as_str(),
            "https://api.mojang.com/users/profiles/minecraft/Notch"
        );
    }

    #[test]
    fn test_profile_url_escapes_username() {
        let client = StatsLookupClient::new("https://api.mojang.com/users/profiles/minecraft", "http://x", "k");

        let url = client.profile_url("../x").unwrap();
        assert_eq!(url.path(), "/users/profiles/minecraft/..%2Fx");
        assert_eq!(url.host_str(), Some("api.mojang.com"));

        let url = client.profile_url("a?b=c#d").unwrap();
        assert_eq!(url.path(), "/users/profiles/minecraft/a%3Fb=c%23d");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_bad_identity_url() {
        let client = StatsLookupClient::new("not a url", "http://x", "k");
        assert!(matches!(client.profile_url("Notch"), Err(LookupError::Parse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_not_found() {
        let client = StatsLookupClient::new("http://127.0.0.1:9", "http://127.0.0.1:9", "k");
        assert!(client.resolve_identity("Notch").await.is_none());
        assert!(client
            .fetch_summary(&PlayerIdentity::new("Notch", "abc"))
            .await
            .is_none());
    }

    #[tokio::test]
    #[ignore] // Requires HYPIXEL_API_KEY and network access
    async fn test_live_lookup() {
        let api_key = std::env::var("HYPIXEL_API_KEY").expect("HYPIXEL_API_KEY not set");
        let client = StatsLookupClient::from_config(&LookupConfig {
            api_key: Some(api_key),
            ..crate::infrastructure::config::Config::default().lookup
        });

        let identity = client.resolve_identity("Technoblade").await.expect("identity");
        assert_eq!(identity.uuid.len(), 32);
        assert!(client.fetch_summary(&identity).await.is_some());
    }
}
