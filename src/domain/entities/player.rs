use serde::{Deserialize, Serialize};
use std::fmt;

/// Experience needed per Bedwars star
pub const EXPERIENCE_PER_STAR: f64 = 5000.0;

/// A player resolved through the identity service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub username: String,
    /// Opaque unique id, as the identity service spells it
    pub uuid: String,
}

impl PlayerIdentity {
    pub fn new(username: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            uuid: uuid.into(),
        }
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.uuid)
    }
}

/// Raw Bedwars block from a player's stats payload
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BedwarsStats {
    #[serde(rename = "Experience", alias = "experience", default)]
    pub experience: Option<f64>,
    #[serde(rename = "final_kills_bedwars", default)]
    pub final_kills: Option<u64>,
    #[serde(rename = "final_deaths_bedwars", default)]
    pub final_deaths: Option<u64>,
    #[serde(rename = "wins_bedwars", default)]
    pub wins: Option<u64>,
    #[serde(rename = "losses_bedwars", default)]
    pub losses: Option<u64>,
}

/// Human-readable Bedwars numbers derived from [`BedwarsStats`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedwarsSummary {
    pub star_level: u64,
    pub final_kills: u64,
    /// Final kill/death ratio, two decimals
    pub fkdr: String,
    pub wins: u64,
    /// Win/loss ratio, two decimals
    pub wlr: String,
}

impl BedwarsSummary {
    /// Derive the summary. Missing or zero deaths and losses count as 1.
    pub fn derive(stats: &BedwarsStats) -> Self {
        let experience = stats.experience.unwrap_or(0.0).max(0.0);
        let star_level = (experience / EXPERIENCE_PER_STAR).floor() as u64;

        let final_kills = stats.final_kills.unwrap_or(0);
        let final_deaths = stats.final_deaths.unwrap_or(1).max(1);
        let wins = stats.wins.unwrap_or(0);
        let losses = stats.losses.unwrap_or(1).max(1);

        Self {
            star_level,
            final_kills,
            fkdr: ratio(final_kills, final_deaths),
            wins,
            wlr: ratio(wins, losses),
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> String {
    format!("{:.2}", numerator as f64 / denominator as f64)
}

/// Chat reply for a stat check
pub fn format_reply(name: &str, summary: &BedwarsSummary) -> String {
    format!(
        "{}: {}✫ | {} Finals | {} FKDR | {} Wins | {} WLR",
        name, summary.star_level, summary.final_kills, summary.fkdr, summary.wins, summary.wlr
    )
}
