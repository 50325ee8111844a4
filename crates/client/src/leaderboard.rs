//! Wire types for the external high-score service.
//!
//! Scores are posted form-encoded and the leaderboard comes back as JSON.
//! Only the payload shapes live here; the transport is someone else's job.
use std::fmt::Display;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Timestamp layout the service expects.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: u32,
    pub timestamp: NaiveDateTime,
}

impl ScoreSubmission {
    pub fn new(player_name: impl Into<String>, score: u32, timestamp: NaiveDateTime) -> Self {
        Self {
            player_name: player_name.into(),
            score,
            timestamp,
        }
    }

    /// Stamped with the local wall clock.
    pub fn now(player_name: impl Into<String>, score: u32) -> Self {
        Self::new(player_name, score, Local::now().naive_local())
    }

    /// Form fields in submission order.
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        [
            ("playerName", self.player_name.clone()),
            ("score", self.score.to_string()),
            ("timestamp", self.timestamp.format(TIMESTAMP_FORMAT).to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<LeaderboardEntry>,
}

impl LeaderboardResponse {
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(deserialize_with = "number_or_string")]
    pub rank: u32,
    pub player_name: String,
    #[serde(deserialize_with = "number_or_string")]
    pub score: u32,
    pub timestamp: String,
}

/// Accepts `7` as well as `"7"`.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Number(T),
        Text(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Best score seen this session; never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct HighScore(u32);

impl HighScore {
    pub fn get(self) -> u32 {
        self.0
    }

    /// Returns `true` if `score` beat the previous best.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.0 {
            self.0 = score;
            return true;
        }
        false
    }
}
