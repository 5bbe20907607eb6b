use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Whether a match is still to be played or already has a result.
///
/// The classification comes from which page was scraped, never from the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchType {
    Upcoming,
    Previous,
}

/// A single fixture or result.
///
/// Upcoming matches never carry scores; previous matches always carry both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(rename = "type")]
    pub match_type: MatchType,
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(serialize_with = "serialize_millis")]
    pub datetime: DateTime<Utc>,
    pub home_score: Option<String>,
    pub away_score: Option<String>,
}

impl Match {
    pub fn upcoming(
        id: String,
        home_team: String,
        away_team: String,
        datetime: DateTime<Utc>,
    ) -> Self {
        Self {
            match_type: MatchType::Upcoming,
            id,
            home_team,
            away_team,
            datetime,
            home_score: None,
            away_score: None,
        }
    }

    pub fn previous(
        id: String,
        home_team: String,
        away_team: String,
        datetime: DateTime<Utc>,
        home_score: String,
        away_score: String,
    ) -> Self {
        Self {
            match_type: MatchType::Previous,
            id,
            home_team,
            away_team,
            datetime,
            home_score: Some(home_score),
            away_score: Some(away_score),
        }
    }
}

/// Serialize as `2026-01-31T23:00:00.000Z`, the shape API consumers already parse.
fn serialize_millis<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
