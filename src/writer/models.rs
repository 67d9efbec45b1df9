use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One match outcome in a team's recent-form sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl fmt::Display for FormResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormResult::Win => write!(f, "W"),
            FormResult::Draw => write!(f, "D"),
            FormResult::Loss => write!(f, "L"),
        }
    }
}

/// Render a form sequence as a compact string, e.g. `WWDLW`.
pub fn form_string(form: &[FormResult]) -> String {
    form.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    #[serde(default)]
    pub recent_form: Vec<FormResult>,
    pub league_position: u32,
    #[serde(default)]
    pub home_away_record: String,
    /// Player name to availability note ("伤缺", "出战成疑", ...).
    #[serde(default)]
    pub key_players_status: BTreeMap<String, String>,
    #[serde(default)]
    pub recent_performance: String,
    #[serde(default)]
    pub goals_scored: Option<u32>,
    #[serde(default)]
    pub goals_conceded: Option<u32>,
    #[serde(default)]
    pub top_scorer: Option<String>,
    #[serde(default = "default_formation")]
    pub formation: String,
}

fn default_formation() -> String {
    "4-4-2".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchInfo {
    pub home_team: TeamInfo,
    pub away_team: TeamInfo,
    pub league: String,
    pub match_time: String,
    pub venue: String,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub referee: Option<String>,
    #[serde(default = "default_importance")]
    pub importance: String,
}

fn default_importance() -> String {
    "常规赛".to_string()
}

/// Decimal odds and market descriptors. Values are taken as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsInfo {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    pub asian_handicap: String,
    pub over_under: String,
    #[serde(default = "default_odds_trend")]
    pub odds_trend: String,
}

fn default_odds_trend() -> String {
    "稳定".to_string()
}

/// Winner tag of a past meeting. Unrecognised tags count as an away win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum H2hWinner {
    Home,
    Draw,
    Away,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadToHead {
    #[serde(default)]
    pub date: Option<String>,
    /// Final score as `"H-A"`.
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub winner: Option<H2hWinner>,
}

impl HeadToHead {
    pub fn new(date: &str, score: &str, winner: H2hWinner) -> Self {
        Self {
            date: Some(date.to_string()),
            score: Some(score.to_string()),
            winner: Some(winner),
        }
    }

    /// Parse the `"H-A"` score. Malformed scores yield `None`.
    pub fn goals(&self) -> Option<(u32, u32)> {
        let score = self.score.as_deref()?;
        let (home, away) = score.split_once('-')?;
        Some((home.trim().parse().ok()?, away.trim().parse().ok()?))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoricalData {
    #[serde(default)]
    pub h2h_results: Vec<HeadToHead>,
    #[serde(default)]
    pub home_team_home_record: String,
    #[serde(default)]
    pub away_team_away_record: String,
    #[serde(default)]
    pub last_meeting_details: Option<String>,
}

/// An external opinion spliced into the prediction section (AI reply, partner model, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub source: String,
    pub text: String,
}

impl Insight {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_string() {
        let form = [FormResult::Win, FormResult::Draw, FormResult::Loss];
        assert_eq!(form_string(&form), "WDL");
    }

    #[test]
    fn test_team_defaults_from_json() {
        let team: TeamInfo =
            serde_json::from_str(r#"{"name":"东京FC","league_position":3}"#).unwrap();
        assert_eq!(team.formation, "4-4-2");
        assert!(team.recent_form.is_empty());
        assert!(team.key_players_status.is_empty());
        assert!(team.top_scorer.is_none());
    }

    #[test]
    fn test_unknown_winner_tag_parses_as_other() {
        let h2h: HeadToHead =
            serde_json::from_str(r#"{"score":"1-0","winner":"abandoned"}"#).unwrap();
        assert_eq!(h2h.winner, Some(H2hWinner::Other));
    }

    #[test]
    fn test_score_parsing() {
        assert_eq!(HeadToHead::new("", "2-1", H2hWinner::Home).goals(), Some((2, 1)));
        assert_eq!(HeadToHead::new("", "x-1", H2hWinner::Home).goals(), None);
        assert_eq!(HeadToHead::new("", "3", H2hWinner::Home).goals(), None);
    }

    #[test]
    fn test_odds_trend_default() {
        let odds: OddsInfo = serde_json::from_str(
            r#"{"home_win":2.2,"draw":3.3,"away_win":2.8,"asian_handicap":"主队-0.5","over_under":"2.5"}"#,
        )
        .unwrap();
        assert_eq!(odds.odds_trend, "稳定");
    }
}
