//! Built-in match data for the demo and quick-predict endpoints.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::writer::models::{
    FormResult, H2hWinner, HeadToHead, HistoricalData, Insight, MatchInfo, OddsInfo, TeamInfo,
};

use crate::writer::models::FormResult::{Draw as D, Loss as L, Win as W};

fn team(
    name: &str,
    recent_form: &[FormResult],
    league_position: u32,
    home_away_record: &str,
    injuries: &[(&str, &str)],
    recent_performance: &str,
) -> TeamInfo {
    TeamInfo {
        name: name.to_string(),
        recent_form: recent_form.to_vec(),
        league_position,
        home_away_record: home_away_record.to_string(),
        key_players_status: injuries
            .iter()
            .map(|(p, s)| (p.to_string(), s.to_string()))
            .collect::<BTreeMap<_, _>>(),
        recent_performance: recent_performance.to_string(),
        goals_scored: None,
        goals_conceded: None,
        top_scorer: None,
        formation: "4-4-2".to_string(),
    }
}

// ─── 东京FC vs 京都不死鸟 ───

pub fn sample_match() -> MatchInfo {
    MatchInfo {
        home_team: team(
            "东京FC",
            &[W, W, D, L, W],
            3,
            "主场5胜2平1负",
            &[],
            "近5场3胜1平1负，状态良好",
        ),
        away_team: team(
            "京都不死鸟",
            &[L, D, W, W, L],
            7,
            "客场2胜2平4负",
            &[("山田太郎", "伤缺")],
            "近5场2胜1平2负，客场表现一般",
        ),
        league: "日职联".to_string(),
        match_time: "08/24 18:00".to_string(),
        venue: "东京体育场".to_string(),
        weather: None,
        referee: None,
        importance: "常规赛".to_string(),
    }
}

pub fn sample_odds() -> OddsInfo {
    OddsInfo {
        home_win: 2.28,
        draw: 3.40,
        away_win: 2.52,
        asian_handicap: "主队-0.5".to_string(),
        over_under: "2.5球".to_string(),
        odds_trend: "稳定".to_string(),
    }
}

pub fn sample_history() -> HistoricalData {
    HistoricalData {
        h2h_results: vec![
            HeadToHead::new("2024-03-15", "2-1", H2hWinner::Home),
            HeadToHead::new("2023-11-20", "1-1", H2hWinner::Draw),
            HeadToHead::new("2023-07-10", "0-2", H2hWinner::Away),
        ],
        home_team_home_record: "主场对京都3胜1平1负".to_string(),
        away_team_away_record: "客场对东京1胜1平3负".to_string(),
        last_meeting_details: None,
    }
}

pub const SAMPLE_CONFIDENCE: u8 = 85;

// ─── 浦项制铁 vs 全北现代 ───

pub fn demo_match() -> MatchInfo {
    MatchInfo {
        home_team: team(
            "浦项制铁",
            &[W, W, D, W, L],
            3,
            "主场7胜2平1负",
            &[],
            "近10场6胜2平2负，主场表现强势",
        ),
        away_team: team(
            "全北现代",
            &[L, W, W, D, L],
            5,
            "客场3胜3平4负",
            &[("金英权", "伤缺"), ("李东炅", "状态不佳")],
            "近10场4胜3平3负，客场表现起伏",
        ),
        league: "韩K联".to_string(),
        match_time: "08/24 18:00".to_string(),
        venue: "浦项钢铁体育场".to_string(),
        weather: Some("晴，温度26℃".to_string()),
        referee: None,
        importance: "常规赛".to_string(),
    }
}

pub fn demo_odds() -> OddsInfo {
    OddsInfo {
        over_under: "2.5/3".to_string(),
        ..sample_odds()
    }
}

pub fn demo_history() -> HistoricalData {
    HistoricalData {
        h2h_results: vec![
            HeadToHead::new("2024-05-15", "2-1", H2hWinner::Home),
            HeadToHead::new("2024-02-20", "1-1", H2hWinner::Draw),
            HeadToHead::new("2023-11-08", "3-2", H2hWinner::Home),
            HeadToHead::new("2023-08-15", "0-1", H2hWinner::Away),
            HeadToHead::new("2023-05-10", "2-2", H2hWinner::Draw),
        ],
        home_team_home_record: "主场对全北现代5胜2平1负".to_string(),
        away_team_away_record: "客场对浦项制铁1胜2平5负".to_string(),
        last_meeting_details: None,
    }
}

pub fn demo_insights() -> Vec<Insight> {
    vec![
        Insight::new("AI模型A", "主队胜，比分2-1"),
        Insight::new("AI模型B", "主队让球胜，大球"),
        Insight::new("专家系统", "主队不败，推荐让球"),
    ]
}

pub const DEMO_CONFIDENCE: u8 = 88;

// ─── quick predict ───

pub const QUICK_DEFAULT_VENUE: &str = "主队主场";
pub const QUICK_CONFIDENCE: u8 = 80;

/// Placeholder records for a prediction requested by team names only.
pub fn quick_match(home: &str, away: &str, league: &str, match_time: &str, venue: &str) -> MatchInfo {
    MatchInfo {
        home_team: team(home, &[W, W, D, L, W], 3, "主场表现优异", &[], "近期状态良好，主场优势明显"),
        away_team: team(away, &[L, D, W, D, L], 8, "客场表现一般", &[], "客场作战能力有待提升"),
        league: league.to_string(),
        match_time: match_time.to_string(),
        venue: venue.to_string(),
        weather: None,
        referee: None,
        importance: "常规赛".to_string(),
    }
}

pub fn quick_odds() -> OddsInfo {
    OddsInfo {
        home_win: 2.20,
        draw: 3.30,
        away_win: 2.80,
        asian_handicap: "主队-0.5".to_string(),
        over_under: "2.5".to_string(),
        odds_trend: "稳定".to_string(),
    }
}

pub fn quick_history(home: &str, away: &str) -> HistoricalData {
    HistoricalData {
        h2h_results: sample_history().h2h_results,
        home_team_home_record: format!("主场对{away}优势明显"),
        away_team_away_record: format!("客场对{home}表现一般"),
        last_meeting_details: None,
    }
}

// ─── leagues ───

#[derive(Debug, Clone, Serialize)]
pub struct League {
    pub id: u32,
    pub name: &'static str,
    pub country: &'static str,
}

pub const SUPPORTED_LEAGUES: &[League] = &[
    League { id: 39, name: "英超", country: "England" },
    League { id: 140, name: "西甲", country: "Spain" },
    League { id: 78, name: "德甲", country: "Germany" },
    League { id: 135, name: "意甲", country: "Italy" },
    League { id: 61, name: "法甲", country: "France" },
    League { id: 98, name: "日职联", country: "Japan" },
    League { id: 292, name: "韩K联", country: "South Korea" },
    League { id: 169, name: "中超", country: "China" },
];
