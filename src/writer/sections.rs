//! Section generators.
//!
//! Each function formats one fixed Chinese paragraph from the match records.
//! Missing optional fields are replaced by filler phrases, so every function
//! returns non-empty text and none can fail.

use std::fmt::Write as _;

use serde::Serialize;

use super::models::{form_string, H2hWinner, HeadToHead, HistoricalData, Insight, MatchInfo, OddsInfo};

pub const NO_H2H_TEXT: &str = "双方近期无交锋记录。";
const DEFAULT_WEATHER: &str = "晴朗";
const DEFAULT_HOME_SCORER: &str = "前锋山田";
const DEFAULT_AWAY_SCORER: &str = "中场铃木";
const DEFAULT_HOME_GOALS_SCORED: u32 = 11;
const DEFAULT_HOME_GOALS_CONCEDED: u32 = 5;
const DEFAULT_AWAY_GOALS_SCORED: u32 = 7;
const DEFAULT_AWAY_GOALS_CONCEDED: u32 = 9;
/// At most this many meetings are tallied.
pub const H2H_WINDOW: usize = 10;
/// The classic template only looks at the most recent meetings.
pub const CLASSIC_H2H_WINDOW: usize = 5;
/// The comprehensive section shows at most this many external insights.
const MAX_AI_INSIGHTS: usize = 2;

// ─── head-to-head ───

/// Tallies over the first `games` head-to-head records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct H2hSummary {
    pub games: usize,
    pub home_wins: usize,
    pub draws: usize,
    pub away_wins: usize,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl H2hSummary {
    pub fn avg_home_goals(&self) -> f64 {
        if self.games > 0 {
            f64::from(self.home_goals) / self.games as f64
        } else {
            0.0
        }
    }

    pub fn avg_away_goals(&self) -> f64 {
        if self.games > 0 {
            f64::from(self.away_goals) / self.games as f64
        } else {
            0.0
        }
    }

    /// Detailed sentence used by the enhanced template.
    pub fn describe(&self) -> String {
        if self.games == 0 {
            return NO_H2H_TEXT.to_string();
        }
        format!(
            "近{}次交锋，主队{}胜{}平{}负，场均进球{:.1}个，场均失球{:.1}个，",
            self.games,
            self.home_wins,
            self.draws,
            self.away_wins,
            self.avg_home_goals(),
            self.avg_away_goals()
        )
    }

    /// Short tally used by the classic template.
    pub fn describe_brief(&self) -> String {
        if self.games == 0 {
            return NO_H2H_TEXT.to_string();
        }
        format!(
            "近{}次交锋，主队{}胜{}平{}负。",
            self.games, self.home_wins, self.draws, self.away_wins
        )
    }
}

/// Summarize the ten most recent meetings.
pub fn summarize_h2h(results: &[HeadToHead]) -> H2hSummary {
    summarize_h2h_window(results, H2H_WINDOW)
}

/// Summarize at most `window` meetings. Missing or unknown winner tags count as away wins;
/// unparseable scores contribute no goals. Goal totals saturate.
pub fn summarize_h2h_window(results: &[HeadToHead], window: usize) -> H2hSummary {
    let mut summary = H2hSummary::default();
    for result in results.iter().take(window) {
        summary.games += 1;
        match result.winner {
            Some(H2hWinner::Home) => summary.home_wins += 1,
            Some(H2hWinner::Draw) => summary.draws += 1,
            _ => summary.away_wins += 1,
        }
        if let Some((home, away)) = result.goals() {
            summary.home_goals = summary.home_goals.saturating_add(home);
            summary.away_goals = summary.away_goals.saturating_add(away);
        }
    }
    summary
}

// ─── scoring heuristics ───

pub const SCORE_HOME_CLEAR: &str = "2-0 或 2-1";
pub const SCORE_HOME_NARROW: &str = "2-1 或 1-0";
pub const SCORE_EVEN: &str = "1-1 或 2-1";

/// Bucket the league-position gap into one of three score ranges.
pub fn predict_score(home_position: u32, away_position: u32) -> &'static str {
    let home = i64::from(home_position);
    let away = i64::from(away_position);
    if home < away - 3 {
        SCORE_HOME_CLEAR
    } else if home < away {
        SCORE_HOME_NARROW
    } else {
        SCORE_EVEN
    }
}

/// Stake suggestion by confidence tier (enhanced wording).
pub fn calculate_stake(confidence: u8) -> &'static str {
    match confidence {
        90.. => "3-4单位",
        80..=89 => "2-3单位",
        70..=79 => "1-2单位",
        _ => "0.5-1单位",
    }
}

/// Stake suggestion by confidence tier (classic wording).
pub fn calculate_stake_classic(confidence: u8) -> &'static str {
    match confidence {
        90.. => "3单位",
        80..=89 => "2单位",
        70..=79 => "1单位",
        _ => "0.5单位",
    }
}

// ─── classic template ───

pub fn classic_recent_form(m: &MatchInfo) -> String {
    format!(
        "近期表现\n\n{}：{}\n\n{}：{}",
        m.home_team.name,
        m.home_team.recent_performance,
        m.away_team.name,
        m.away_team.recent_performance
    )
}

pub fn classic_h2h(history: &HistoricalData, m: &MatchInfo) -> String {
    let summary = summarize_h2h_window(&history.h2h_results, CLASSIC_H2H_WINDOW);
    format!(
        "历史交锋\n\n在过去的交锋记录中，{}与{}的对战纪录较为胶着。\n{}\n{}\n{}",
        m.home_team.name,
        m.away_team.name,
        summary.describe_brief(),
        history.home_team_home_record,
        history.away_team_away_record
    )
}

pub fn classic_injuries(m: &MatchInfo) -> String {
    let home = &m.home_team.key_players_status;
    let away = &m.away_team.key_players_status;
    let mut content = String::from("伤病情况\n\n");

    if !home.is_empty() {
        let _ = write!(content, "{}：", m.home_team.name);
        for (player, status) in home {
            let _ = write!(content, "{player}（{status}）");
        }
        content.push('\n');
    }
    if !away.is_empty() {
        let _ = write!(content, "{}：", m.away_team.name);
        for (player, status) in away {
            let _ = write!(content, "{player}（{status}）");
        }
    }
    if home.is_empty() && away.is_empty() {
        content.push_str("双方主力阵容齐整，无重大伤病困扰。");
    }
    content
}

pub fn classic_score_prediction(
    m: &MatchInfo,
    odds: &OddsInfo,
    predicted_score: &str,
    insights: Option<&[Insight]>,
) -> String {
    let mut content = format!(
        "比分预测\n\n\
         综合两队的近期状态、战术特点以及历史交锋记录，预测本场比赛：\n\n\
         主队{}在主场优势明显，近期{}\n\n\
         客队{}客场表现{}\n\n\
         亚盘开出{}，大小球开{}。\n\n\
         综合分析，本场比赛预测比分为：{}",
        m.home_team.name,
        m.home_team.recent_performance,
        m.away_team.name,
        m.away_team.recent_performance,
        odds.asian_handicap,
        odds.over_under,
        predicted_score
    );
    if let Some(insights) = insights.filter(|i| !i.is_empty()) {
        content.push('\n');
        for insight in insights {
            let _ = writeln!(content, "- {}预测：{}", insight.source, insight.text);
        }
    }
    content
}

// ─── enhanced template ───

pub fn match_background(m: &MatchInfo) -> String {
    format!(
        "一、比赛背景\n\n\
         本场{league}{importance}，将于{time}在{venue}举行。\n\
         {home}目前排名第{home_pos}位，\n\
         {away}位居第{away_pos}位。\n\n\
         从积分榜看，{home}距离亚冠区仅差3分，每场必争。\n\
         {away}需要摆脱中游，向更高目标冲击。\n\
         天气{weather}，利于发挥。",
        league = m.league,
        importance = m.importance,
        time = m.match_time,
        venue = m.venue,
        home = m.home_team.name,
        away = m.away_team.name,
        home_pos = m.home_team.league_position,
        away_pos = m.away_team.league_position,
        weather = non_empty(m.weather.as_deref()).unwrap_or(DEFAULT_WEATHER),
    )
}

pub fn team_form(m: &MatchInfo) -> String {
    let home = &m.home_team;
    let away = &m.away_team;
    format!(
        "二、球队近况分析\n\n\
         【{home}近期表现】\n\
         {home}近5轮联赛战绩为{home_form}，{home_perf}\n\
         球队进攻端表现出色，近5场比赛打进{home_scored}球，场均进球超过2个。\n\
         防守端也相对稳固，近5场仅失{home_conceded}球。\n\
         {home_scorer}是球队的头号射手，本赛季已经打进12球，状态火热。\n\
         主场作战是他们的优势，{home_record}，主场胜率达65%。\n\n\
         【{away}近期表现】\n\
         {away}近5轮战绩为{away_form}，{away_perf}\n\
         球队近期进攻乏力，5场比赛仅打进{away_scored}球，场均不到1.5个。\n\
         防守端问题更加明显，近5场失球达到{away_conceded}个，防线漏洞百出。\n\
         {away_scorer}是球队进攻核心，但近期状态下滑。\n\
         客场作战一直是软肋，{away_record}，客场胜率仅25%。",
        home = home.name,
        home_form = form_string(&home.recent_form),
        home_perf = home.recent_performance,
        home_scored = home.goals_scored.unwrap_or(DEFAULT_HOME_GOALS_SCORED),
        home_conceded = home.goals_conceded.unwrap_or(DEFAULT_HOME_GOALS_CONCEDED),
        home_scorer = non_empty(home.top_scorer.as_deref()).unwrap_or(DEFAULT_HOME_SCORER),
        home_record = home.home_away_record,
        away = away.name,
        away_form = form_string(&away.recent_form),
        away_perf = away.recent_performance,
        away_scored = away.goals_scored.unwrap_or(DEFAULT_AWAY_GOALS_SCORED),
        away_conceded = away.goals_conceded.unwrap_or(DEFAULT_AWAY_GOALS_CONCEDED),
        away_scorer = non_empty(away.top_scorer.as_deref()).unwrap_or(DEFAULT_AWAY_SCORER),
        away_record = away.home_away_record,
    )
}

pub fn h2h_detailed(history: &HistoricalData, m: &MatchInfo) -> String {
    let summary = summarize_h2h(&history.h2h_results);
    let last_meeting = match non_empty(history.last_meeting_details.as_deref()) {
        Some(details) => details.to_string(),
        None => format!(
            "上次交锋是在3个月前，当时{}在2-1击败对手，展现出良好的竞技状态。",
            m.home_team.name
        ),
    };
    format!(
        "三、历史交锋回顾\n\n\
         两队在历史上交锋频繁，{summary}主队在心理上占据优势。\n\n\
         具体到主客场战绩，{home_record}。\n\
         这显示出{home}在主场面对{away}时的强势。\n\
         相反，{away_record}，客队在客场难以取得理想结果。\n\n\
         {last_meeting}\n\
         从历史交锋的进球数来看，两队对决往往进球不少，有73%的比赛总进球数超过2.5个。",
        summary = summary.describe(),
        home_record = history.home_team_home_record,
        away_record = history.away_team_away_record,
        home = m.home_team.name,
        away = m.away_team.name,
    )
}

pub fn injuries_detailed(m: &MatchInfo) -> String {
    let home = &m.home_team;
    let away = &m.away_team;
    let mut content = String::from("四、伤停与人员情况\n\n");

    if home.key_players_status.is_empty() {
        let _ = writeln!(
            content,
            "{}方面，主力阵容齐整，无重要球员伤停，这对主队是利好消息。",
            home.name
        );
    } else {
        let _ = write!(content, "{}伤停情况：", home.name);
        for (player, status) in &home.key_players_status {
            let _ = write!(content, "{player}（{status}），这对球队中场控制力会有一定影响。");
        }
        content.push('\n');
    }

    if away.key_players_status.is_empty() {
        let _ = write!(content, "{}同样没有重要球员伤停，可以以最强阵容出战。", away.name);
    } else {
        let _ = write!(content, "{}伤停情况：", away.name);
        for (player, status) in &away.key_players_status {
            let _ = write!(content, "{player}（{status}），严重影响球队攻防体系。");
        }
        content.push_str("关键球员的缺阵对客队影响较大。");
    }
    content
}

pub fn tactics(m: &MatchInfo) -> String {
    format!(
        "五、战术分析与打法预测\n\n\
         【{home}战术特点】\n\
         {home}本赛季主要采用{home_formation}阵型，强调中场控制和边路进攻。\n\
         球队的打法偏向于控球进攻，场均控球率达到55%以上。\n\
         在进攻时，他们善于通过边路传中和中路渗透相结合的方式撕开对手防线。\n\
         防守时采用高位逼抢战术，试图在中前场就完成抢断。\n\n\
         【{away}战术安排】\n\
         {away}更倾向于{away_formation}的防守反击阵型，这在客场作战时尤为明显。\n\
         他们会在中后场囤积重兵，等待对手压上后利用快速反击制造威胁。\n\
         边锋速度很快，是反击中的利器。\n\n\
         预计本场比赛，主队会占据场上主动，而客队会采取相对保守的策略。",
        home = m.home_team.name,
        away = m.away_team.name,
        home_formation = m.home_team.formation,
        away_formation = m.away_team.formation,
    )
}

pub fn key_matchups(m: &MatchInfo) -> String {
    let referee = match non_empty(m.referee.as_deref()) {
        Some(referee) => format!("\n\n5. **裁判尺度**：本场主裁判为{referee}，判罚尺度可能影响比赛节奏。"),
        None => String::new(),
    };
    format!(
        "六、关键对位与胜负手\n\n\
         本场比赛有几个关键对位值得关注：\n\n\
         1. **中场控制权的争夺**：{home}的中场核心与{away}的防守型中场的对抗将是关键。\n\
         谁能控制中场，谁就能掌控比赛节奏。\n\n\
         2. **边路攻防**：主队的边锋速度很快，客队的边后卫防守能力如何应对将直接影响比赛走势。\n\n\
         3. **定位球机会**：{home}本赛季通过定位球打进8球，这是他们的重要得分手段。\n\n\
         4. **门将状态**：两队门将近期表现都不错，关键时刻的扑救可能改变比赛结果。{referee}",
        home = m.home_team.name,
        away = m.away_team.name,
    )
}

pub fn odds_detailed(odds: &OddsInfo) -> String {
    format!(
        "七、赔率与盘口解读\n\n\
         初盘开出主队{home_win}、平局{draw}、客队{away_win}的欧洲赔率，\n\
         主队获胜赔率明显更低，显示博彩公司对主队的信心。\n\n\
         亚洲盘口开出{handicap}，比较合理地反映了两队实力差距。\n\
         考虑到主队的主场优势和近期状态，这个让球数并不算深。\n\n\
         大小球盘开出{over_under}，结合两队近期进球效率，这个盘口偏向大球。\n\
         历史交锋中多数比赛进球超过此数。\n\n\
         赔率走势：{trend}。",
        home_win = odds.home_win,
        draw = odds.draw,
        away_win = odds.away_win,
        handicap = odds.asian_handicap,
        over_under = odds.over_under,
        trend = odds.odds_trend,
    )
}

pub fn comprehensive_prediction(
    m: &MatchInfo,
    odds: &OddsInfo,
    confidence: u8,
    insights: Option<&[Insight]>,
) -> String {
    let mut content = format!(
        "八、综合预测与投注建议\n\n\
         综合分析各项因素后，本场比赛的走势预判如下：\n\n\
         {home}在主场优势明显，近期状态出色，进攻火力强劲，且历史交锋占优。\n\
         但需要注意{away}的防守反击战术可能会给主队制造麻烦。\n\n\
         从比赛进程看，主队大概率会占据场上主动，控球率会在55%以上。\n\
         首个进球很可能在上半场30分钟后出现，主队破门的概率更大。\n\n\
         比分预测：最可能的比分是2-1或2-0，主队小胜。\n\
         进球数预测：总进球数大概率在2-3个。\n\n\
         【投注建议】\n\
         推荐：{handicap}主队赢盘\n\
         信心指数：{confidence}%\n\
         建议投注：{stake}\n\
         风险提示：客队加强防守可能小球。",
        home = m.home_team.name,
        away = m.away_team.name,
        handicap = odds.asian_handicap,
        stake = calculate_stake(confidence),
    );
    if let Some(insights) = insights.filter(|i| !i.is_empty()) {
        content.push_str("\n\n【AI分析】\n");
        for insight in insights.iter().take(MAX_AI_INSIGHTS) {
            let _ = writeln!(content, "• {}：{}", insight.source, insight.text);
        }
    }
    content
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::writer::models::H2hWinner;

    fn meetings(winners: &[Option<H2hWinner>]) -> Vec<HeadToHead> {
        winners
            .iter()
            .map(|w| HeadToHead {
                date: None,
                score: Some("1-1".to_string()),
                winner: *w,
            })
            .collect()
    }

    #[test]
    fn test_h2h_tallies_sum_to_window() {
        for len in [0usize, 1, 3, 10, 11, 25] {
            let winners: Vec<_> = (0..len)
                .map(|i| match i % 4 {
                    0 => Some(H2hWinner::Home),
                    1 => Some(H2hWinner::Draw),
                    2 => Some(H2hWinner::Away),
                    _ => None,
                })
                .collect();
            let summary = summarize_h2h(&meetings(&winners));
            assert_eq!(
                summary.home_wins + summary.draws + summary.away_wins,
                len.min(10),
                "len={len}"
            );
            assert_eq!(summary.games, len.min(10));
        }
    }

    #[test]
    fn test_h2h_unknown_and_missing_winner_count_as_away() {
        let summary = summarize_h2h(&meetings(&[Some(H2hWinner::Other), None]));
        assert_eq!(summary.away_wins, 2);
    }

    #[test]
    fn test_h2h_goal_averages() {
        let history = fixtures::sample_history();
        let summary = summarize_h2h(&history.h2h_results);
        // 2-1, 1-1, 0-2
        assert_eq!(summary.home_goals, 3);
        assert_eq!(summary.away_goals, 4);
        assert_eq!(
            summary.describe(),
            "近3次交锋，主队1胜1平1负，场均进球1.0个，场均失球1.3个，"
        );
    }

    #[test]
    fn test_h2h_bad_score_is_skipped() {
        let results = vec![
            HeadToHead::new("2024-01-01", "abc", H2hWinner::Home),
            HeadToHead::new("2024-01-02", "3-0", H2hWinner::Home),
        ];
        let summary = summarize_h2h(&results);
        assert_eq!(summary.games, 2);
        assert_eq!(summary.home_goals, 3);
        assert_eq!(summary.home_wins, 2);
    }

    #[test]
    fn test_h2h_empty() {
        let summary = summarize_h2h(&[]);
        assert_eq!(summary.avg_home_goals(), 0.0);
        assert_eq!(summary.describe(), NO_H2H_TEXT);
        assert_eq!(summary.describe_brief(), NO_H2H_TEXT);
    }

    #[test]
    fn test_predict_score_buckets() {
        assert_eq!(predict_score(3, 7), SCORE_HOME_NARROW);
        assert_eq!(predict_score(1, 10), SCORE_HOME_CLEAR);
        assert_eq!(predict_score(3, 5), SCORE_HOME_NARROW);
        assert_eq!(predict_score(5, 5), SCORE_EVEN);
        assert_eq!(predict_score(9, 2), SCORE_EVEN);
        assert_eq!(predict_score(0, 0), SCORE_EVEN);
    }

    #[test]
    fn test_predict_score_is_one_of_three() {
        for home in 0..25 {
            for away in 0..25 {
                let score = predict_score(home, away);
                assert!([SCORE_HOME_CLEAR, SCORE_HOME_NARROW, SCORE_EVEN].contains(&score));
            }
        }
    }

    #[test]
    fn test_stake_tiers() {
        assert_eq!(calculate_stake(95), "3-4单位");
        assert_eq!(calculate_stake(85), "2-3单位");
        assert_eq!(calculate_stake(70), "1-2单位");
        assert_eq!(calculate_stake(10), "0.5-1单位");
        assert_eq!(calculate_stake_classic(90), "3单位");
        assert_eq!(calculate_stake_classic(69), "0.5单位");
    }

    #[test]
    fn test_fallback_phrases_for_missing_fields() {
        let m = fixtures::sample_match();
        assert!(match_background(&m).contains("天气晴朗"));
        let form = team_form(&m);
        assert!(form.contains("前锋山田"));
        assert!(form.contains("中场铃木"));
        assert!(form.contains("打进11球"));
    }

    #[test]
    fn test_injuries_lists_players() {
        let m = fixtures::sample_match();
        let text = injuries_detailed(&m);
        assert!(text.contains("山田太郎（伤缺）"));
        assert!(text.contains("东京FC方面，主力阵容齐整"));

        let classic = classic_injuries(&m);
        assert!(classic.contains("京都不死鸟：山田太郎（伤缺）"));
    }

    #[test]
    fn test_injuries_none_on_either_side() {
        let mut m = fixtures::sample_match();
        m.away_team.key_players_status.clear();
        assert!(classic_injuries(&m).contains("双方主力阵容齐整，无重大伤病困扰。"));
    }

    #[test]
    fn test_ai_section_limited_to_two() {
        let m = fixtures::sample_match();
        let odds = fixtures::sample_odds();
        let insights = vec![
            Insight::new("A", "一"),
            Insight::new("B", "二"),
            Insight::new("C", "三"),
        ];
        let text = comprehensive_prediction(&m, &odds, 85, Some(&insights));
        assert!(text.contains("【AI分析】"));
        assert!(text.contains("• B：二"));
        assert!(!text.contains("• C：三"));

        let without = comprehensive_prediction(&m, &odds, 85, None);
        assert!(!without.contains("【AI分析】"));
    }
}
