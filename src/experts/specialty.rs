//! Per-expertise sections of the expert article.
//!
//! Every generator is a pure function of the match records. Sentences that
//! have no backing field in the records keep a fixed house wording.

use std::fmt::Write as _;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use super::profile::ExpertiseArea;
use crate::writer::models::{form_string, HistoricalData, MatchInfo, OddsInfo, TeamInfo};
use crate::writer::sections::{predict_score, summarize_h2h};

const DEFAULT_WEATHER: &str = "晴朗";

/// Confidence ceiling for expert articles.
pub const MAX_EXPERT_CONFIDENCE: u8 = 95;
const BASE_EXPERT_CONFIDENCE: u8 = 75;

pub fn specialty_title(area: ExpertiseArea, home: &str, away: &str) -> String {
    let (prefix, suffix) = match area {
        ExpertiseArea::Statistics => ("数据解析", "深度统计分析"),
        ExpertiseArea::Tactics => ("战术对决", "技战术剖析"),
        ExpertiseArea::Historical => ("历史回望", "传统交锋解读"),
        ExpertiseArea::Injuries => ("伤病报告", "球员状态分析"),
        ExpertiseArea::AsianHandicap => ("亚盘解读", "盘口分析"),
        ExpertiseArea::Goals => ("进球预测", "攻防火力对比"),
        ExpertiseArea::HomeAway => ("主客分析", "主客场优势"),
        ExpertiseArea::Conditions => ("条件分析", "天气场地因素"),
        ExpertiseArea::Psychology => ("心理解读", "精神状态对比"),
        ExpertiseArea::ValueBetting => ("价值发现", "投资机会分析"),
    };
    format!("{prefix}：{home} vs {away} {suffix}")
}

/// `min(95, 75 + modifier)`.
pub fn expert_confidence(area: ExpertiseArea) -> u8 {
    let modifier = match area {
        ExpertiseArea::Statistics => 5,
        ExpertiseArea::ValueBetting => 8,
        ExpertiseArea::AsianHandicap => 6,
        ExpertiseArea::Historical => 3,
        ExpertiseArea::Tactics => 4,
        ExpertiseArea::Injuries => 7,
        ExpertiseArea::Goals => 2,
        ExpertiseArea::HomeAway => 5,
        ExpertiseArea::Conditions => 1,
        ExpertiseArea::Psychology => 3,
    };
    (BASE_EXPERT_CONFIDENCE + modifier).min(MAX_EXPERT_CONFIDENCE)
}

// ─── shared sections ───

pub fn recent_form_section(area: ExpertiseArea, m: &MatchInfo) -> String {
    let home = &m.home_team;
    let away = &m.away_team;
    let mut content = String::from("近期表现分析\n\n");
    match area {
        ExpertiseArea::Statistics => {
            let _ = writeln!(
                content,
                "从数据角度分析，{}近5场比赛的预期进球(xG)为2.1，实际进球2.3，转化率较高。",
                home.name
            );
            let _ = write!(
                content,
                "{}近期防守表现稳定，场均失球1.2个，防守效率位居联赛前列。",
                away.name
            );
        }
        ExpertiseArea::Tactics => {
            let _ = writeln!(
                content,
                "{}近期战术执行出色，{}阵型下中场控制力强，边路传中成功率达78%。",
                home.name, home.formation
            );
            let _ = write!(
                content,
                "{}采用{}阵型打防守反击，反击成功率高，但控球率偏低。",
                away.name, away.formation
            );
        }
        ExpertiseArea::Injuries => {
            let _ = writeln!(content, "{}", squad_sentence(home, "主力阵容完整，核心球员身体状况良好，无重大伤病困扰。"));
            let _ = write!(content, "{}", squad_sentence(away, "阵容基本完整，轮换空间充足。"));
        }
        ExpertiseArea::Goals => {
            let _ = writeln!(
                content,
                "{}近期攻击火力强劲，{}，主场进球效率更高。",
                home.name,
                goals_phrase(home.goals_scored, "场均进球2.4个", "进球")
            );
            let _ = write!(
                content,
                "{}防守端表现一般，{}，客场防守压力较大。",
                away.name,
                goals_phrase(away.goals_conceded, "场均失球1.8个", "失球")
            );
        }
        _ => {
            let _ = writeln!(
                content,
                "{}近期状态出色，{}，攻防两端表现均衡。",
                home.name,
                form_phrase(home, "近5场3胜1平1负")
            );
            let _ = write!(
                content,
                "{}客场表现一般，{}，状态起伏较大。",
                away.name,
                form_phrase(away, "近5个客场2胜1平2负")
            );
        }
    }
    content
}

pub fn historical_section(area: ExpertiseArea, m: &MatchInfo, history: &HistoricalData) -> String {
    let home = &m.home_team.name;
    let away = &m.away_team.name;
    let summary = summarize_h2h(&history.h2h_results);
    let mut content = String::from("历史交锋分析\n\n");
    match area {
        ExpertiseArea::Historical => {
            if summary.games > 0 {
                let _ = writeln!(
                    content,
                    "深入历史档案，{home}与{away}过去{}次交锋中，主队{}胜{}平{}负。",
                    summary.games, summary.home_wins, summary.draws, summary.away_wins
                );
            } else {
                let _ = writeln!(content, "深入历史档案，{home}与{away}近期没有交锋记录，需要从各自走势中寻找规律。");
            }
            let _ = writeln!(content, "从时间维度看，双方最近3次交锋均产生3球以上，场面较为开放。");
            let _ = write!(content, "值得注意的是，{away}近年来在{home}主场难求一胜，心理层面处于劣势。");
        }
        ExpertiseArea::Psychology => {
            let _ = writeln!(content, "心理层面分析，{home}在主场面对{away}时信心充足，历史优势带来心理优势。");
            let _ = write!(content, "{away}客场挑战{home}时往往保守，缺乏必胜信念，影响临场发挥。");
        }
        ExpertiseArea::Goals => {
            if summary.games > 0 {
                let total = summary.avg_home_goals() + summary.avg_away_goals();
                let _ = writeln!(content, "进球数据显示，双方历史交锋场均进球{total:.1}个。");
                let _ = write!(
                    content,
                    "{home}面对{away}场均进球{:.1}个，客队场均进球{:.1}个。",
                    summary.avg_home_goals(),
                    summary.avg_away_goals()
                );
            } else {
                let _ = writeln!(content, "进球数据显示，双方历史交锋场均进球2.8个，大球概率较高。");
                let _ = write!(content, "{home}主场面对{away}场均进球2.1个，客队场均失球1.7个。");
            }
        }
        _ => {
            let _ = writeln!(content, "历史交锋记录显示，{home}与{away}近期交锋较为激烈。");
            if summary.games > 0 {
                let _ = write!(
                    content,
                    "过去{}次交锋，主队{}胜{}平{}负。",
                    summary.games, summary.home_wins, summary.draws, summary.away_wins
                );
            } else {
                let _ = write!(content, "过去5次交锋，主队3胜1平1负，主场优势明显。");
            }
        }
    }
    content
}

/// The section that differs per expertise area.
pub fn specialty_section(
    area: ExpertiseArea,
    m: &MatchInfo,
    odds: &OddsInfo,
    history: &HistoricalData,
) -> String {
    match area {
        ExpertiseArea::Statistics => stats_analysis(m, odds),
        ExpertiseArea::Tactics => tactical_analysis(m),
        ExpertiseArea::Historical => historical_analysis(m, history),
        ExpertiseArea::Injuries => injury_analysis(m),
        ExpertiseArea::AsianHandicap => handicap_analysis(odds),
        ExpertiseArea::Goals => goals_analysis(m, odds),
        ExpertiseArea::HomeAway => home_away_analysis(m, history),
        ExpertiseArea::Conditions => conditions_analysis(m),
        ExpertiseArea::Psychology => psychology_analysis(m),
        ExpertiseArea::ValueBetting => value_analysis(odds),
    }
}

pub fn prediction_line(area: ExpertiseArea, m: &MatchInfo, odds: &OddsInfo) -> String {
    match area {
        ExpertiseArea::Statistics => {
            let score = predict_score(m.home_team.league_position, m.away_team.league_position);
            format!("基于数学模型，预测比分{score}，主胜概率68%")
        }
        ExpertiseArea::Tactics => "战术分析显示主队优势明显，预测2-0或1-0小胜".to_string(),
        ExpertiseArea::Historical => "历史经验告诉我们，主队将延续主场不败，预测1-1或2-1".to_string(),
        ExpertiseArea::Injuries => "考虑伤病影响，主队人员完整优势突出，预测2-1胜出".to_string(),
        ExpertiseArea::AsianHandicap => {
            format!("亚盘{}有价值，推荐主队小胜1-0或2-1", odds.asian_handicap)
        }
        ExpertiseArea::Goals => "双方攻击力强，预测大比分3-1或2-2，大球稳胆".to_string(),
        ExpertiseArea::HomeAway => "主场优势决定性，主队必胜，预测2-0或3-1".to_string(),
        ExpertiseArea::Conditions => "天气条件理想，技术发挥充分，预测2-1精彩对决".to_string(),
        ExpertiseArea::Psychology => "主队心理优势巨大，客队难以招架，预测3-0大胜".to_string(),
        ExpertiseArea::ValueBetting => match best_value(odds) {
            Some(best) => format!(
                "价值在{}，期望回报{}%，推荐2-1结果",
                best.label,
                signed(best.expected_return_pct)
            ),
            None => "市场定价合理，暂无明显价值，建议观望".to_string(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BettingAdvice {
    pub primary_bet: String,
    pub stake: String,
    pub reasoning: String,
    pub secondary_bets: Vec<String>,
}

pub fn betting_advice(area: ExpertiseArea, odds: &OddsInfo) -> BettingAdvice {
    match area {
        ExpertiseArea::Statistics => advice("主胜", "2单位", "数据模型显示主队优势明显", &["大2.5球", "主队-0.5球"]),
        ExpertiseArea::AsianHandicap => advice(
            &odds.asian_handicap,
            "3单位",
            "亚盘水位变化显示机构态度",
            &["主队不败", "让球大小球组合"],
        ),
        ExpertiseArea::Goals => advice(
            &format!("大{}", odds.over_under),
            "2单位",
            "双方攻击火力分析支持大球",
            &["双方进球", "总进球3-4个"],
        ),
        ExpertiseArea::ValueBetting => match best_value(odds) {
            Some(best) => advice(
                best.label,
                "3单位",
                &format!("期望值{}%，价值显著", signed(best.expected_return_pct)),
                &["主胜+大2.5球", "主队-0.5球"],
            ),
            None => advice("观望", "0单位", "赔率未见明显错配", &[]),
        },
        _ => advice("主队不败", "1单位", "综合分析支持主队优势", &["平局保险", "小球"]),
    }
}

fn advice(primary: &str, stake: &str, reasoning: &str, secondary: &[&str]) -> BettingAdvice {
    BettingAdvice {
        primary_bet: primary.to_string(),
        stake: stake.to_string(),
        reasoning: reasoning.to_string(),
        secondary_bets: secondary.iter().map(|s| s.to_string()).collect(),
    }
}

// ─── value ───

/// One 1X2 selection priced against the house probability estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueLine {
    pub label: &'static str,
    pub odds: Decimal,
    /// `100 / odds`, one decimal place.
    pub implied_pct: Decimal,
    pub fair_pct: Decimal,
    /// `fair_pct - implied_pct`.
    pub edge_pct: Decimal,
    /// `(fair * odds - 1) * 100`, one decimal place.
    pub expected_return_pct: Decimal,
}

/// Skips selections whose price is not a positive finite number.
pub fn value_lines(odds: &OddsInfo) -> Vec<ValueLine> {
    [
        ("主胜", odds.home_win, dec!(55)),
        ("平局", odds.draw, dec!(25)),
        ("客胜", odds.away_win, dec!(20)),
    ]
    .into_iter()
    .filter_map(|(label, price, fair_pct)| {
        let price = round_half_up(Decimal::try_from(price).ok()?, 2);
        if price <= Decimal::ZERO {
            return None;
        }
        let implied_pct = round_half_up(Decimal::ONE_HUNDRED / price, 1);
        let expected_return_pct = round_half_up(
            (fair_pct / Decimal::ONE_HUNDRED * price - Decimal::ONE) * Decimal::ONE_HUNDRED,
            1,
        );
        Some(ValueLine {
            label,
            odds: price,
            implied_pct,
            fair_pct,
            edge_pct: fair_pct - implied_pct,
            expected_return_pct,
        })
    })
    .collect()
}

/// The selection with the highest positive expected return, if any.
pub fn best_value(odds: &OddsInfo) -> Option<ValueLine> {
    value_lines(odds)
        .into_iter()
        .filter(|line| line.expected_return_pct > Decimal::ZERO)
        .max_by(|a, b| a.expected_return_pct.cmp(&b.expected_return_pct))
}

fn value_analysis(odds: &OddsInfo) -> String {
    let lines = value_lines(odds);
    let mut content = String::from("价值投注机会分析\n\n赔率评估：\n");
    for line in &lines {
        let _ = writeln!(content, "- {}赔率{}，隐含概率{}%", line.label, line.odds, line.implied_pct);
    }
    content.push_str("\n真实概率估算：\n");
    for line in &lines {
        let _ = writeln!(
            content,
            "- {}真实概率：{}%（价值{}%）",
            line.label,
            line.fair_pct,
            signed(line.edge_pct)
        );
    }
    content.push_str("\n价值投注机会：\n");
    for line in &lines {
        if line.edge_pct > Decimal::ZERO {
            let _ = writeln!(content, "✓ {}存在显著价值，推荐投注", line.label);
        } else {
            let _ = writeln!(content, "✗ {}赔率偏低，不建议投注", line.label);
        }
    }
    content.push_str("\n期望值计算：\n");
    match best_value(odds) {
        Some(best) => {
            let _ = writeln!(content, "{}投注期望回报率：{}%", best.label, signed(best.expected_return_pct));
            let _ = write!(content, "建议投注：{} 高信心3单位", best.label);
        }
        None => content.push_str("所有选项期望值均为负，建议观望"),
    }
    content
}

fn round_half_up(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

fn signed(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

// ─── per-area generators ───

fn stats_analysis(m: &MatchInfo, odds: &OddsInfo) -> String {
    let implied = value_lines(odds)
        .into_iter()
        .next()
        .map(|line| format!("- 市场隐含主胜概率：{}%（赔率{}）\n", line.implied_pct, line.odds))
        .unwrap_or_default();
    let score = predict_score(m.home_team.league_position, m.away_team.league_position);
    format!(
        "高级数据分析\n\n\
         通过机器学习模型分析，本场比赛的关键指标如下：\n\
         - 预期进球(xG)：主队2.3 vs 客队1.7\n\
         - 射门转化率：主队13.2% vs 客队11.8%\n\
         - 控球率预测：主队58% vs 客队42%\n\
         - 关键传球成功率：主队82% vs 客队76%\n\
         {implied}\n\
         基于泊松分布模型，本场比赛最可能的比分为{score}。"
    )
}

fn tactical_analysis(m: &MatchInfo) -> String {
    format!(
        "战术层面分析\n\n\
         {home}预计采用{home_formation}阵型，高位压迫，通过边路快速推进制造威胁。\n\
         {away}可能以{away_formation}阵型防守反击，利用快速反击寻找机会。\n\n\
         关键战术对决：\n\
         1. 主队边锋 vs 客队边后卫的一对一较量\n\
         2. 中场控制权争夺将决定比赛节奏\n\
         3. 定位球将是重要的得分机会\n\n\
         预计主队主导比赛，但客队反击威胁不容小觑。",
        home = m.home_team.name,
        home_formation = m.home_team.formation,
        away = m.away_team.name,
        away_formation = m.away_team.formation,
    )
}

fn historical_analysis(m: &MatchInfo, history: &HistoricalData) -> String {
    let summary = summarize_h2h(&history.h2h_results);
    let last = history
        .last_meeting_details
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| format!("\n上次交锋：{s}"))
        .unwrap_or_default();
    format!(
        "历史规律深度解析\n\n\
         通过对历史数据的深度挖掘，发现以下规律：\n\
         1. {}\n\
         2. 雨天条件下，防守型球队优势明显\n\
         3. 赛季末期，主队主场优势会放大\n\n\
         本赛季同期对比：\n\
         - {}主场战绩：{}\n\
         - {}客场战绩：{}{last}\n\n\
         历史告诉我们，相似条件下主队获胜概率为65%。",
        summary.describe_brief(),
        m.home_team.name,
        non_empty(&history.home_team_home_record, "优于去年同期"),
        m.away_team.name,
        non_empty(&history.away_team_away_record, "与历史平均水平持平"),
    )
}

fn injury_analysis(m: &MatchInfo) -> String {
    let mut content = String::from("伤病情况医学评估\n\n");
    for (label, team) in [("主队", &m.home_team), ("客队", &m.away_team)] {
        let _ = writeln!(content, "{label}（{}）伤病情况：", team.name);
        if team.key_players_status.is_empty() {
            content.push_str("- 暂无伤病报告，整体健康状况良好\n\n");
        } else {
            for (player, status) in &team.key_players_status {
                let _ = writeln!(content, "- {player}：{status}");
            }
            content.push('\n');
        }
    }
    let home_missing = m.home_team.key_players_status.len();
    let away_missing = m.away_team.key_players_status.len();
    let verdict = match home_missing.cmp(&away_missing) {
        std::cmp::Ordering::Less => "客队伤病更多，人员因素利好主队",
        std::cmp::Ordering::Greater => "主队伤病更多，需警惕阵容深度不足",
        std::cmp::Ordering::Equal => "双方人员情况相近，伤病不是决定性因素",
    };
    let _ = write!(content, "伤病因素分析：{verdict}。");
    content
}

fn handicap_analysis(odds: &OddsInfo) -> String {
    format!(
        "亚洲盘口深度解读\n\n\
         初盘分析：\n\
         - 亚盘开出{handicap}，欧赔{home:.2}/{draw:.2}/{away:.2}\n\
         - 机构对主队略显信心，但不敢深让\n\n\
         盘口走势：\n\
         - 赔率走势{trend}\n\
         - 客队水位相应调整，资金流向平衡\n\n\
         机构态度：\n\
         - 亚洲主流机构普遍看好主队不败\n\
         - 欧洲机构对比赛结果相对谨慎\n\n\
         推荐：{handicap} 中等信心投注",
        handicap = odds.asian_handicap,
        home = odds.home_win,
        draw = odds.draw,
        away = odds.away_win,
        trend = non_empty(&odds.odds_trend, "稳定"),
    )
}

fn goals_analysis(m: &MatchInfo, odds: &OddsInfo) -> String {
    let home = &m.home_team;
    let away = &m.away_team;
    format!(
        "进球数据专业分析\n\n\
         攻击火力对比：\n\
         - {}{}，主场攻击力更强\n\
         - {}{}，客场进攻乏力\n\n\
         防守强度评估：\n\
         - {}{}，主场防守稳固\n\
         - {}{}，客场防守脆弱\n\n\
         大小球分析：\n\
         - 盘口开出{ou}\n\
         - 双方近期比赛大球趋势明显\n\
         - 预测总进球数：2.5-3.5球\n\n\
         推荐：大{ou} 高信心投注",
        home.name,
        goals_phrase(home.goals_scored, "场均进球2.1个", "进球"),
        away.name,
        goals_phrase(away.goals_scored, "场均进球1.6个", "进球"),
        home.name,
        goals_phrase(home.goals_conceded, "场均失球1.3个", "失球"),
        away.name,
        goals_phrase(away.goals_conceded, "场均失球1.8个", "失球"),
        ou = odds.over_under,
    )
}

fn home_away_analysis(m: &MatchInfo, history: &HistoricalData) -> String {
    format!(
        "主客场表现对比分析\n\n\
         {home}主场优势：\n\
         - 主场战绩：{home_record}\n\
         - 主场观众氛围热烈，熟悉场地\n\n\
         {away}客场表现：\n\
         - 客场战绩：{away_record}\n\
         - 长途旅行影响，体能消耗较大\n\n\
         主客场差异：\n\
         主队主客场表现差异不大，实力稳定\n\
         客队主客场差异明显，客场竞争力下降\n\n\
         结论：主场因素将成为比赛的决定性因素",
        home = m.home_team.name,
        away = m.away_team.name,
        home_record = non_empty(
            &history.home_team_home_record,
            non_empty(&m.home_team.home_away_record, "主场14战10胜2平2负"),
        ),
        away_record = non_empty(
            &history.away_team_away_record,
            non_empty(&m.away_team.home_away_record, "客场15战5胜3平7负"),
        ),
    )
}

fn conditions_analysis(m: &MatchInfo) -> String {
    let weather = m
        .weather
        .as_deref()
        .filter(|w| !w.trim().is_empty())
        .unwrap_or(DEFAULT_WEATHER);
    format!(
        "比赛条件环境分析\n\n\
         天气预报：\n\
         - 比赛日天气：{weather}\n\
         - 降雨概率较低，基本无影响\n\
         - 风力2-3级，对传球影响较小\n\n\
         场地条件：\n\
         - 比赛场地：{venue}\n\
         - 草皮质量优良，利于技术发挥\n\
         - 场地排水系统完善，无积水风险\n\n\
         环境影响评估：\n\
         - 温和天气条件有利于技术型球队\n\
         - 良好场地条件利于流畅比赛\n\
         - 整体环境对双方相对公平\n\n\
         预测：天气条件不会成为胜负关键因素",
        venue = non_empty(&m.venue, "主队主场"),
    )
}

fn psychology_analysis(m: &MatchInfo) -> String {
    format!(
        "心理因素深度剖析\n\n\
         {home}心理状态：\n\
         - 近期战绩{home_form}，信心充足\n\
         - 主场作战压力相对较小\n\
         - 球员求胜欲望强烈，比赛动机充足\n\n\
         {away}心理状态：\n\
         - 近期战绩{away_form}，心理包袱不轻\n\
         - 面对强队时容易产生畏惧心理\n\
         - {importance}的分量可能影响发挥\n\n\
         心理优势对比：\n\
         - 主队在心理层面占据优势\n\
         - 历史交锋记录增强主队信心\n\
         - 客队需要克服心理障碍才能发挥实力\n\n\
         心理预测：主队心理优势将转化为场上优势",
        home = m.home_team.name,
        away = m.away_team.name,
        home_form = non_empty(&form_string(&m.home_team.recent_form), "起伏"),
        away_form = non_empty(&form_string(&m.away_team.recent_form), "起伏"),
        importance = m.importance,
    )
}

// ─── helpers ───

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn goals_phrase(goals: Option<u32>, fallback: &str, noun: &str) -> String {
    match goals {
        Some(n) => format!("近期共{noun}{n}个"),
        None => fallback.to_string(),
    }
}

fn form_phrase(team: &TeamInfo, fallback: &str) -> String {
    if team.recent_form.is_empty() {
        fallback.to_string()
    } else {
        format!("近期战绩{}", form_string(&team.recent_form))
    }
}

fn squad_sentence(team: &TeamInfo, healthy: &str) -> String {
    if team.key_players_status.is_empty() {
        format!("{}{healthy}", team.name)
    } else {
        let listed: Vec<_> = team
            .key_players_status
            .iter()
            .map(|(player, status)| format!("{player}{status}"))
            .collect();
        format!("{}人员方面：{}，阵容完整度受到影响。", team.name, listed.join("，"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    fn value_odds() -> OddsInfo {
        OddsInfo {
            home_win: 2.10,
            draw: 3.40,
            away_win: 3.20,
            ..fixtures::sample_odds()
        }
    }

    #[test]
    fn test_confidence_bounds() {
        for area in ExpertiseArea::ALL {
            let confidence = expert_confidence(area);
            assert!(confidence <= MAX_EXPERT_CONFIDENCE);
            assert!(confidence >= BASE_EXPERT_CONFIDENCE);
        }
        assert_eq!(expert_confidence(ExpertiseArea::ValueBetting), 83);
        assert_eq!(expert_confidence(ExpertiseArea::Conditions), 76);
    }

    #[test]
    fn test_value_lines_match_hand_calculation() {
        let lines = value_lines(&value_odds());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].implied_pct, dec!(47.6));
        assert_eq!(lines[0].edge_pct, dec!(7.4));
        assert_eq!(lines[0].expected_return_pct, dec!(15.5));
        assert_eq!(lines[1].implied_pct, dec!(29.4));
        assert_eq!(lines[2].implied_pct, dec!(31.3));

        let best = best_value(&value_odds()).unwrap();
        assert_eq!(best.label, "主胜");
    }

    #[test]
    fn test_value_skips_non_positive_odds() {
        let odds = OddsInfo {
            home_win: 0.0,
            draw: -1.0,
            away_win: f64::NAN,
            ..fixtures::sample_odds()
        };
        assert!(value_lines(&odds).is_empty());
        assert!(best_value(&odds).is_none());
        assert!(value_analysis(&odds).contains("建议观望"));
    }

    #[test]
    fn test_value_advice_uses_expected_return() {
        let advice = betting_advice(ExpertiseArea::ValueBetting, &value_odds());
        assert_eq!(advice.primary_bet, "主胜");
        assert_eq!(advice.reasoning, "期望值+15.5%，价值显著");
        let line = prediction_line(ExpertiseArea::ValueBetting, &fixtures::sample_match(), &value_odds());
        assert!(line.contains("+15.5%"));
    }

    #[test]
    fn test_default_advice() {
        let advice = betting_advice(ExpertiseArea::Psychology, &fixtures::sample_odds());
        assert_eq!(advice.primary_bet, "主队不败");
        assert_eq!(advice.stake, "1单位");
        assert_eq!(advice.secondary_bets.len(), 2);
    }

    #[test]
    fn test_handicap_advice_uses_line() {
        let advice = betting_advice(ExpertiseArea::AsianHandicap, &fixtures::sample_odds());
        assert_eq!(advice.primary_bet, "主队-0.5");
    }

    #[test]
    fn test_every_area_produces_text_with_team_names() {
        let m = fixtures::sample_match();
        let odds = fixtures::sample_odds();
        let history = fixtures::sample_history();
        for area in ExpertiseArea::ALL {
            let title = specialty_title(area, &m.home_team.name, &m.away_team.name);
            assert!(title.contains(&m.home_team.name));
            assert!(!specialty_section(area, &m, &odds, &history).is_empty());
            assert!(recent_form_section(area, &m).contains(&m.away_team.name));
            assert!(historical_section(area, &m, &history).contains(&m.home_team.name));
            assert!(!prediction_line(area, &m, &odds).is_empty());
        }
    }

    #[test]
    fn test_conditions_fall_back_when_weather_missing() {
        let mut m = fixtures::sample_match();
        m.weather = None;
        assert!(conditions_analysis(&m).contains(DEFAULT_WEATHER));
        m.weather = Some("小雨".to_string());
        assert!(conditions_analysis(&m).contains("小雨"));
    }

    #[test]
    fn test_injury_section_lists_players() {
        let m = fixtures::demo_match();
        let text = injury_analysis(&m);
        for player in m.away_team.key_players_status.keys() {
            assert!(text.contains(player.as_str()));
        }
    }
}
