//! Article compiler.
//!
//! One writer serves both template generations. The template decides which
//! sections are produced and how the title, summary and closing block read.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::models::{HistoricalData, Insight, MatchInfo, OddsInfo};
use super::sections;

pub const DISCLAIMER: &str = "免责声明：以上分析仅供参考，投注有风险，请理性对待。";
const SEPARATOR_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVersion {
    /// Four short sections.
    Classic,
    /// Eight numbered sections aimed at 1000-1500 characters.
    #[default]
    Enhanced,
}

impl TemplateVersion {
    pub fn section_keys(self) -> &'static [&'static str] {
        match self {
            TemplateVersion::Classic => &["近期表现", "历史交锋", "伤病情况", "比分预测"],
            TemplateVersion::Enhanced => &[
                "比赛背景",
                "球队近况",
                "历史交锋",
                "伤停情况",
                "战术分析",
                "关键对位",
                "赔率解读",
                "综合预测",
            ],
        }
    }

    fn stake(self, confidence: u8) -> &'static str {
        match self {
            TemplateVersion::Classic => sections::calculate_stake_classic(confidence),
            TemplateVersion::Enhanced => sections::calculate_stake(confidence),
        }
    }
}

/// Inclusive character-count window an article is expected to land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthTarget {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for LengthTarget {
    fn default() -> Self {
        Self {
            min_chars: 1000,
            max_chars: 1500,
        }
    }
}

impl LengthTarget {
    pub fn measure(&self, text: &str) -> LengthReport {
        let chars = count_chars(text);
        LengthReport {
            chars,
            target_min: self.min_chars,
            target_max: self.max_chars,
            within_target: (self.min_chars..=self.max_chars).contains(&chars),
        }
    }
}

/// Article length measured after compilation. Reported, never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthReport {
    pub chars: usize,
    pub target_min: usize,
    pub target_max: usize,
    pub within_target: bool,
}

/// Characters excluding whitespace, the usual proxy for Chinese word count.
pub fn count_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleSection {
    pub key: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub bet_type: String,
    pub selection: String,
    pub odds: f64,
    pub confidence: u8,
    pub stake_suggestion: String,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionArticle {
    pub template: TemplateVersion,
    pub title: String,
    pub confidence: u8,
    pub summary: String,
    pub sections: Vec<ArticleSection>,
    pub recommendation: Recommendation,
    pub predicted_score: String,
    pub full_article: String,
    pub length: LengthReport,
}

impl PredictionArticle {
    pub fn section(&self, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.content.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionWriter {
    template: TemplateVersion,
    target: LengthTarget,
}

impl PredictionWriter {
    pub fn new(template: TemplateVersion) -> Self {
        Self {
            template,
            target: LengthTarget::default(),
        }
    }

    pub fn with_target(mut self, target: LengthTarget) -> Self {
        self.target = target;
        self
    }

    pub fn template(&self) -> TemplateVersion {
        self.template
    }

    /// Generate a complete prediction article. Never fails on missing optional fields.
    pub fn generate_prediction(
        &self,
        m: &MatchInfo,
        odds: &OddsInfo,
        history: &HistoricalData,
        confidence: u8,
        insights: Option<&[Insight]>,
    ) -> PredictionArticle {
        let confidence = confidence.min(100);
        let predicted_score =
            sections::predict_score(m.home_team.league_position, m.away_team.league_position);

        let sections = match self.template {
            TemplateVersion::Classic => vec![
                section("近期表现", sections::classic_recent_form(m)),
                section("历史交锋", sections::classic_h2h(history, m)),
                section("伤病情况", sections::classic_injuries(m)),
                section(
                    "比分预测",
                    sections::classic_score_prediction(m, odds, predicted_score, insights),
                ),
            ],
            TemplateVersion::Enhanced => vec![
                section("比赛背景", sections::match_background(m)),
                section("球队近况", sections::team_form(m)),
                section("历史交锋", sections::h2h_detailed(history, m)),
                section("伤停情况", sections::injuries_detailed(m)),
                section("战术分析", sections::tactics(m)),
                section("关键对位", sections::key_matchups(m)),
                section("赔率解读", sections::odds_detailed(odds)),
                section(
                    "综合预测",
                    sections::comprehensive_prediction(m, odds, confidence, insights),
                ),
            ],
        };

        let mut article = PredictionArticle {
            template: self.template,
            title: self.title(m),
            confidence,
            summary: self.summary(m),
            sections,
            recommendation: self.recommendation(odds, confidence),
            predicted_score: predicted_score.to_string(),
            full_article: String::new(),
            length: self.target.measure(""),
        };
        article.full_article = self.compile(&article);
        article.length = self.target.measure(&article.full_article);

        if self.template == TemplateVersion::Enhanced && !article.length.within_target {
            warn!(
                chars = article.length.chars,
                target_min = self.target.min_chars,
                target_max = self.target.max_chars,
                "Article length outside target"
            );
        }
        debug!(
            template = ?self.template,
            home = %m.home_team.name,
            away = %m.away_team.name,
            chars = article.length.chars,
            "Prediction article generated"
        );

        article
    }

    fn title(&self, m: &MatchInfo) -> String {
        match self.template {
            TemplateVersion::Classic => {
                format!("{}联赛，{} VS {}", m.league, m.home_team.name, m.away_team.name)
            }
            TemplateVersion::Enhanced => format!(
                "【{}重磅对决】{} VS {} 深度解析",
                m.league, m.home_team.name, m.away_team.name
            ),
        }
    }

    fn summary(&self, m: &MatchInfo) -> String {
        match self.template {
            TemplateVersion::Classic => format!(
                "{}{}对阵{}的比赛分析：",
                m.league, m.home_team.name, m.away_team.name
            ),
            TemplateVersion::Enhanced => format!(
                "北京时间{}，{}联赛将迎来一场焦点战役，\n\
                 {}坐镇主场{}迎战{}。\n\
                 本场比赛对双方都极为重要，主队力争巩固积分榜位置，客队则希望在客场取得宝贵积分。",
                m.match_time, m.league, m.home_team.name, m.venue, m.away_team.name
            ),
        }
    }

    fn recommendation(&self, odds: &OddsInfo, confidence: u8) -> Recommendation {
        let (reasoning, alternative) = match self.template {
            TemplateVersion::Classic => ("主场优势明显，状态出色，值得信赖", None),
            TemplateVersion::Enhanced => (
                "综合主场优势、近期状态、历史交锋等因素",
                Some(format!("大小球 {} 大球", odds.over_under)),
            ),
        };
        Recommendation {
            bet_type: "亚洲让球盘".to_string(),
            selection: format!("{} 主队", odds.asian_handicap),
            odds: odds.home_win,
            confidence,
            stake_suggestion: self.template.stake(confidence).to_string(),
            reasoning: reasoning.to_string(),
            alternative,
        }
    }

    fn compile(&self, article: &PredictionArticle) -> String {
        let separator = "=".repeat(SEPARATOR_WIDTH);
        let mut out = format!("【{}】\n\n{}\n\n", article.title, article.summary);
        if self.template == TemplateVersion::Enhanced {
            let _ = write!(out, "{separator}\n\n");
        }
        for section in &article.sections {
            let _ = write!(out, "{}\n\n", section.content);
        }

        let rec = &article.recommendation;
        match self.template {
            TemplateVersion::Classic => {
                let _ = write!(
                    out,
                    "推荐：{}\n置信度：{}%\n预测比分：{}\n\n{DISCLAIMER}\n",
                    rec.selection, article.confidence, article.predicted_score
                );
            }
            TemplateVersion::Enhanced => {
                let _ = write!(
                    out,
                    "{separator}\n\n【最终预测】\n推荐投注：{}\n置信度：{}%\n预测比分：{}\n备选方案：{}\n\n{DISCLAIMER}\n",
                    rec.selection,
                    article.confidence,
                    article.predicted_score,
                    rec.alternative.as_deref().unwrap_or("无")
                );
            }
        }
        out
    }
}

fn section(key: &'static str, content: String) -> ArticleSection {
    ArticleSection { key, content }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::writer::models::{HistoricalData, TeamInfo};

    fn bare_team(name: &str, position: u32) -> TeamInfo {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "league_position": position,
        }))
        .unwrap()
    }

    fn bare_match() -> MatchInfo {
        MatchInfo {
            home_team: bare_team("甲队", 2),
            away_team: bare_team("乙队", 9),
            league: "中超".to_string(),
            match_time: "19:35".to_string(),
            venue: "".to_string(),
            weather: None,
            referee: None,
            importance: "常规赛".to_string(),
        }
    }

    #[test]
    fn test_all_sections_present_with_empty_optionals() {
        let m = bare_match();
        let odds = fixtures::quick_odds();
        let history = HistoricalData::default();

        for template in [TemplateVersion::Classic, TemplateVersion::Enhanced] {
            let article =
                PredictionWriter::new(template).generate_prediction(&m, &odds, &history, 75, None);
            let keys: Vec<&str> = article.sections.iter().map(|s| s.key).collect();
            assert_eq!(keys, template.section_keys());
            for s in &article.sections {
                assert!(!s.content.is_empty(), "{} empty", s.key);
            }
            assert!(article.full_article.contains(DISCLAIMER));
        }
    }

    #[test]
    fn test_enhanced_sample_article() {
        let article = PredictionWriter::new(TemplateVersion::Enhanced).generate_prediction(
            &fixtures::sample_match(),
            &fixtures::sample_odds(),
            &fixtures::sample_history(),
            fixtures::SAMPLE_CONFIDENCE,
            None,
        );

        assert_eq!(article.title, "【日职联重磅对决】东京FC VS 京都不死鸟 深度解析");
        assert_eq!(article.recommendation.selection, "主队-0.5 主队");
        assert_eq!(article.recommendation.stake_suggestion, "2-3单位");
        assert_eq!(article.recommendation.alternative.as_deref(), Some("大小球 2.5球 大球"));
        assert_eq!(article.predicted_score, "2-0 或 2-1");
        assert!(article.full_article.contains("东京FC"));
        assert!(article.full_article.contains("京都不死鸟"));
        assert!(article.full_article.contains("推荐投注：主队-0.5 主队"));
        assert!(article.full_article.contains("【最终预测】"));
        assert_eq!(article.length.chars, count_chars(&article.full_article));
    }

    #[test]
    fn test_classic_layout() {
        let article = PredictionWriter::new(TemplateVersion::Classic).generate_prediction(
            &fixtures::demo_match(),
            &fixtures::demo_odds(),
            &fixtures::demo_history(),
            fixtures::DEMO_CONFIDENCE,
            Some(&fixtures::demo_insights()),
        );

        assert_eq!(article.title, "韩K联联赛，浦项制铁 VS 全北现代");
        assert_eq!(article.recommendation.stake_suggestion, "2单位");
        assert!(article.recommendation.alternative.is_none());
        let score = article.section("比分预测").unwrap();
        assert!(score.contains("- 专家系统预测：主队不败，推荐让球"));
        assert!(article.full_article.starts_with("【韩K联联赛，浦项制铁 VS 全北现代】"));
        assert!(article.full_article.contains("置信度：88%"));
    }

    #[test]
    fn test_confidence_is_capped_at_100() {
        let article = PredictionWriter::default().generate_prediction(
            &fixtures::sample_match(),
            &fixtures::sample_odds(),
            &fixtures::sample_history(),
            250,
            None,
        );
        assert_eq!(article.confidence, 100);
    }

    #[test]
    fn test_length_report() {
        let target = LengthTarget {
            min_chars: 3,
            max_chars: 5,
        };
        let report = target.measure("一 二\n三四");
        assert_eq!(report.chars, 4);
        assert!(report.within_target);
        assert!(!target.measure("一二三四五六").within_target);
    }
}
