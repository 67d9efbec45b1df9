use serde::Serialize;

use super::catalog::ExpertCatalog;
use super::profile::{fill_template, ExpertProfile};
use super::specialty::{
    betting_advice, expert_confidence, historical_section, prediction_line, recent_form_section,
    specialty_section, specialty_title, BettingAdvice,
};
use crate::data::StatSource;
use crate::error::WriterError;
use crate::writer::article::{ArticleSection, LengthReport, LengthTarget, DISCLAIMER};
use crate::writer::models::{HistoricalData, MatchInfo, OddsInfo};

const FALLBACK_CONCLUSION: &str = "综合所有分析因素，我们对本场比赛充满期待。";

/// Public identity of the persona that wrote an article.
#[derive(Debug, Clone, Serialize)]
pub struct ExpertInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub nickname: &'static str,
    pub expertise: &'static str,
    pub writing_style: &'static str,
    pub win_rate: f64,
}

impl From<&ExpertProfile> for ExpertInfo {
    fn from(profile: &ExpertProfile) -> Self {
        Self {
            key: profile.key,
            name: profile.name,
            nickname: profile.nickname,
            expertise: profile.primary_expertise.as_str(),
            writing_style: profile.writing_style.as_str(),
            win_rate: profile.win_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpertArticle {
    pub expert_info: ExpertInfo,
    pub title: String,
    pub opening: String,
    pub sections: Vec<ArticleSection>,
    pub prediction: String,
    pub conclusion: String,
    pub confidence: u8,
    pub betting_advice: BettingAdvice,
    pub full_article: String,
    pub length: LengthReport,
}

impl ExpertArticle {
    pub fn section(&self, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.content.as_str())
    }
}

/// Write the specialty article of `expert_key`.
///
/// The stat source only picks which signature opening and conclusion the
/// persona uses; everything else is derived from the records.
pub fn generate_expert_article(
    catalog: &ExpertCatalog,
    expert_key: &str,
    m: &MatchInfo,
    odds: &OddsInfo,
    history: &HistoricalData,
    stats: &mut dyn StatSource,
    target: &LengthTarget,
) -> Result<ExpertArticle, WriterError> {
    let expert = catalog
        .get(expert_key)
        .ok_or_else(|| WriterError::UnknownExpert(expert_key.to_string()))?;
    let area = expert.primary_expertise;
    let home = &m.home_team.name;
    let away = &m.away_team.name;

    let prediction = prediction_line(area, m, odds);
    let sections = vec![
        ArticleSection {
            key: "近期表现",
            content: recent_form_section(area, m),
        },
        ArticleSection {
            key: "历史交锋",
            content: historical_section(area, m, history),
        },
        ArticleSection {
            key: "专业分析",
            content: specialty_section(area, m, odds, history),
        },
        ArticleSection {
            key: "预测分析",
            content: prediction.clone(),
        },
    ];

    let mut article = ExpertArticle {
        expert_info: ExpertInfo::from(expert),
        title: specialty_title(area, home, away),
        opening: opening(expert, home, away, stats),
        sections,
        prediction,
        conclusion: conclusion(expert, stats),
        confidence: expert_confidence(area),
        betting_advice: betting_advice(area, odds),
        full_article: String::new(),
        length: target.measure(""),
    };
    article.full_article = compile(&article);
    article.length = target.measure(&article.full_article);

    tracing::debug!(
        expert = expert.key,
        chars = article.length.chars,
        confidence = article.confidence,
        "Expert article generated"
    );
    Ok(article)
}

fn opening(expert: &ExpertProfile, home: &str, away: &str, stats: &mut dyn StatSource) -> String {
    let body = fill_template(expert.article_templates.opening, home, away);
    if expert.opening_templates.is_empty() {
        return body;
    }
    let signature = stats.pick(expert.opening_templates);
    format!("{signature}。\n\n{body}")
}

fn conclusion(expert: &ExpertProfile, stats: &mut dyn StatSource) -> String {
    if expert.conclusion_templates.is_empty() {
        return FALLBACK_CONCLUSION.to_string();
    }
    let signature = stats.pick(expert.conclusion_templates);
    format!("{signature}。让我们拭目以待这场精彩对决的结果。")
}

fn compile(article: &ExpertArticle) -> String {
    let mut parts = vec![
        article.title.clone(),
        format!(
            "作者：{}（{}）",
            article.expert_info.name, article.expert_info.nickname
        ),
        article.opening.clone(),
    ];
    parts.extend(article.sections.iter().map(|s| s.content.clone()));

    let advice = &article.betting_advice;
    let mut tip = format!(
        "【投注建议】{} {}（信心指数{}%）\n理由：{}",
        advice.primary_bet, advice.stake, article.confidence, advice.reasoning
    );
    if !advice.secondary_bets.is_empty() {
        tip.push_str(&format!("\n次选：{}", advice.secondary_bets.join("、")));
    }
    parts.push(tip);
    parts.push(article.conclusion.clone());
    parts.push(DISCLAIMER.to_string());
    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fixtures, MidpointStats};

    fn write(key: &str) -> Result<ExpertArticle, WriterError> {
        generate_expert_article(
            &ExpertCatalog::builtin(),
            key,
            &fixtures::sample_match(),
            &fixtures::sample_odds(),
            &fixtures::sample_history(),
            &mut MidpointStats,
            &LengthTarget::default(),
        )
    }

    #[test]
    fn test_unknown_expert_errors() {
        let err = write("nobody").unwrap_err();
        assert!(matches!(err, WriterError::UnknownExpert(ref key) if key == "nobody"));
        assert_eq!(err.to_string(), "Expert nobody not found");
    }

    #[test]
    fn test_every_builtin_expert_writes() {
        for expert in ExpertCatalog::builtin().all() {
            let article = write(expert.key).unwrap();
            assert_eq!(article.sections.len(), 4);
            for key in ["近期表现", "历史交锋", "专业分析", "预测分析"] {
                assert!(article.section(key).is_some(), "{} missing {key}", expert.key);
            }
            assert!(article.confidence <= 95);
            assert!(article.full_article.contains("东京FC"));
            assert!(article.full_article.ends_with(DISCLAIMER));
            assert_eq!(article.length.chars, crate::writer::article::count_chars(&article.full_article));
        }
    }

    #[test]
    fn test_opening_and_conclusion_use_signatures() {
        let article = write("data_wizard").unwrap();
        // Midpoint stats always take the first template.
        assert!(article.opening.starts_with("欢迎来到数据驱动的足球分析世界。\n\n"));
        assert!(article.opening.contains("东京FC vs 京都不死鸟"));
        assert_eq!(article.conclusion, "数据为王，理性投注。让我们拭目以待这场精彩对决的结果。");
        assert_eq!(article.title, "数据解析：东京FC vs 京都不死鸟 深度统计分析");
        assert_eq!(article.expert_info.expertise, "statistical_analysis");
    }

    #[test]
    fn test_prediction_section_matches_prediction_line() {
        let article = write("goal_prophet").unwrap();
        assert_eq!(article.section("预测分析"), Some(article.prediction.as_str()));
        assert_eq!(article.betting_advice.primary_bet, "大2.5球");
    }
}
