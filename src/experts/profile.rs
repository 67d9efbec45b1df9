use std::fmt;

use serde::Serialize;

/// Persona specialization. Decides which specialty section an expert writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExpertiseArea {
    #[serde(rename = "statistical_analysis")]
    Statistics,
    #[serde(rename = "tactical_analysis")]
    Tactics,
    #[serde(rename = "historical_patterns")]
    Historical,
    #[serde(rename = "injury_assessment")]
    Injuries,
    #[serde(rename = "asian_handicap")]
    AsianHandicap,
    #[serde(rename = "over_under_goals")]
    Goals,
    #[serde(rename = "home_away_form")]
    HomeAway,
    #[serde(rename = "weather_conditions")]
    Conditions,
    #[serde(rename = "psychological_factors")]
    Psychology,
    #[serde(rename = "value_betting")]
    ValueBetting,
}

impl ExpertiseArea {
    pub const ALL: [ExpertiseArea; 10] = [
        ExpertiseArea::Statistics,
        ExpertiseArea::Tactics,
        ExpertiseArea::Historical,
        ExpertiseArea::Injuries,
        ExpertiseArea::AsianHandicap,
        ExpertiseArea::Goals,
        ExpertiseArea::HomeAway,
        ExpertiseArea::Conditions,
        ExpertiseArea::Psychology,
        ExpertiseArea::ValueBetting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExpertiseArea::Statistics => "statistical_analysis",
            ExpertiseArea::Tactics => "tactical_analysis",
            ExpertiseArea::Historical => "historical_patterns",
            ExpertiseArea::Injuries => "injury_assessment",
            ExpertiseArea::AsianHandicap => "asian_handicap",
            ExpertiseArea::Goals => "over_under_goals",
            ExpertiseArea::HomeAway => "home_away_form",
            ExpertiseArea::Conditions => "weather_conditions",
            ExpertiseArea::Psychology => "psychological_factors",
            ExpertiseArea::ValueBetting => "value_betting",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }
}

impl fmt::Display for ExpertiseArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WritingStyle {
    #[serde(rename = "data-driven analytical")]
    Analytical,
    #[serde(rename = "story-telling narrative")]
    Narrative,
    #[serde(rename = "technical professional")]
    Technical,
    #[serde(rename = "friendly conversational")]
    Conversational,
    #[serde(rename = "confident authoritative")]
    Authoritative,
    #[serde(rename = "careful conservative")]
    Cautious,
    #[serde(rename = "bold aggressive")]
    Aggressive,
    #[serde(rename = "teaching explanatory")]
    Educational,
    #[serde(rename = "passionate emotional")]
    Passionate,
    #[serde(rename = "concise efficient")]
    Minimalist,
}

impl WritingStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            WritingStyle::Analytical => "data-driven analytical",
            WritingStyle::Narrative => "story-telling narrative",
            WritingStyle::Technical => "technical professional",
            WritingStyle::Conversational => "friendly conversational",
            WritingStyle::Authoritative => "confident authoritative",
            WritingStyle::Cautious => "careful conservative",
            WritingStyle::Aggressive => "bold aggressive",
            WritingStyle::Educational => "teaching explanatory",
            WritingStyle::Passionate => "passionate emotional",
            WritingStyle::Minimalist => "concise efficient",
        }
    }
}

impl fmt::Display for WritingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentence templates with `{home_team}`, `{away_team}` and `{team}` placeholders.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleTemplates {
    pub opening: &'static str,
    pub recent_form: &'static str,
    pub historical: &'static str,
    pub prediction: &'static str,
}

/// A static persona. Never mutated after the catalog is built.
#[derive(Debug, Clone, Serialize)]
pub struct ExpertProfile {
    pub key: &'static str,
    pub name: &'static str,
    pub nickname: &'static str,
    pub bio: &'static str,
    pub avatar_url: &'static str,

    pub primary_expertise: ExpertiseArea,
    pub secondary_expertise: &'static [ExpertiseArea],
    pub specializations: &'static [&'static str],

    pub writing_style: WritingStyle,
    pub tone_keywords: &'static [&'static str],
    pub signature_phrases: &'static [&'static str],

    pub analysis_priorities: &'static [&'static str],
    pub key_metrics: &'static [&'static str],
    pub preferred_bet_types: &'static [&'static str],

    pub win_rate: f64,
    pub avg_return: f64,
    pub total_predictions: u32,
    pub successful_predictions: u32,
    pub followers_count: u32,

    pub article_templates: ArticleTemplates,
    pub opening_templates: &'static [&'static str],
    pub conclusion_templates: &'static [&'static str],
}

/// Substitute the team placeholders of an article template.
pub fn fill_template(template: &str, home_team: &str, away_team: &str) -> String {
    template
        .replace("{home_team}", home_team)
        .replace("{away_team}", away_team)
        .replace("{team}", home_team)
}
