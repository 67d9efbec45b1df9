//! Prompt construction and reply handling for AI-assisted predictions.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::claude::ClaudeClient;
use super::json::extract_json;
use super::{LanguageModel, MessageRequest};
use crate::config::{AiConfig, Secrets};
use crate::db::Store;
use crate::monitoring::HealthState;
use crate::writer::models::{Insight, MatchInfo, TeamInfo};

pub const FALLBACK_INSIGHT_SOURCE: &str = "默认预测";
pub const FALLBACK_INSIGHT_TEXT: &str = "根据数据分析，主队略占优势";
pub const FALLBACK_ARTICLE: &str = "AI分析服务暂时不可用，请参考模板生成的分析内容。";

const ANALYST_SYSTEM_PROMPT: &str = "You are an expert football analyst with deep knowledge of statistics, team dynamics, and betting markets. Provide detailed and insightful predictions based on data. Always respond in Chinese and maintain a professional tone.";

/// The structured verdict the insight prompt asks for.
#[derive(Debug, Deserialize)]
struct Verdict {
    result: String,
    score: String,
    reason: String,
}

/// A long-form article written by the model, or the static fallback.
#[derive(Debug, Clone, Serialize)]
pub struct AiArticle {
    pub content: String,
    pub model: Option<String>,
    pub fallback: bool,
}

pub struct AiAnalyst {
    model: Option<Arc<dyn LanguageModel>>,
    config: AiConfig,
    health: Option<HealthState>,
}

impl AiAnalyst {
    pub fn new(config: AiConfig, model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self {
            model,
            config,
            health: None,
        }
    }

    /// Build the analyst from configuration. No model is attached when AI is
    /// disabled or no API key is present.
    pub fn from_config(config: &AiConfig, secrets: &Secrets, store: Option<Arc<Store>>) -> Result<Self> {
        let model: Option<Arc<dyn LanguageModel>> = match (&secrets.anthropic_api_key, config.enabled) {
            (Some(key), true) => {
                let client = ClaudeClient::new(key.clone(), config, store)
                    .context("Failed to create Claude client")?;
                info!(model = %client.model(), "AI augmentation enabled");
                Some(Arc::new(client) as Arc<dyn LanguageModel>)
            }
            (None, true) => {
                warn!("ANTHROPIC_API_KEY not set, AI augmentation disabled");
                None
            }
            (_, false) => None,
        };
        Ok(Self::new(config.clone(), model))
    }

    pub fn with_health(mut self, health: HealthState) -> Self {
        self.health = Some(health);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled && self.model.is_some()
    }

    /// Ask the model for a verdict on `m`.
    ///
    /// `None` means AI is off and no AI section should be written. Any provider
    /// or parse failure yields the single default insight instead.
    pub async fn match_insights(&self, m: &MatchInfo) -> Option<Vec<Insight>> {
        if !self.config.enabled {
            return None;
        }
        let model = self.model.as_ref()?;

        let request = MessageRequest {
            prompt: insight_prompt(m),
            system: None,
            max_tokens: self.config.insight_max_tokens,
            temperature: self.config.temperature,
        };

        let verdict = model
            .create_message(&request)
            .await
            .and_then(|reply| parse_verdict(&reply.content));

        match verdict {
            Ok(v) => Some(vec![
                Insight::new("Claude AI", format!("{}，预测比分{}", v.result, v.score)),
                Insight::new("AI分析", v.reason),
            ]),
            Err(e) => {
                warn!(
                    error = %e,
                    home = %m.home_team.name,
                    away = %m.away_team.name,
                    "AI insight failed, using default prediction"
                );
                self.note_fallback().await;
                Some(vec![Insight::new(FALLBACK_INSIGHT_SOURCE, FALLBACK_INSIGHT_TEXT)])
            }
        }
    }

    /// Ask the model for a full analysis article, optionally in a persona's voice.
    pub async fn write_article(&self, m: &MatchInfo, expert_style: Option<&str>) -> AiArticle {
        let Some(model) = self.model.as_ref().filter(|_| self.config.enabled) else {
            return fallback_article();
        };

        let mut system = ANALYST_SYSTEM_PROMPT.to_string();
        if let Some(style) = expert_style {
            system.push_str(&format!("\n\nAnalyze in the style of: {style}"));
        }
        let request = MessageRequest {
            prompt: article_prompt(m),
            system: Some(system),
            max_tokens: self.config.article_max_tokens,
            temperature: self.config.temperature,
        };

        match model.create_message(&request).await {
            Ok(reply) if !reply.content.trim().is_empty() => AiArticle {
                content: reply.content,
                model: Some(reply.model),
                fallback: false,
            },
            Ok(_) => {
                warn!("AI article reply was empty, using fallback");
                self.note_fallback().await;
                fallback_article()
            }
            Err(e) => {
                warn!(error = %e, "AI article failed, using fallback");
                self.note_fallback().await;
                fallback_article()
            }
        }
    }

    async fn note_fallback(&self) {
        if let Some(health) = &self.health {
            health.record_ai_fallback().await;
        }
    }
}

fn fallback_article() -> AiArticle {
    AiArticle {
        content: FALLBACK_ARTICLE.to_string(),
        model: None,
        fallback: true,
    }
}

fn parse_verdict(content: &str) -> Result<Verdict> {
    let json = extract_json(content).context("No JSON object in AI reply")?;
    serde_json::from_str(&json).with_context(|| format!("Unexpected AI verdict shape: {json}"))
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

fn team_block(label: &str, venue_label: &str, team: &TeamInfo) -> String {
    format!(
        "{label}：{}\n- 联赛排名：第{}位\n- 近期战绩：{}\n- {venue_label}战绩：{}",
        team.name,
        team.league_position,
        or_na(&team.recent_performance),
        or_na(&team.home_away_record),
    )
}

pub fn insight_prompt(m: &MatchInfo) -> String {
    format!(
        "基于以下数据，预测比赛结果：\n\n{}\n\n{}\n\n请给出：\n1. 比赛结果预测（主胜/平/客胜）\n2. 可能的比分\n3. 简短理由（不超过50字）\n\n请用JSON格式回复：{{\"result\": \"主胜\", \"score\": \"2-1\", \"reason\": \"主场优势明显\"}}",
        team_block("主队", "主场", &m.home_team),
        team_block("客队", "客场", &m.away_team),
    )
}

pub fn article_prompt(m: &MatchInfo) -> String {
    format!(
        "基于以下数据，提供详细的比赛预测分析（1000-1500字）：\n\n{}\n\n{}\n\n请提供：\n1. 详细的基本面分析（300-400字）\n2. 历史交锋分析（200-300字）\n3. 伤停和阵容分析（200-300字）\n4. 盘口和赔率解读（200-300字）\n5. 综合预测和投注建议（200-300字）\n\n要求：\n- 使用专业术语\n- 数据支撑观点\n- 逻辑清晰\n- 给出具体比分预测\n- 提供置信度百分比",
        team_block("主队", "主场", &m.home_team),
        team_block("客队", "客场", &m.away_team),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MessageReply;
    use crate::data::fixtures;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedModel {
        reply: Result<String, String>,
        seen: Mutex<Vec<MessageRequest>>,
    }

    impl ScriptedModel {
        fn new(reply: Result<&str, &str>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string).map_err(str::to_string),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn create_message(&self, request: &MessageRequest) -> Result<MessageReply> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(content) => Ok(MessageReply {
                    content: content.clone(),
                    model: "scripted".to_string(),
                    input_tokens: 10,
                    output_tokens: 20,
                }),
                Err(e) => Err(anyhow::anyhow!(e.clone())),
            }
        }
    }

    fn config(enabled: bool) -> AiConfig {
        AiConfig {
            enabled,
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            insight_max_tokens: 200,
            article_max_tokens: 4096,
            temperature: 0.7,
            timeout_seconds: 60,
        }
    }

    fn analyst(model: Arc<ScriptedModel>) -> AiAnalyst {
        AiAnalyst::new(config(true), Some(model as Arc<dyn LanguageModel>))
    }

    #[tokio::test]
    async fn test_insights_from_fenced_reply() {
        let model = ScriptedModel::new(Ok(
            "```json\n{\"result\": \"主胜\", \"score\": \"2-1\", \"reason\": \"主场优势明显\"}\n```",
        ));
        let insights = analyst(model.clone())
            .match_insights(&fixtures::sample_match())
            .await
            .expect("insights");

        assert_eq!(
            insights,
            vec![
                Insight::new("Claude AI", "主胜，预测比分2-1"),
                Insight::new("AI分析", "主场优势明显"),
            ]
        );
        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].max_tokens, 200);
        assert!(seen[0].system.is_none());
        assert!(seen[0].prompt.contains("主队：东京FC"));
        assert!(seen[0].prompt.contains("客场战绩："));
    }

    #[tokio::test]
    async fn test_insights_fall_back_on_error_and_garbage() {
        let health = HealthState::new();
        for reply in [Err("timeout"), Ok("主队必胜"), Ok("{\"result\": \"主胜\"}")] {
            let analyst = analyst(ScriptedModel::new(reply)).with_health(health.clone());
            let insights = analyst.match_insights(&fixtures::sample_match()).await;
            assert_eq!(
                insights,
                Some(vec![Insight::new(FALLBACK_INSIGHT_SOURCE, FALLBACK_INSIGHT_TEXT)])
            );
        }
        assert_eq!(health.report().await.ai_fallbacks, 3);
    }

    #[tokio::test]
    async fn test_no_insights_when_disabled_or_unconfigured() {
        let m = fixtures::sample_match();
        let model: Arc<dyn LanguageModel> = ScriptedModel::new(Ok("{}"));
        let disabled = AiAnalyst::new(config(false), Some(model));
        assert!(disabled.match_insights(&m).await.is_none());
        assert!(!disabled.is_enabled());

        let keyless = AiAnalyst::new(config(true), None);
        assert!(keyless.match_insights(&m).await.is_none());
    }

    #[tokio::test]
    async fn test_write_article_uses_style_in_system_prompt() {
        let model = ScriptedModel::new(Ok("全文分析"));
        let article = analyst(model.clone())
            .write_article(&fixtures::sample_match(), Some("data-driven analytical"))
            .await;

        assert_eq!(article.content, "全文分析");
        assert_eq!(article.model.as_deref(), Some("scripted"));
        assert!(!article.fallback);

        let seen = model.seen.lock().unwrap();
        let system = seen[0].system.as_deref().unwrap();
        assert!(system.ends_with("\n\nAnalyze in the style of: data-driven analytical"));
        assert_eq!(seen[0].max_tokens, 4096);
        assert!(seen[0].prompt.starts_with("基于以下数据，提供详细的比赛预测分析（1000-1500字）"));
    }

    #[tokio::test]
    async fn test_write_article_fallback() {
        let failing = analyst(ScriptedModel::new(Err("500")));
        let article = failing.write_article(&fixtures::sample_match(), None).await;
        assert!(article.fallback);
        assert_eq!(article.content, FALLBACK_ARTICLE);

        let keyless = AiAnalyst::new(config(true), None);
        assert!(keyless.write_article(&fixtures::sample_match(), None).await.fallback);
    }

    #[test]
    fn test_prompt_substitutes_missing_text() {
        let mut m = fixtures::sample_match();
        m.home_team.recent_performance.clear();
        let prompt = insight_prompt(&m);
        assert!(prompt.contains("- 近期战绩：N/A"));
        assert!(prompt.ends_with("\"reason\": \"主场优势明显\"}"));
    }
}
