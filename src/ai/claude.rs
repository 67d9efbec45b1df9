//! Claude API client.
//!
//! Implements [`LanguageModel`] against the Anthropic Messages API and tracks
//! every call's cost in the store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{LanguageModel, MessageReply, MessageRequest};
use crate::config::AiConfig;
use crate::db::{ApiCostRecord, Store};

/// Claude API pricing (claude-sonnet-4-20250514).
const INPUT_PRICE_PER_MILLION: Decimal = dec!(3.00);
const OUTPUT_PRICE_PER_MILLION: Decimal = dec!(15.00);
const MILLION: Decimal = dec!(1_000_000);

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct ClaudeClient {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    store: Option<Arc<Store>>,
}

impl ClaudeClient {
    pub fn new(api_key: SecretString, config: &AiConfig, store: Option<Arc<Store>>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn track_cost(&self, input_tokens: i64, output_tokens: i64, cost: Decimal) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let record = ApiCostRecord {
            id: None,
            provider: "anthropic".to_string(),
            endpoint: Some("messages".to_string()),
            input_tokens: Some(input_tokens),
            output_tokens: Some(output_tokens),
            cost: cost.to_string(),
            created_at: None,
        };
        store.insert_api_cost(&record).await?;
        Ok(())
    }
}

#[async_trait]
impl LanguageModel for ClaudeClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn create_message(&self, request: &MessageRequest) -> Result<MessageReply> {
        let body = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system.clone(),
            messages: vec![ClaudeMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Claude API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            bail!("Claude API error ({}): {}", status, error_body);
        }

        let api_response: ClaudeApiResponse = response
            .json()
            .await
            .context("Failed to parse Claude API response")?;

        let content = api_response
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<&str>>()
            .join("");

        let input_tokens = api_response.usage.input_tokens;
        let output_tokens = api_response.usage.output_tokens;
        let cost = calculate_cost(input_tokens, output_tokens);

        info!(
            input_tokens,
            output_tokens,
            cost = %cost,
            model = %self.model,
            "Claude API call completed"
        );

        if let Err(e) = self.track_cost(input_tokens, output_tokens, cost).await {
            warn!(error = %e, "Failed to track API cost");
        }

        Ok(MessageReply {
            content,
            model: api_response.model.unwrap_or_else(|| self.model.clone()),
            input_tokens,
            output_tokens,
        })
    }
}

/// Calculate the dollar cost of a Claude API call.
pub fn calculate_cost(input_tokens: i64, output_tokens: i64) -> Decimal {
    let input_cost = Decimal::from(input_tokens) * INPUT_PRICE_PER_MILLION / MILLION;
    let output_cost = Decimal::from(output_tokens) * OUTPUT_PRICE_PER_MILLION / MILLION;
    input_cost + output_cost
}

// --- Request/Response Types ---

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeApiResponse {
    #[serde(default)]
    model: Option<String>,
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: i64,
    output_tokens: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> AiConfig {
        AiConfig {
            enabled: true,
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: base_url.to_string(),
            insight_max_tokens: 200,
            article_max_tokens: 4096,
            temperature: 0.7,
            timeout_seconds: 5,
        }
    }

    fn request() -> MessageRequest {
        MessageRequest {
            prompt: "预测比赛".to_string(),
            system: Some("You are an expert football analyst.".to_string()),
            max_tokens: 200,
            temperature: 0.7,
        }
    }

    #[test]
    fn test_cost_calculation() {
        // input: 1000 * 3.00 / 1_000_000 = 0.003
        // output: 500 * 15.00 / 1_000_000 = 0.0075
        let cost = calculate_cost(1000, 500);
        assert_eq!(cost, dec!(0.0105));
    }

    #[test]
    fn test_cost_calculation_zero_tokens() {
        let cost = calculate_cost(0, 0);
        assert_eq!(cost, Decimal::ZERO);
    }

    #[test]
    fn test_cost_calculation_large_input() {
        let cost = calculate_cost(100_000, 4_000);
        assert_eq!(cost, dec!(0.36));
    }

    #[tokio::test]
    async fn test_create_message_joins_text_and_tracks_cost() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(serde_json::json!({
                "max_tokens": 200,
                "system": "You are an expert football analyst.",
                "messages": [{"role": "user", "content": "预测比赛"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "claude-sonnet-4-20250514",
                "content": [
                    {"type": "text", "text": "{\"result\": \"主胜\","},
                    {"type": "tool_use", "id": "x", "name": "noop", "input": {}},
                    {"type": "text", "text": " \"score\": \"2-1\"}"}
                ],
                "usage": {"input_tokens": 1000, "output_tokens": 500}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(Store::new(":memory:").await.unwrap());
        let client = ClaudeClient::new(
            SecretString::from("test-key"),
            &config(&server.uri()),
            Some(store.clone()),
        )
        .unwrap();

        let reply = client.create_message(&request()).await.unwrap();
        assert_eq!(reply.content, "{\"result\": \"主胜\", \"score\": \"2-1\"}");
        assert_eq!(reply.input_tokens, 1000);
        assert_eq!(reply.output_tokens, 500);
        assert_eq!(store.total_api_cost().await.unwrap(), dec!(0.0105));
    }

    #[tokio::test]
    async fn test_create_message_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client =
            ClaudeClient::new(SecretString::from("k"), &config(&server.uri()), None).unwrap();
        let err = client.create_message(&request()).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("529"), "{message}");
        assert!(message.contains("overloaded"), "{message}");
    }

    #[tokio::test]
    async fn test_create_message_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client =
            ClaudeClient::new(SecretString::from("k"), &config(&server.uri()), None).unwrap();
        assert!(client.create_message(&request()).await.is_err());
    }
}
