pub mod analyst;
pub mod claude;
pub mod json;

use anyhow::Result;
use async_trait::async_trait;

pub use analyst::AiAnalyst;
pub use claude::{calculate_cost, ClaudeClient};

/// A single-turn completion request.
#[derive(Debug, Clone)]
pub struct MessageRequest {
    pub prompt: String,
    pub system: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct MessageReply {
    pub content: String,
    pub model: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
}

/// Text-generation backend. An `Err` means the provider call did not succeed.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn create_message(&self, request: &MessageRequest) -> Result<MessageReply>;
}
