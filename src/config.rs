use std::path::Path;

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;

use crate::writer::TemplateVersion;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub writer: WriterConfig,
    pub ai: AiConfig,
    pub monitoring: MonitoringConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WriterConfig {
    pub template: TemplateVersion,
    pub default_confidence: u8,
    /// Seed for placeholder statistics. `None` draws fresh entropy per request.
    pub seed: Option<u64>,
    pub target_min_chars: usize,
    pub target_max_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    pub model: String,
    pub base_url: String,
    pub insight_max_tokens: u32,
    pub article_max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
    #[serde(default = "default_json_logs")]
    pub json_logs: bool,
}

fn default_json_logs() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Secrets loaded exclusively from environment variables.
/// Not serializable, not stored in config files.
pub struct Secrets {
    pub anthropic_api_key: Option<SecretString>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from),
        }
    }
}

impl AppConfig {
    /// Load configuration from the given TOML file, overlaying environment variables for secrets.
    pub fn load(config_path: &Path) -> Result<(Self, Secrets)> {
        dotenvy::dotenv().ok();

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let secrets = Secrets::from_env();

        Ok((config, secrets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let contents = std::fs::read_to_string("config/default.toml")
            .expect("config/default.toml should exist");
        let config: AppConfig = toml::from_str(&contents).expect("should parse");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.writer.template, TemplateVersion::Enhanced);
        assert_eq!(config.writer.default_confidence, 80);
        assert!(config.writer.seed.is_none());
        assert_eq!(config.writer.target_min_chars, 1000);
        assert_eq!(config.writer.target_max_chars, 1500);
        assert_eq!(config.ai.base_url, "https://api.anthropic.com");
        assert_eq!(config.ai.insight_max_tokens, 200);
        assert_eq!(config.database.path, "data/football_writer.db");
    }

    #[test]
    fn test_server_addr() {
        let server = ServerConfig {
            bind: "0.0.0.0".to_string(),
            port: 9000,
            cors_origins: vec![],
        };
        assert_eq!(server.addr(), "0.0.0.0:9000");
    }
}
