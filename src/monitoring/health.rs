//! Service health state.
//!
//! Tracks uptime and generation counters, served as JSON by `GET /api/health`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// Shared health state updated by the generation handlers.
#[derive(Clone)]
pub struct HealthState {
    inner: Arc<RwLock<HealthData>>,
}

#[derive(Debug, Clone, Serialize)]
struct HealthData {
    status: String,
    articles_generated: u64,
    ai_fallbacks: u64,
    started_at: DateTime<Utc>,
    last_article_at: Option<DateTime<Utc>>,
}

/// Point-in-time snapshot returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub articles_generated: u64,
    pub ai_fallbacks: u64,
    pub started_at: DateTime<Utc>,
    pub last_article_at: Option<DateTime<Utc>>,
    pub uptime_seconds: i64,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HealthData {
                status: "ok".to_string(),
                articles_generated: 0,
                ai_fallbacks: 0,
                started_at: Utc::now(),
                last_article_at: None,
            })),
        }
    }

    pub async fn record_article(&self) {
        let mut data = self.inner.write().await;
        data.articles_generated += 1;
        data.last_article_at = Some(Utc::now());
    }

    pub async fn record_ai_fallback(&self) {
        self.inner.write().await.ai_fallbacks += 1;
    }

    pub async fn report(&self) -> HealthReport {
        let data = self.inner.read().await;
        HealthReport {
            status: data.status.clone(),
            articles_generated: data.articles_generated,
            ai_fallbacks: data.ai_fallbacks,
            started_at: data.started_at,
            last_article_at: data.last_article_at,
            uptime_seconds: (Utc::now() - data.started_at).num_seconds(),
        }
    }
}
