//! HTTP surface: axum router over the writers, the expert catalog and the store.

pub mod handlers;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::ai::AiAnalyst;
use crate::config::{ServerConfig, WriterConfig};
use crate::db::Store;
use crate::experts::ExpertCatalog;
use crate::monitoring::HealthState;

/// Shared state for every route handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ExpertCatalog>,
    pub store: Arc<Store>,
    pub analyst: Arc<AiAnalyst>,
    pub health: HealthState,
    pub writer: WriterConfig,
}

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/predictions", get(handlers::list_predictions))
        .route("/api/predictions/generate", post(handlers::generate_prediction))
        .route("/api/predictions/quick", post(handlers::quick_prediction))
        .route("/api/predictions/demo", post(handlers::demo_prediction))
        .route("/api/predictions/style-guide", get(handlers::style_guide))
        .route("/api/predictions/leagues", get(handlers::leagues))
        .route("/api/predictions/{id}", get(handlers::get_prediction))
        .route("/api/predictions/{id}/settle", post(handlers::settle_prediction))
        .route("/api/experts", get(handlers::list_experts))
        .route("/api/experts/leaderboard", get(handlers::leaderboard))
        .route("/api/experts/{key}", get(handlers::get_expert))
        .route("/api/experts/{key}/stats", get(handlers::expert_stats))
        .route("/api/experts/{key}/article", post(handlers::expert_article))
        .route("/api/experts/{key}/analysis", post(handlers::expert_analysis))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Any origin when none are configured, otherwise the configured list.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

pub async fn serve(state: AppState, server: &ServerConfig) -> anyhow::Result<()> {
    let addr = server.addr();
    let app = router(state, &server.cors_origins);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "API server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
