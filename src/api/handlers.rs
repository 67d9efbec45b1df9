use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::ai::analyst::AiArticle;
use crate::data::{fixtures, RandomStats};
use crate::db::{
    ExpertRecord, ExpertStats, NewPrediction, PredictionFilter, PredictionRecord,
    PredictionStatus, StatsPeriod,
};
use crate::error::{ApiError, WriterError};
use crate::experts::{
    generate_comprehensive_analysis, generate_expert_article, ComprehensiveAnalysis,
    ExpertArticle, ExpertProfile,
};
use crate::monitoring::HealthReport;
use crate::writer::article::LengthTarget;
use crate::writer::sections::predict_score;
use crate::writer::style_guide::StyleGuide;
use crate::writer::{
    HistoricalData, Insight, MatchInfo, OddsInfo, PredictionArticle, PredictionWriter,
    TemplateVersion,
};

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;
const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

/// Success body shared by every route.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
    pub generated_at: DateTime<Utc>,
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(Envelope {
        status: "success",
        data,
        generated_at: Utc::now(),
    }))
}

// --- Request bodies ---

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub match_info: MatchInfo,
    pub odds_info: OddsInfo,
    #[serde(default)]
    pub historical_data: HistoricalData,
    pub expert_confidence: Option<u8>,
    /// Externally supplied opinions. Takes precedence over AI insights.
    #[serde(default)]
    pub api_predictions: Option<Vec<Insight>>,
    pub template: Option<TemplateVersion>,
    #[serde(default = "default_true")]
    pub use_ai: bool,
    pub fixture_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct QuickRequest {
    pub home_team_name: String,
    pub away_team_name: String,
    pub league_name: String,
    pub match_time: String,
    pub venue: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExpertArticleRequest {
    pub match_info: MatchInfo,
    pub odds_info: OddsInfo,
    #[serde(default)]
    pub historical_data: HistoricalData,
    /// Also ask the model for a free-form article in the persona's style.
    #[serde(default)]
    pub use_ai: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub match_info: MatchInfo,
    pub odds_info: Option<OddsInfo>,
}

#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    pub is_correct: bool,
    #[serde(default)]
    pub actual_return: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub expert: Option<String>,
    pub status: Option<PredictionStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    #[serde(default)]
    pub period: StatsPeriod,
}

fn default_true() -> bool {
    true
}

// --- Response bodies ---

#[derive(Debug, Serialize)]
pub struct GeneratedPrediction {
    pub prediction_id: String,
    pub article: PredictionArticle,
}

#[derive(Debug, Serialize)]
pub struct GeneratedExpertArticle {
    pub prediction_id: String,
    pub article: ExpertArticle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_article: Option<AiArticle>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedAnalysis {
    pub prediction_id: String,
    pub analysis: ComprehensiveAnalysis,
}

#[derive(Debug, Serialize)]
pub struct PredictionPage {
    pub items: Vec<PredictionRecord>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct ExpertSummary {
    pub key: &'static str,
    pub name: &'static str,
    pub nickname: &'static str,
    pub bio: &'static str,
    pub avatar_url: &'static str,
    pub expertise: &'static str,
    pub writing_style: &'static str,
    pub win_rate: f64,
    pub avg_return: f64,
    pub followers_count: u32,
}

impl From<&ExpertProfile> for ExpertSummary {
    fn from(p: &ExpertProfile) -> Self {
        Self {
            key: p.key,
            name: p.name,
            nickname: p.nickname,
            bio: p.bio,
            avatar_url: p.avatar_url,
            expertise: p.primary_expertise.as_str(),
            writing_style: p.writing_style.as_str(),
            win_rate: p.win_rate,
            avg_return: p.avg_return,
            followers_count: p.followers_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    #[serde(flatten)]
    pub report: HealthReport,
    pub ai_enabled: bool,
    pub experts: usize,
    pub total_api_cost: Decimal,
}

// --- Helpers ---

impl AppState {
    fn prediction_writer(&self, template: Option<TemplateVersion>) -> PredictionWriter {
        PredictionWriter::new(template.unwrap_or(self.writer.template)).with_target(self.length_target())
    }

    fn length_target(&self) -> LengthTarget {
        LengthTarget {
            min_chars: self.writer.target_min_chars,
            max_chars: self.writer.target_max_chars,
        }
    }

    fn stats(&self) -> RandomStats {
        RandomStats::new(self.writer.seed)
    }

    fn profile(&self, key: &str) -> Result<&ExpertProfile, ApiError> {
        self.catalog
            .get(key)
            .ok_or_else(|| ApiError::NotFound(format!("Expert {key}")))
    }

    /// Write a prediction article and store it.
    async fn write_and_store(
        &self,
        m: &MatchInfo,
        odds: &OddsInfo,
        history: &HistoricalData,
        confidence: u8,
        insights: Option<&[Insight]>,
        template: Option<TemplateVersion>,
        fixture_id: Option<i64>,
    ) -> Result<GeneratedPrediction, ApiError> {
        let article = self
            .prediction_writer(template)
            .generate_prediction(m, odds, history, confidence, insights);

        let rec = &article.recommendation;
        let odds_value = to_decimal(rec.odds);
        let prediction = NewPrediction {
            fixture_id,
            expert_id: None,
            home_team: m.home_team.name.clone(),
            away_team: m.away_team.name.clone(),
            league: m.league.clone(),
            match_time: m.match_time.clone(),
            prediction_type: rec.bet_type.clone(),
            predicted_outcome: rec.selection.clone(),
            predicted_score: article.predicted_score.clone(),
            confidence: article.confidence,
            stake_level: rec.stake_suggestion.clone(),
            odds: odds_value,
            potential_return: potential_return(odds_value),
            title: article.title.clone(),
            article: article.full_article.clone(),
            char_count: article.length.chars,
        };
        let prediction_id = self.store.insert_prediction(&prediction).await?;
        self.health.record_article().await;

        info!(
            prediction_id = %prediction_id,
            home = %m.home_team.name,
            away = %m.away_team.name,
            chars = article.length.chars,
            "Prediction generated"
        );
        Ok(GeneratedPrediction {
            prediction_id,
            article,
        })
    }
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

/// Net return of a one-unit winning stake.
fn potential_return(odds: Decimal) -> Decimal {
    if odds > Decimal::ONE {
        (odds - Decimal::ONE).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

// --- Predictions ---

pub async fn health(State(state): State<AppState>) -> ApiResult<ServiceHealth> {
    success(ServiceHealth {
        report: state.health.report().await,
        ai_enabled: state.analyst.is_enabled(),
        experts: state.catalog.len(),
        total_api_cost: state.store.total_api_cost().await?,
    })
}

pub async fn generate_prediction(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<GeneratedPrediction> {
    let insights = match req.api_predictions {
        Some(given) => Some(given),
        None if req.use_ai => state.analyst.match_insights(&req.match_info).await,
        None => None,
    };
    let confidence = req.expert_confidence.unwrap_or(state.writer.default_confidence);

    let generated = state
        .write_and_store(
            &req.match_info,
            &req.odds_info,
            &req.historical_data,
            confidence,
            insights.as_deref(),
            req.template,
            req.fixture_id,
        )
        .await?;
    success(generated)
}

pub async fn quick_prediction(
    State(state): State<AppState>,
    Json(req): Json<QuickRequest>,
) -> ApiResult<GeneratedPrediction> {
    let venue = req.venue.as_deref().unwrap_or(fixtures::QUICK_DEFAULT_VENUE);
    let m = fixtures::quick_match(
        &req.home_team_name,
        &req.away_team_name,
        &req.league_name,
        &req.match_time,
        venue,
    );
    let history = fixtures::quick_history(&req.home_team_name, &req.away_team_name);
    let insights = state.analyst.match_insights(&m).await;

    let generated = state
        .write_and_store(
            &m,
            &fixtures::quick_odds(),
            &history,
            fixtures::QUICK_CONFIDENCE,
            insights.as_deref(),
            None,
            None,
        )
        .await?;
    success(generated)
}

pub async fn demo_prediction(State(state): State<AppState>) -> ApiResult<GeneratedPrediction> {
    let insights = fixtures::demo_insights();
    let generated = state
        .write_and_store(
            &fixtures::demo_match(),
            &fixtures::demo_odds(),
            &fixtures::demo_history(),
            fixtures::DEMO_CONFIDENCE,
            Some(insights.as_slice()),
            None,
            None,
        )
        .await?;
    success(generated)
}

pub async fn style_guide() -> ApiResult<StyleGuide> {
    success(crate::writer::style_guide::style_guide())
}

pub async fn leagues() -> ApiResult<&'static [fixtures::League]> {
    success(fixtures::SUPPORTED_LEAGUES)
}

pub async fn list_predictions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<PredictionPage> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);

    let expert_id = match query.expert.as_deref() {
        Some(key) => {
            let profile = state.profile(key)?;
            match state.store.get_expert_by_key(profile.key).await? {
                Some(record) => Some(record.id),
                // Never materialized, so nothing was written under this persona.
                None => {
                    return success(PredictionPage {
                        items: Vec::new(),
                        total: 0,
                        page,
                        per_page,
                        pages: 0,
                    })
                }
            }
        }
        None => None,
    };

    let filter = PredictionFilter {
        expert_id,
        status: query.status,
    };
    let (items, total) = state.store.list_predictions(&filter, page, per_page).await?;
    let per = i64::from(per_page);
    success(PredictionPage {
        items,
        total,
        page,
        per_page,
        pages: (total + per - 1) / per,
    })
}

pub async fn get_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PredictionRecord> {
    match state.store.get_prediction(&id).await? {
        Some(prediction) => success(prediction),
        None => Err(ApiError::NotFound(format!("Prediction {id}"))),
    }
}

pub async fn settle_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SettleRequest>,
) -> ApiResult<PredictionRecord> {
    if !state
        .store
        .settle_prediction(&id, req.is_correct, req.actual_return)
        .await?
    {
        return Err(ApiError::NotFound(format!("Prediction {id}")));
    }
    info!(prediction_id = %id, is_correct = req.is_correct, "Prediction settled");

    match state.store.get_prediction(&id).await? {
        Some(prediction) => success(prediction),
        None => Err(ApiError::NotFound(format!("Prediction {id}"))),
    }
}

// --- Experts ---

pub async fn list_experts(State(state): State<AppState>) -> ApiResult<Vec<ExpertSummary>> {
    success(state.catalog.all().iter().map(ExpertSummary::from).collect())
}

pub async fn get_expert(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<ExpertProfile> {
    let profile = state.profile(&key)?;
    success(profile.clone())
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Vec<ExpertRecord>> {
    for profile in state.catalog.all() {
        state.store.ensure_expert(profile).await?;
    }
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT).max(1);
    success(state.store.leaderboard(limit).await?)
}

pub async fn expert_stats(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<ExpertStats> {
    let profile = state.profile(&key)?;
    let record = state.store.ensure_expert(profile).await?;
    success(state.store.expert_stats(&record.id, query.period).await?)
}

pub async fn expert_article(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ExpertArticleRequest>,
) -> ApiResult<GeneratedExpertArticle> {
    let m = &req.match_info;
    let article = generate_expert_article(
        &state.catalog,
        &key,
        m,
        &req.odds_info,
        &req.historical_data,
        &mut state.stats(),
        &state.length_target(),
    )?;
    let profile = state.profile(&key)?;
    let ai_article = if req.use_ai {
        Some(
            state
                .analyst
                .write_article(m, Some(profile.writing_style.as_str()))
                .await,
        )
    } else {
        None
    };

    let expert = state.store.ensure_expert(profile).await?;
    let odds = to_decimal(req.odds_info.home_win);
    let prediction = NewPrediction {
        fixture_id: None,
        expert_id: Some(expert.id),
        home_team: m.home_team.name.clone(),
        away_team: m.away_team.name.clone(),
        league: m.league.clone(),
        match_time: m.match_time.clone(),
        prediction_type: profile.primary_expertise.as_str().to_string(),
        predicted_outcome: article.betting_advice.primary_bet.clone(),
        predicted_score: predict_score(m.home_team.league_position, m.away_team.league_position)
            .to_string(),
        confidence: article.confidence,
        stake_level: article.betting_advice.stake.clone(),
        odds,
        potential_return: potential_return(odds),
        title: article.title.clone(),
        article: article.full_article.clone(),
        char_count: article.length.chars,
    };
    let prediction_id = state.store.insert_prediction(&prediction).await?;
    state.health.record_article().await;

    info!(prediction_id = %prediction_id, expert = %key, "Expert article generated");
    success(GeneratedExpertArticle {
        prediction_id,
        article,
        ai_article,
    })
}

pub async fn expert_analysis(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<AnalysisRequest>,
) -> ApiResult<GeneratedAnalysis> {
    let profile = state
        .catalog
        .get(&key)
        .ok_or_else(|| WriterError::UnknownExpert(key.clone()))?;
    let m = &req.match_info;
    let analysis =
        generate_comprehensive_analysis(profile, m, req.odds_info.as_ref(), &mut state.stats());

    let expert = state.store.ensure_expert(profile).await?;
    let primary = analysis.recommendations.first();
    let odds = to_decimal(primary.map_or(0.0, |r| r.odds));
    let prediction = NewPrediction {
        fixture_id: None,
        expert_id: Some(expert.id),
        home_team: m.home_team.name.clone(),
        away_team: m.away_team.name.clone(),
        league: m.league.clone(),
        match_time: m.match_time.clone(),
        prediction_type: "comprehensive".to_string(),
        predicted_outcome: primary.map(|r| r.bet.clone()).unwrap_or_default(),
        predicted_score: predict_score(m.home_team.league_position, m.away_team.league_position)
            .to_string(),
        confidence: (analysis.confidence_level * 100.0).round() as u8,
        stake_level: primary.map(|r| r.stake.clone()).unwrap_or_default(),
        odds,
        potential_return: potential_return(odds),
        title: analysis.title.clone(),
        article: analysis.content.clone(),
        char_count: analysis.word_count,
    };
    let prediction_id = state.store.insert_prediction(&prediction).await?;
    state.health.record_article().await;

    info!(
        prediction_id = %prediction_id,
        expert = %key,
        chars = analysis.word_count,
        "Comprehensive analysis generated"
    );
    success(GeneratedAnalysis {
        prediction_id,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_potential_return() {
        assert_eq!(potential_return(dec!(2.28)), dec!(1.28));
        assert_eq!(potential_return(dec!(1)), Decimal::ZERO);
        assert_eq!(potential_return(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_settle_request_parses_decimal_string() {
        let req: SettleRequest =
            serde_json::from_str(r#"{"is_correct": true, "actual_return": "1.28"}"#).unwrap();
        assert_eq!(req.actual_return, Some(dec!(1.28)));

        let req: SettleRequest = serde_json::from_str(r#"{"is_correct": false}"#).unwrap();
        assert!(req.actual_return.is_none());
    }

    #[test]
    fn test_generate_request_defaults() {
        let body = serde_json::json!({
            "match_info": crate::data::fixtures::sample_match(),
            "odds_info": crate::data::fixtures::sample_odds(),
        });
        let req: GenerateRequest = serde_json::from_value(body).unwrap();
        assert!(req.use_ai);
        assert!(req.expert_confidence.is_none());
        assert!(req.historical_data.h2h_results.is_empty());
    }
}
