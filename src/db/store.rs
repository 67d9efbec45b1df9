use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

use crate::experts::ExpertProfile;

const IN_MEMORY: &str = ":memory:";

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExpertRecord {
    pub id: String,
    pub profile_key: String,
    pub name: String,
    pub nickname: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub expertise: String,
    pub win_rate: f64,
    pub avg_return: f64,
    pub followers_count: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PredictionRecord {
    pub id: String,
    pub fixture_id: Option<i64>,
    pub expert_id: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub match_time: String,
    pub prediction_type: String,
    pub predicted_outcome: String,
    pub predicted_score: String,
    pub confidence: i64,
    pub stake_level: String,
    pub odds: String,
    pub potential_return: String,
    pub title: String,
    pub article: String,
    pub char_count: i64,
    pub is_correct: Option<bool>,
    pub actual_return: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Fields supplied by the caller when persisting a generated article.
#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub fixture_id: Option<i64>,
    pub expert_id: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub match_time: String,
    pub prediction_type: String,
    pub predicted_outcome: String,
    pub predicted_score: String,
    pub confidence: u8,
    pub stake_level: String,
    pub odds: Decimal,
    pub potential_return: Decimal,
    pub title: String,
    pub article: String,
    pub char_count: usize,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApiCostRecord {
    pub id: Option<i64>,
    pub provider: String,
    pub endpoint: Option<String>,
    pub input_tokens: Option<i64>,
    pub output_tokens: Option<i64>,
    pub cost: String,
    pub created_at: Option<String>,
}

/// Settlement state filter for prediction listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Pending,
    Correct,
    Incorrect,
}

impl PredictionStatus {
    fn clause(self) -> &'static str {
        match self {
            PredictionStatus::Pending => "is_correct IS NULL",
            PredictionStatus::Correct => "is_correct = 1",
            PredictionStatus::Incorrect => "is_correct = 0",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PredictionFilter {
    pub expert_id: Option<String>,
    pub status: Option<PredictionStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Week,
    Month,
    #[default]
    All,
}

impl StatsPeriod {
    /// SQLite `datetime('now', ?)` modifier for the window start.
    fn modifier(self) -> Option<&'static str> {
        match self {
            StatsPeriod::Week => Some("-7 days"),
            StatsPeriod::Month => Some("-30 days"),
            StatsPeriod::All => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpertStats {
    pub expert_id: String,
    pub period: StatsPeriod,
    pub total_predictions: i64,
    pub successful_predictions: i64,
    /// Percent of all predictions in the window that were settled correct.
    pub win_rate: f64,
    /// Mean `actual_return` over settled predictions.
    pub avg_return: f64,
}

impl Store {
    pub async fn new(database_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{database_path}"))
            .context("Invalid database path")?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        // Every in-memory connection is its own database.
        let max_connections = if database_path == IN_MEMORY { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        let migration_sql = include_str!("../../migrations/001_init.sql");
        for statement in migration_sql.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .with_context(|| format!("Failed to execute migration: {trimmed}"))?;
            }
        }
        Ok(())
    }

    // --- Expert operations ---

    /// Materialize a catalog persona, returning the existing row when present.
    pub async fn ensure_expert(&self, profile: &ExpertProfile) -> Result<ExpertRecord> {
        sqlx::query(
            "INSERT OR IGNORE INTO experts (id, profile_key, name, nickname, avatar_url, bio, expertise, win_rate, avg_return, followers_count)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(profile.key)
        .bind(profile.name)
        .bind(profile.nickname)
        .bind(profile.avatar_url)
        .bind(profile.bio)
        .bind(profile.primary_expertise.as_str())
        .bind(profile.win_rate)
        .bind(profile.avg_return)
        .bind(i64::from(profile.followers_count))
        .execute(&self.pool)
        .await
        .context("Failed to insert expert")?;

        self.get_expert_by_key(profile.key)
            .await?
            .with_context(|| format!("Expert row missing after insert: {}", profile.key))
    }

    pub async fn get_expert_by_key(&self, profile_key: &str) -> Result<Option<ExpertRecord>> {
        let expert = sqlx::query_as::<_, ExpertRecord>("SELECT * FROM experts WHERE profile_key = ?")
            .bind(profile_key)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch expert")?;
        Ok(expert)
    }

    /// Materialized experts ordered by win rate.
    pub async fn leaderboard(&self, limit: i64) -> Result<Vec<ExpertRecord>> {
        let experts = sqlx::query_as::<_, ExpertRecord>(
            "SELECT * FROM experts ORDER BY win_rate DESC, profile_key LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch leaderboard")?;
        Ok(experts)
    }

    pub async fn expert_stats(&self, expert_id: &str, period: StatsPeriod) -> Result<ExpertStats> {
        let row: (i64, Option<i64>, Option<f64>) = sqlx::query_as(
            "SELECT COUNT(*),
                    SUM(CASE WHEN is_correct = 1 THEN 1 ELSE 0 END),
                    AVG(CAST(actual_return AS REAL))
             FROM predictions
             WHERE expert_id = ?1 AND (?2 IS NULL OR created_at >= datetime('now', ?2))",
        )
        .bind(expert_id)
        .bind(period.modifier())
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute expert stats")?;

        let (total, correct, avg_return) = (row.0, row.1.unwrap_or(0), row.2.unwrap_or(0.0));
        let win_rate = if total > 0 {
            correct as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Ok(ExpertStats {
            expert_id: expert_id.to_string(),
            period,
            total_predictions: total,
            successful_predictions: correct,
            win_rate,
            avg_return,
        })
    }

    // --- Prediction operations ---

    pub async fn insert_prediction(&self, prediction: &NewPrediction) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO predictions (id, fixture_id, expert_id, home_team, away_team, league, match_time, prediction_type, predicted_outcome, predicted_score, confidence, stake_level, odds, potential_return, title, article, char_count)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(prediction.fixture_id)
        .bind(&prediction.expert_id)
        .bind(&prediction.home_team)
        .bind(&prediction.away_team)
        .bind(&prediction.league)
        .bind(&prediction.match_time)
        .bind(&prediction.prediction_type)
        .bind(&prediction.predicted_outcome)
        .bind(&prediction.predicted_score)
        .bind(i64::from(prediction.confidence))
        .bind(&prediction.stake_level)
        .bind(prediction.odds.to_string())
        .bind(prediction.potential_return.to_string())
        .bind(&prediction.title)
        .bind(&prediction.article)
        .bind(i64::try_from(prediction.char_count).unwrap_or(i64::MAX))
        .execute(&self.pool)
        .await
        .context("Failed to insert prediction")?;

        tracing::debug!(id = %id, prediction_type = %prediction.prediction_type, "Prediction stored");
        Ok(id)
    }

    pub async fn get_prediction(&self, id: &str) -> Result<Option<PredictionRecord>> {
        let prediction = sqlx::query_as::<_, PredictionRecord>("SELECT * FROM predictions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch prediction")?;
        Ok(prediction)
    }

    /// One page of predictions, newest first, plus the total matching count.
    pub async fn list_predictions(
        &self,
        filter: &PredictionFilter,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<PredictionRecord>, i64)> {
        let status = filter.status.map_or("1 = 1", PredictionStatus::clause);
        let condition = format!("(?1 IS NULL OR expert_id = ?1) AND {status}");

        let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM predictions WHERE {condition}"))
            .bind(&filter.expert_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count predictions")?;

        let per_page = i64::from(per_page.max(1));
        let offset = i64::from(page.max(1) - 1) * per_page;
        let rows = sqlx::query_as::<_, PredictionRecord>(&format!(
            "SELECT * FROM predictions WHERE {condition}
             ORDER BY created_at DESC, rowid DESC LIMIT ?2 OFFSET ?3"
        ))
        .bind(&filter.expert_id)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list predictions")?;

        Ok((rows, total.0))
    }

    /// Record the outcome of a prediction. Returns false when the id is unknown.
    pub async fn settle_prediction(
        &self,
        id: &str,
        is_correct: bool,
        actual_return: Option<Decimal>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE predictions SET is_correct = ?, actual_return = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(is_correct)
        .bind(actual_return.map(|d| d.to_string()))
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to settle prediction")?;
        Ok(result.rows_affected() > 0)
    }

    // --- API cost operations ---

    pub async fn insert_api_cost(&self, cost: &ApiCostRecord) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO api_costs (provider, endpoint, input_tokens, output_tokens, cost)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&cost.provider)
        .bind(&cost.endpoint)
        .bind(cost.input_tokens)
        .bind(cost.output_tokens)
        .bind(&cost.cost)
        .execute(&self.pool)
        .await
        .context("Failed to insert API cost")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn total_api_cost(&self) -> Result<Decimal> {
        let row: (Option<String>,) =
            sqlx::query_as("SELECT CAST(SUM(CAST(cost AS REAL)) AS TEXT) FROM api_costs")
                .fetch_one(&self.pool)
                .await
                .context("Failed to get total API cost")?;

        match row.0 {
            Some(s) => Ok(Decimal::from_str(&s).unwrap_or(Decimal::ZERO)),
            None => Ok(Decimal::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experts::ExpertCatalog;
    use rust_decimal_macros::dec;

    fn prediction(expert_id: Option<String>, home: &str) -> NewPrediction {
        NewPrediction {
            fixture_id: None,
            expert_id,
            home_team: home.to_string(),
            away_team: "京都不死鸟".to_string(),
            league: "J联赛".to_string(),
            match_time: "2025-08-16 18:00".to_string(),
            prediction_type: "asian_handicap".to_string(),
            predicted_outcome: "主队-0.5 主队".to_string(),
            predicted_score: "2-1 或 1-0".to_string(),
            confidence: 85,
            stake_level: "3-4单位".to_string(),
            odds: dec!(2.28),
            potential_return: dec!(1.28),
            title: "标题".to_string(),
            article: "正文".to_string(),
            char_count: 2,
        }
    }

    #[tokio::test]
    async fn test_store_create_and_migrate() {
        let store = Store::new(":memory:").await.expect("should create store");
        assert_eq!(store.total_api_cost().await.unwrap(), Decimal::ZERO);
        let (rows, total) = store
            .list_predictions(&PredictionFilter::default(), 1, 20)
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_ensure_expert_is_idempotent() {
        let store = Store::new(":memory:").await.unwrap();
        let catalog = ExpertCatalog::builtin();
        let profile = catalog.get("handicap_master").unwrap();

        let first = store.ensure_expert(profile).await.unwrap();
        let second = store.ensure_expert(profile).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.expertise, "asian_handicap");
        assert_eq!(first.followers_count, 18765);
    }

    #[tokio::test]
    async fn test_prediction_insert_get_and_settle() {
        let store = Store::new(":memory:").await.unwrap();
        let id = store.insert_prediction(&prediction(None, "东京FC")).await.unwrap();

        let row = store.get_prediction(&id).await.unwrap().expect("row");
        assert_eq!(row.home_team, "东京FC");
        assert_eq!(row.confidence, 85);
        assert_eq!(row.odds, "2.28");
        assert!(row.is_correct.is_none());

        assert!(store.settle_prediction(&id, true, Some(dec!(1.28))).await.unwrap());
        let row = store.get_prediction(&id).await.unwrap().expect("row");
        assert_eq!(row.is_correct, Some(true));
        assert_eq!(row.actual_return.as_deref(), Some("1.28"));

        assert!(!store.settle_prediction("missing", false, None).await.unwrap());
        assert!(store.get_prediction("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let store = Store::new(":memory:").await.unwrap();
        let catalog = ExpertCatalog::builtin();
        let expert = store.ensure_expert(catalog.get("data_wizard").unwrap()).await.unwrap();

        let mut ids = Vec::new();
        for i in 0..5 {
            let p = prediction(Some(expert.id.clone()), &format!("主队{i}"));
            ids.push(store.insert_prediction(&p).await.unwrap());
        }
        store.insert_prediction(&prediction(None, "无名")).await.unwrap();
        store.settle_prediction(&ids[0], true, Some(dec!(1.5))).await.unwrap();
        store.settle_prediction(&ids[1], false, Some(dec!(-1))).await.unwrap();

        let all = PredictionFilter::default();
        let (rows, total) = store.list_predictions(&all, 1, 4).await.unwrap();
        assert_eq!(total, 6);
        assert_eq!(rows.len(), 4);
        let (rows, _) = store.list_predictions(&all, 2, 4).await.unwrap();
        assert_eq!(rows.len(), 2);

        let by_expert = PredictionFilter {
            expert_id: Some(expert.id.clone()),
            status: None,
        };
        assert_eq!(store.list_predictions(&by_expert, 1, 20).await.unwrap().1, 5);

        let pending = PredictionFilter {
            expert_id: Some(expert.id.clone()),
            status: Some(PredictionStatus::Pending),
        };
        assert_eq!(store.list_predictions(&pending, 1, 20).await.unwrap().1, 3);

        let correct = PredictionFilter {
            expert_id: None,
            status: Some(PredictionStatus::Correct),
        };
        let (rows, total) = store.list_predictions(&correct, 1, 20).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, ids[0]);
    }

    #[tokio::test]
    async fn test_expert_stats() {
        let store = Store::new(":memory:").await.unwrap();
        let catalog = ExpertCatalog::builtin();
        let expert = store.ensure_expert(catalog.get("goal_prophet").unwrap()).await.unwrap();

        let empty = store.expert_stats(&expert.id, StatsPeriod::All).await.unwrap();
        assert_eq!(empty.total_predictions, 0);
        assert_eq!(empty.win_rate, 0.0);

        let a = store.insert_prediction(&prediction(Some(expert.id.clone()), "甲")).await.unwrap();
        let b = store.insert_prediction(&prediction(Some(expert.id.clone()), "乙")).await.unwrap();
        store.insert_prediction(&prediction(Some(expert.id.clone()), "丙")).await.unwrap();
        store.insert_prediction(&prediction(Some(expert.id.clone()), "丁")).await.unwrap();
        store.settle_prediction(&a, true, Some(dec!(2))).await.unwrap();
        store.settle_prediction(&b, false, Some(dec!(-1))).await.unwrap();

        let stats = store.expert_stats(&expert.id, StatsPeriod::Week).await.unwrap();
        assert_eq!(stats.total_predictions, 4);
        assert_eq!(stats.successful_predictions, 1);
        assert!((stats.win_rate - 25.0).abs() < 1e-9);
        assert!((stats.avg_return - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_leaderboard_orders_by_win_rate() {
        let store = Store::new(":memory:").await.unwrap();
        let catalog = ExpertCatalog::builtin();
        for expert in catalog.all() {
            store.ensure_expert(expert).await.unwrap();
        }
        let top = store.leaderboard(3).await.unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].profile_key, "handicap_master");
        assert_eq!(top[1].profile_key, "data_wizard");
        assert_eq!(top[2].profile_key, "value_hunter");
    }

    #[tokio::test]
    async fn test_api_cost_total() {
        let store = Store::new(":memory:").await.unwrap();
        for cost in ["0.0105", "0.36"] {
            let record = ApiCostRecord {
                id: None,
                provider: "anthropic".to_string(),
                endpoint: Some("messages".to_string()),
                input_tokens: Some(1000),
                output_tokens: Some(500),
                cost: cost.to_string(),
                created_at: None,
            };
            assert!(store.insert_api_cost(&record).await.unwrap() > 0);
        }
        assert_eq!(store.total_api_cost().await.unwrap(), dec!(0.3705));
    }
}
