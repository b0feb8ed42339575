use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::analyzer::{AnalysisError, AnalysisResult, JourneyAnalyzer};
use crate::config::AnalyzerConfig;
use crate::history::{History, HistoryEntry, HistoryFilter};
use crate::journey::EmotionalState;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<JourneyAnalyzer>,
    pub history: Arc<History>,
}

impl AppState {
    pub fn new(analyzer: JourneyAnalyzer, history_capacity: usize) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            history: Arc::new(History::with_capacity(history_capacity)),
        }
    }

    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        Self::new(JourneyAnalyzer::from_config(cfg), cfg.history_capacity)
    }

    /// Config from `ANALYZER_CONFIG_PATH` (or defaults).
    pub fn from_env() -> Self {
        Self::from_config(&AnalyzerConfig::from_env())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/analyze", post(analyze))
        .route("/batch", post(analyze_batch))
        .route("/history", get(history))
        .route("/history/{id}", get(history_by_id))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
pub struct AnalyzeReq {
    #[serde(default)]
    pub text: Option<Value>,
}

impl AnalyzeReq {
    /// Only a JSON string counts as text; any other type is missing input.
    pub fn into_text(self) -> Option<String> {
        match self.text {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// Run one analysis off the async runtime (oracle/translator may block).
async fn run_blocking(state: &AppState, text: Option<String>) -> AnalysisResult {
    let analyzer = state.analyzer.clone();
    let history = state.history.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let result = analyzer.analyze(text.as_deref());
        history.push(text.as_deref().unwrap_or_default(), &result);
        result
    })
    .await;

    joined.unwrap_or_else(|e| {
        warn!(target: "journey", error = %e, "analysis task failed");
        AnalysisResult::failed("Error processing sentiment analysis")
    })
}

/// 200 with the result; 400 with the error record when analysis failed.
/// A body that is not a JSON object is analyzed as missing input.
async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeReq>, JsonRejection>,
) -> (StatusCode, Json<AnalysisResult>) {
    let text = match body {
        Ok(Json(req)) => req.into_text(),
        Err(e) => {
            warn!(target: "journey", error = %e, "rejected /analyze body");
            None
        }
    };
    let result = run_blocking(&state, text).await;
    let status = if result.is_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (status, Json(result))
}

/// Independent pipelines per transcript; results keep input order.
/// Malformed items get the missing-input record; a body that is not a JSON
/// array is a 400 with a single error record.
async fn analyze_batch(
    State(state): State<AppState>,
    body: Result<Json<Vec<Value>>, JsonRejection>,
) -> (StatusCode, Json<Vec<AnalysisResult>>) {
    let items = match body {
        Ok(Json(items)) => items,
        Err(e) => {
            warn!(target: "journey", error = %e, "rejected /batch body");
            return (
                StatusCode::BAD_REQUEST,
                Json(vec![AnalysisResult::from_error(&AnalysisError::MissingInput)]),
            );
        }
    };

    let tasks: Vec<_> = items
        .into_iter()
        .map(|item| {
            let text = serde_json::from_value::<AnalyzeReq>(item)
                .ok()
                .and_then(AnalyzeReq::into_text);
            let state = state.clone();
            tokio::spawn(async move { run_blocking(&state, text).await })
        })
        .collect();

    let mut out = Vec::with_capacity(tasks.len());
    for t in tasks {
        out.push(
            t.await
                .unwrap_or_else(|_| AnalysisResult::failed("Error processing sentiment analysis")),
        );
    }
    (StatusCode::OK, Json(out))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    pub sentiment: Option<EmotionalState>,
    /// Inclusive unix-seconds bounds on `ts_unix`.
    pub since: Option<u64>,
    pub until: Option<u64>,
}

#[derive(Serialize)]
struct HistoryOut {
    total: usize,
    analyses: Vec<HistoryEntry>,
}

async fn history(State(state): State<AppState>, Query(q): Query<HistoryQuery>) -> Json<HistoryOut> {
    let limit = q.limit.unwrap_or(50).min(500);
    let filter = HistoryFilter {
        sentiment: q.sentiment,
        since: q.since,
        until: q.until,
    };
    Json(HistoryOut {
        total: state.history.len(),
        analyses: state.history.snapshot_last_n(limit, &filter),
    })
}

/// Every stored analysis of the transcript with this fingerprint; 404 if none.
async fn history_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Vec<HistoryEntry>>) {
    let rows = state.history.find_by_id(&id);
    let status = if rows.is_empty() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, Json(rows))
}
