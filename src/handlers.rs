use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::index::{CorpusStats, LineMatches, MostRepeated, QueryError, TextIndex};
use crate::tokenize::normalize;

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<TextIndex>,
    pub max_results: usize,
}

#[derive(Deserialize)]
pub struct WordQuery {
    pub word: Option<String>,
}

#[derive(Deserialize)]
pub struct ThresholdQuery {
    pub min: Option<String>,
}

#[derive(Serialize)]
pub struct FrequencyResponse {
    word: String,
    normalized: String,
    count: usize,
    found: bool,
}

#[derive(Serialize)]
pub struct AboveResponse {
    min: i64,
    total: usize,
    has_more: bool,
    items: Vec<String>,
}

#[derive(Serialize)]
pub struct RepeatedResponse {
    total: usize,
}

#[derive(Serialize)]
pub struct LinesResponse {
    word: String,
    #[serde(flatten)]
    matches: LineMatches,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/frequency", get(frequency))
        .route("/v1/above", get(above))
        .route("/v1/repeated", get(repeated))
        .route("/v1/most-repeated", get(most_repeated))
        .route("/v1/lines", get(lines))
        .route("/v1/stats", get(stats))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn frequency(
    State(state): State<AppState>,
    Query(params): Query<WordQuery>,
) -> Result<Json<FrequencyResponse>, ApiError> {
    let word = params
        .word
        .ok_or_else(|| ApiError::bad_request("word is required"))?;
    let count = match state.index.lookup(&word) {
        Ok(count) => count,
        Err(QueryError::NotFound(_)) => 0,
        Err(err @ QueryError::InvalidInput(_)) => return Err(err.into()),
    };

    Ok(Json(FrequencyResponse {
        normalized: normalize(&word),
        word,
        count,
        found: count > 0,
    }))
}

async fn above(
    State(state): State<AppState>,
    Query(params): Query<ThresholdQuery>,
) -> Result<Json<AboveResponse>, ApiError> {
    let raw_min = params
        .min
        .ok_or_else(|| ApiError::bad_request("min is required"))?;
    let min: i64 = raw_min
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("min must be an integer, got {raw_min:?}")))?;
    let words = state.index.try_words_above_threshold(min)?;
    let total = words.len();
    let items: Vec<String> = words
        .into_iter()
        .take(state.max_results)
        .map(str::to_string)
        .collect();

    Ok(Json(AboveResponse {
        min,
        total,
        has_more: items.len() < total,
        items,
    }))
}

async fn repeated(State(state): State<AppState>) -> Json<RepeatedResponse> {
    Json(RepeatedResponse {
        total: state.index.total_words_repeated_more_than_once(),
    })
}

async fn most_repeated(State(state): State<AppState>) -> Json<MostRepeated> {
    Json(state.index.most_repeated_words())
}

async fn lines(
    State(state): State<AppState>,
    Query(params): Query<WordQuery>,
) -> Result<Json<LinesResponse>, ApiError> {
    let word = params
        .word
        .ok_or_else(|| ApiError::bad_request("word is required"))?;
    let matches = state.index.try_lines_containing(&word)?;
    Ok(Json(LinesResponse {
        word,
        matches,
    }))
}

async fn stats(State(state): State<AppState>) -> Json<CorpusStats> {
    Json(state.index.stats())
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}
