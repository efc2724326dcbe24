use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tower_http::cors::CorsLayer;

use crate::holders::{AnalysisState, SessionSnapshot};
use crate::models::{AnalysisResult, DegradeReason, Platform, TrendItem};
use crate::services::{get_hot_list, validate_topic};
use crate::AppState;

#[derive(Deserialize)]
pub struct AnalysisRequest {
    pub topic: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub state: AnalysisState,
    pub current_topic: Option<String>,
    pub generation: u64,
    pub last_degrade_reason: Option<DegradeReason>,
    pub available_endpoints: Vec<String>,
}

// Основной обработчик анализа темы
pub async fn analyze_trend(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, StatusCode> {
    let topic = match validate_topic(&req.topic) {
        Ok(topic) => topic,
        Err(e) => {
            tracing::warn!("{}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let ticket = state.session.begin(&topic).await.map_err(internal_error)?;
    let outcome = state.analyzer.analyze_detailed(&topic).await;

    if let Some(reason) = outcome.reason() {
        tracing::warn!("Анализ «{}» вернул запасной результат: {}", topic, reason);
    }

    // Вызывающий всегда получает свой результат, даже вытесненный
    let accepted = state
        .session
        .complete(&ticket, &outcome)
        .await
        .map_err(internal_error)?;
    if accepted {
        tracing::info!("Результат анализа «{}» сохранён", topic);
    }

    Ok(Json(outcome.into_result()))
}

// Последний принятый результат анализа
pub async fn current_analysis(
    State(state): State<AppState>,
) -> Result<Json<AnalysisResult>, StatusCode> {
    match state.session.current_result().await.map_err(internal_error)? {
        Some(result) => Ok(Json(result)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

// Возврат к списку: незавершённые запросы больше не нужны
pub async fn reset_analysis(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    state.session.reset().await.map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn hot_list(Path(platform): Path<String>) -> Result<Json<Vec<TrendItem>>, StatusCode> {
    let platform: Platform = platform.parse().map_err(|e| {
        tracing::warn!("{}", e);
        StatusCode::NOT_FOUND
    })?;

    let mut rng = rand::thread_rng();
    Ok(Json(get_hot_list(platform, &mut rng)))
}

pub async fn hot_lists() -> Json<BTreeMap<&'static str, Vec<TrendItem>>> {
    let mut rng = rand::thread_rng();
    let lists = Platform::ALL
        .into_iter()
        .map(|platform| (platform.display_name(), get_hot_list(platform, &mut rng)))
        .collect();
    Json(lists)
}

// Проверка здоровья сервиса
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Trend Analyzer API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// Получение статуса сервиса
pub async fn get_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    let SessionSnapshot {
        state: analysis_state,
        current_topic,
        generation,
        last_degrade_reason,
    } = state.session.snapshot().await.map_err(internal_error)?;

    Ok(Json(StatusResponse {
        status: "ready".to_string(),
        state: analysis_state,
        current_topic,
        generation,
        last_degrade_reason,
        available_endpoints: vec![
            "/".to_string(),
            "/status".to_string(),
            "/api/hot-lists".to_string(),
            "/api/hot-list/:platform".to_string(),
            "/api/analysis".to_string(),
            "/api/analysis/current".to_string(),
        ],
    }))
}

fn internal_error(e: crate::errors::TrendAnalysisError) -> StatusCode {
    tracing::error!("Внутренняя ошибка: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

// Создание маршрутов
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/status", get(get_status))
        .route("/api/hot-lists", get(hot_lists))
        .route("/api/hot-list/:platform", get(hot_list))
        .route("/api/analysis", post(analyze_trend))
        .route(
            "/api/analysis/current",
            get(current_analysis).delete(reset_analysis),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
