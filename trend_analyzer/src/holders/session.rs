use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::Result;
use crate::models::{AnalysisOutcome, AnalysisResult, DegradeReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisState {
    Idle,
    Fetching,
    Succeeded,
    Failed,
}

/// Идентификатор запущенного запроса. Результат принимается, только если
/// за время запроса не был запущен более новый.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub generation: u64,
    pub topic: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: AnalysisState,
    pub current_topic: Option<String>,
    pub generation: u64,
    pub last_degrade_reason: Option<DegradeReason>,
}

#[derive(Debug)]
struct SessionInner {
    generation: u64,
    state: AnalysisState,
    topic: Option<String>,
    last_reason: Option<DegradeReason>,
    result: Option<AnalysisResult>,
}

#[derive(Clone)]
pub struct AnalysisSessionHolder {
    inner: Arc<Mutex<SessionInner>>,
}

impl AnalysisSessionHolder {
    pub fn new() -> Self {
        AnalysisSessionHolder {
            inner: Arc::new(Mutex::new(SessionInner {
                generation: 0,
                state: AnalysisState::Idle,
                topic: None,
                last_reason: None,
                result: None,
            })),
        }
    }

    pub async fn begin(&self, topic: &str) -> Result<RequestTicket> {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.state = AnalysisState::Fetching;
        inner.topic = Some(topic.to_string());
        inner.last_reason = None;
        inner.result = None;

        Ok(RequestTicket {
            generation: inner.generation,
            topic: topic.to_string(),
        })
    }

    /// Возвращает `false`, если запрос уже вытеснен более новым.
    pub async fn complete(&self, ticket: &RequestTicket, outcome: &AnalysisOutcome) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        if ticket.generation != inner.generation {
            tracing::info!(
                "Отброшен устаревший результат для «{}» (запрос {}, текущий {})",
                ticket.topic,
                ticket.generation,
                inner.generation
            );
            return Ok(false);
        }

        inner.state = if outcome.is_degraded() {
            AnalysisState::Failed
        } else {
            AnalysisState::Succeeded
        };
        inner.last_reason = outcome.reason().cloned();
        inner.result = Some(outcome.result().clone());
        Ok(true)
    }

    /// Пользователь ушёл с экрана анализа: всё незавершённое отбрасывается.
    pub async fn reset(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.state = AnalysisState::Idle;
        inner.topic = None;
        inner.last_reason = None;
        inner.result = None;
        Ok(())
    }

    pub async fn state(&self) -> Result<AnalysisState> {
        let inner = self.inner.lock().await;
        Ok(inner.state)
    }

    pub async fn current_result(&self) -> Result<Option<AnalysisResult>> {
        let inner = self.inner.lock().await;
        Ok(inner.result.clone())
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let inner = self.inner.lock().await;
        Ok(SessionSnapshot {
            state: inner.state,
            current_topic: inner.topic.clone(),
            generation: inner.generation,
            last_degrade_reason: inner.last_reason.clone(),
        })
    }
}
