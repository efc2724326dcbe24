use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::{Result, TrendAnalysisError};
use crate::models::{AnalysisOutcome, AnalysisResult, ChartPoint, DegradeReason, WebSource};
use crate::services::gemini::{GenerationOptions, GenerativeModel};
use crate::services::normalizer::{extract_web_sources, parse_content, NormalizedContent};
use crate::services::prompt::build_analysis_prompt;
use crate::services::synthesizer::{derive_metrics, generate_chart_data, synthetic_volatility};

/// Проверяет тему анализа и возвращает её без крайних пробелов.
pub fn validate_topic(topic: &str) -> Result<String> {
    let trimmed = topic.trim();
    if trimmed.is_empty() {
        return Err(TrendAnalysisError::InvalidTopic(
            "тема не может быть пустой".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Clone)]
pub struct TrendAnalysisService {
    model: Arc<dyn GenerativeModel>,
    rng: Arc<Mutex<StdRng>>,
}

impl TrendAnalysisService {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        TrendAnalysisService {
            model,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Детерминированный генератор для воспроизводимых графиков.
    pub fn with_seed(model: Arc<dyn GenerativeModel>, seed: u64) -> Self {
        TrendAnalysisService {
            model,
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Всегда возвращает готовый к отображению результат.
    pub async fn analyze(&self, topic: &str) -> AnalysisResult {
        self.analyze_detailed(topic).await.into_result()
    }

    pub async fn analyze_detailed(&self, topic: &str) -> AnalysisOutcome {
        tracing::info!("Начинаем анализ темы «{}»", topic);

        let prompt = build_analysis_prompt(topic);
        let options = GenerationOptions { google_search: true };

        let reply = match self.model.generate(&prompt, options).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Модель недоступна: {}", e);
                let result = self
                    .assemble(NormalizedContent::offline(), Vec::new(), false)
                    .await;
                return AnalysisOutcome::Degraded {
                    result,
                    reason: DegradeReason::Transport(e.to_string()),
                };
            }
        };

        let web_sources = extract_web_sources(reply.grounding_metadata.as_ref());

        match parse_content(reply.text.as_deref()) {
            Ok(content) => {
                let result = self.assemble(content, web_sources, true).await;
                tracing::info!(
                    "Анализ темы «{}» завершён: {} источников, настроение {:.2}",
                    topic,
                    result.web_sources.len(),
                    result.metrics.sentiment_score
                );
                AnalysisOutcome::Ok(result)
            }
            Err(e) => {
                tracing::warn!("Не удалось разобрать ответ модели: {}", e);
                tracing::debug!("Сырой ответ: {:?}", reply.text);
                let result = self
                    .assemble(NormalizedContent::unreadable(), web_sources, true)
                    .await;
                AnalysisOutcome::Degraded {
                    result,
                    reason: DegradeReason::MalformedResponse(e.to_string()),
                }
            }
        }
    }

    // График строится всегда; волатильность только если модель ответила
    async fn assemble(
        &self,
        content: NormalizedContent,
        web_sources: Vec<WebSource>,
        model_answered: bool,
    ) -> AnalysisResult {
        let (chart_data, volatility) = self.synthesize(model_answered).await;
        let metrics = derive_metrics(&chart_data, content.sentiment_score, volatility);

        AnalysisResult {
            summary: content.summary,
            intelligence: content.intelligence,
            key_sources: content.key_sources,
            keywords: content.keywords,
            poem: content.poem,
            historical_analogy: content.historical_analogy,
            metrics,
            chart_data,
            web_sources,
            image_url: content.image_url,
        }
    }

    async fn synthesize(&self, with_volatility: bool) -> (Vec<ChartPoint>, u32) {
        let mut rng = self.rng.lock().await;
        let chart = generate_chart_data(&mut *rng, &Local::now());
        let volatility = if with_volatility {
            synthetic_volatility(&mut *rng)
        } else {
            0
        };
        (chart, volatility)
    }
}
