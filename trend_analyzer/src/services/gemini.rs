use futures::future::BoxFuture;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::{Result, TrendAnalysisError};

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationOptions {
    pub google_search: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

/// Сырой ответ модели: текст и метаданные поиска, без интерпретации.
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub text: Option<String>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Генеративная модель, к которой обращается конвейер анализа.
/// Конкретный клиент создаётся в `main` и передаётся в сервис.
pub trait GenerativeModel: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        options: GenerationOptions,
    ) -> BoxFuture<'a, Result<ModelReply>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

// Берём первого кандидата: текст всех частей и метаданные поиска
fn reply_from_response(response: GenerateContentResponse) -> ModelReply {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return ModelReply::default();
    };

    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    ModelReply {
        text: if texts.is_empty() { None } else { Some(texts.concat()) },
        grounding_metadata: candidate.grounding_metadata,
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(GeminiClient {
            client: builder.build()?,
            api_url: config.gemini_api_url.trim_end_matches('/').to_string(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_url,
            self.model,
            urlencoding::encode(&self.api_key)
        )
    }

    fn build_request_body(prompt: &str, options: GenerationOptions) -> Value {
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        if options.google_search {
            body["tools"] = json!([{ "googleSearch": {} }]);
        }

        body
    }

    async fn generate_content(&self, prompt: &str, options: GenerationOptions) -> Result<ModelReply> {
        let body = Self::build_request_body(prompt, options);

        tracing::info!("Запрос к модели {} (поиск: {})", self.model, options.google_search);

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Неизвестная ошибка".to_string());
            return Err(TrendAnalysisError::ApiError(format!(
                "Gemini API error: {} - {}",
                status, error_text
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let reply = reply_from_response(parsed);

        tracing::debug!(
            "Ответ модели: {} символов, источников поиска: {}",
            reply.text.as_deref().map_or(0, str::len),
            reply
                .grounding_metadata
                .as_ref()
                .map_or(0, |m| m.grounding_chunks.len())
        );
        Ok(reply)
    }
}

impl GenerativeModel for GeminiClient {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        options: GenerationOptions,
    ) -> BoxFuture<'a, Result<ModelReply>> {
        Box::pin(self.generate_content(prompt, options))
    }
}
