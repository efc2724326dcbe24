use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::{Result, TrendAnalysisError};
use crate::models::WebSource;
use crate::services::gemini::GroundingMetadata;

pub const MAX_WEB_SOURCES: usize = 5;

pub const DEFAULT_SUMMARY: &str = "暂无摘要。";
pub const DEFAULT_INTELLIGENCE: &str = "暂无舆情分析。";
pub const DEFAULT_KEY_SOURCES: [&str; 4] = ["官方通报", "民间舆论", "头部达人", "热搜榜单"];
pub const DEFAULT_POEM: &str = "暂无诗兴";
pub const DEFAULT_HISTORICAL_ANALOGY: &str = "暂无历史类比数据。";

// Заглушка на случай, когда ответ модели не удалось разобрать
pub const UNREADABLE_SUMMARY: &str = "云深不知处，数据暂难寻。";
pub const UNREADABLE_INTELLIGENCE: &str = "网路繁忙，信息如雾里看花。建议稍后重试，以待云开雾散。";
pub const UNREADABLE_KEY_SOURCES: [&str; 2] = ["坊间传闻", "旧籍"];
pub const UNREADABLE_KEYWORDS: [&str; 4] = ["迷雾", "待定", "未知", "虚空"];
pub const UNREADABLE_POEM: &str = "云深山路远，\n信使未归家。\n暂且烹茶候，\n静待落灯花。";
pub const UNREADABLE_HISTORICAL_ANALOGY: &str = "如古时烽火台暂熄，信息传递受阻。";

// Заглушка на случай, когда модель вообще недоступна
pub const OFFLINE_SUMMARY: &str = "系统无法连接至情报核心。";
pub const OFFLINE_INTELLIGENCE: &str = "数据链路受损。";
pub const OFFLINE_KEY_SOURCES: [&str; 1] = ["系统错误"];

/// Текстовая часть результата анализа после подстановки значений по умолчанию.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedContent {
    pub summary: String,
    pub intelligence: String,
    pub key_sources: Vec<String>,
    pub keywords: Vec<String>,
    pub poem: String,
    pub historical_analogy: String,
    pub sentiment_score: f64,
    pub image_url: Option<String>,
}

impl NormalizedContent {
    pub fn unreadable() -> Self {
        NormalizedContent {
            summary: UNREADABLE_SUMMARY.to_string(),
            intelligence: UNREADABLE_INTELLIGENCE.to_string(),
            key_sources: to_strings(&UNREADABLE_KEY_SOURCES),
            keywords: to_strings(&UNREADABLE_KEYWORDS),
            poem: UNREADABLE_POEM.to_string(),
            historical_analogy: UNREADABLE_HISTORICAL_ANALOGY.to_string(),
            sentiment_score: 0.0,
            image_url: None,
        }
    }

    pub fn offline() -> Self {
        NormalizedContent {
            summary: OFFLINE_SUMMARY.to_string(),
            intelligence: OFFLINE_INTELLIGENCE.to_string(),
            key_sources: to_strings(&OFFLINE_KEY_SOURCES),
            keywords: Vec::new(),
            poem: DEFAULT_POEM.to_string(),
            historical_analogy: DEFAULT_HISTORICAL_ANALOGY.to_string(),
            sentiment_score: 0.0,
            image_url: None,
        }
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        NormalizedContent {
            summary: text_field(object, "summary").unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            intelligence: text_field(object, "intelligence")
                .unwrap_or_else(|| DEFAULT_INTELLIGENCE.to_string()),
            key_sources: list_field(object, "keySources")
                .unwrap_or_else(|| to_strings(&DEFAULT_KEY_SOURCES)),
            keywords: list_field(object, "keywords").unwrap_or_default(),
            poem: text_field(object, "poem").unwrap_or_else(|| DEFAULT_POEM.to_string()),
            historical_analogy: text_field(object, "historicalAnalogy")
                .unwrap_or_else(|| DEFAULT_HISTORICAL_ANALOGY.to_string()),
            sentiment_score: object
                .get("sentimentScore")
                .and_then(Value::as_f64)
                .map(clamp_sentiment)
                .unwrap_or(0.0),
            image_url: text_field(object, "extractedImageUrl"),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn list_field(object: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items = object.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Ограничивает оценку настроения диапазоном [-1, 1]; NaN превращается в 0.
pub fn clamp_sentiment(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Убирает маркеры блока кода, которыми модель иногда оборачивает JSON.
pub fn strip_code_fences(text: &str) -> Result<String> {
    let fence_regex = Regex::new(r"```(?:json)?\n?|\n?```")?;
    let cleaned = fence_regex.replace_all(text, "");
    Ok(cleaned.trim().to_string())
}

/// Разбирает текст ответа модели. Отсутствующий текст читается как `{}`.
pub fn parse_content(text: Option<&str>) -> Result<NormalizedContent> {
    let raw = text.filter(|t| !t.trim().is_empty()).unwrap_or("{}");
    let cleaned = strip_code_fences(raw)?;

    let value: Value = serde_json::from_str(&cleaned)?;
    let object = value.as_object().ok_or_else(|| {
        TrendAnalysisError::InvalidDataFormat("ответ модели не является JSON-объектом".to_string())
    })?;

    Ok(NormalizedContent::from_object(object))
}

/// Собирает пары (uri, title) из метаданных поиска в порядке появления.
pub fn extract_web_sources(metadata: Option<&GroundingMetadata>) -> Vec<WebSource> {
    let Some(metadata) = metadata else {
        return Vec::new();
    };

    metadata
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| match (web.uri.as_deref(), web.title.as_deref()) {
            (Some(uri), Some(title)) if !uri.is_empty() && !title.is_empty() => Some(WebSource {
                title: title.to_string(),
                uri: uri.to_string(),
            }),
            _ => None,
        })
        .take(MAX_WEB_SOURCES)
        .collect()
}
