use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "微博")]
    Weibo,
    #[serde(rename = "抖音")]
    Douyin,
    #[serde(rename = "快手")]
    Kuaishou,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Weibo, Platform::Douyin, Platform::Kuaishou];

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Weibo => "微博",
            Platform::Douyin => "抖音",
            Platform::Kuaishou => "快手",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weibo" | "微博" => Ok(Platform::Weibo),
            "douyin" | "抖音" => Ok(Platform::Douyin),
            "kuaishou" | "快手" => Ok(Platform::Kuaishou),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendItem {
    pub id: String,
    pub rank: u32,
    pub title: String,
    pub heat: u64,
    pub platform: Platform,
    pub label: String, // "爆", "热", "新"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: String, // "HH:00"
    pub weibo: u64,
    pub douyin: u64,
    pub kuaishou: u64,
}

impl ChartPoint {
    pub fn peak(&self) -> u64 {
        self.weibo.max(self.douyin).max(self.kuaishou)
    }

    pub fn total(&self) -> u64 {
        self.weibo + self.douyin + self.kuaishou
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetrics {
    pub peak_value: u64,
    pub volatility: u32,      // синтетическая оценка 40..80, 0 при отказе транспорта
    pub sentiment_score: f64, // -1.0 to 1.0
    pub total_mentions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub intelligence: String,
    pub key_sources: Vec<String>,
    pub keywords: Vec<String>,
    pub poem: String,
    pub historical_analogy: String,
    pub metrics: AnalysisMetrics,
    pub chart_data: Vec<ChartPoint>,
    pub web_sources: Vec<WebSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Причина, по которой вместо настоящего анализа отдан запасной результат.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DegradeReason {
    Transport(String),
    MalformedResponse(String),
}

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradeReason::Transport(msg) => write!(f, "transport failure: {}", msg),
            DegradeReason::MalformedResponse(msg) => write!(f, "malformed model response: {}", msg),
        }
    }
}

#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Ok(AnalysisResult),
    Degraded {
        result: AnalysisResult,
        reason: DegradeReason,
    },
}

impl AnalysisOutcome {
    pub fn result(&self) -> &AnalysisResult {
        match self {
            AnalysisOutcome::Ok(result) => result,
            AnalysisOutcome::Degraded { result, .. } => result,
        }
    }

    pub fn reason(&self) -> Option<&DegradeReason> {
        match self {
            AnalysisOutcome::Ok(_) => None,
            AnalysisOutcome::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.reason().is_some()
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            AnalysisOutcome::Ok(result) => result,
            AnalysisOutcome::Degraded { result, .. } => result,
        }
    }
}
