pub mod config;
pub mod errors;
pub mod holders;
pub mod models;
pub mod routers;
pub mod services;

pub use config::AppConfig;
pub use errors::{TrendAnalysisError, Result};
pub use holders::{AnalysisSessionHolder, AnalysisState, RequestTicket};
pub use models::{
    AnalysisMetrics, AnalysisOutcome, AnalysisResult, ChartPoint, DegradeReason, Platform,
    TrendItem, WebSource,
};
pub use services::{GeminiClient, GenerativeModel, TrendAnalysisService};
pub use config::load_config;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: TrendAnalysisService,
    pub session: AnalysisSessionHolder,
}
