pub mod analyzer;
pub mod gemini;
pub mod hot_list;
pub mod normalizer;
pub mod prompt;
pub mod synthesizer;

pub use analyzer::{validate_topic, TrendAnalysisService};
pub use gemini::{GeminiClient, GenerationOptions, GenerativeModel, GroundingMetadata, ModelReply};
pub use hot_list::get_hot_list;
