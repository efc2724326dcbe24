use anyhow::Result;
use config::Config;
use std::env;

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Clone, Debug, serde::Deserialize)]
pub struct AppConfig {
    pub gemini_api_url: String,
    #[serde(default)]
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub request_timeout_secs: Option<u64>,
    pub bind_address: String,
    pub log_dir: Option<String>,
}

impl AppConfig {
    /// Валидация конфигурации
    pub fn validate(&self) -> Result<()> {
        if self.gemini_api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("Gemini API key cannot be empty"));
        }

        if self.gemini_model.trim().is_empty() {
            return Err(anyhow::anyhow!("Gemini model name cannot be empty"));
        }

        if !self.gemini_api_url.starts_with("http") {
            return Err(anyhow::anyhow!("gemini_api_url must be an http(s) URL"));
        }

        if let Some(timeout) = self.request_timeout_secs {
            if timeout == 0 || timeout > 600 {
                return Err(anyhow::anyhow!("request_timeout_secs must be between 1 and 600"));
            }
        }

        Ok(())
    }
}

pub fn load_config() -> Result<AppConfig> {
    // Загружаем .env файл
    dotenvy::dotenv().ok();

    let settings = Config::builder()
        .set_default("gemini_api_url", DEFAULT_GEMINI_API_URL)?
        .set_default("gemini_model", DEFAULT_GEMINI_MODEL)?
        .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("TREND_ANALYZER"))
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // Ключ никогда не хранится в файле конфигурации
    config.gemini_api_key = env::var("GEMINI_API_KEY")
        .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable is required"))?;

    config.validate()?;

    Ok(config)
}
