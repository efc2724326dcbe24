use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trend_analyzer::routers::create_routes;
use trend_analyzer::{
    load_config, AnalysisSessionHolder, AppState, GeminiClient, GenerativeModel,
    TrendAnalysisService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    // Настройка структурированного логирования
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trend_analyzer=info,warn"));

    // Дополнительно пишем JSON-логи в файл, если задан log_dir
    let (file_layer, _log_guard) = match config.log_dir.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "trend_analyzer.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true))
        .with(file_layer)
        .init();

    let gemini = GeminiClient::new(&config)?;
    tracing::info!("Используется модель {}", gemini.model());
    let model: Arc<dyn GenerativeModel> = Arc::new(gemini);

    let state = AppState {
        analyzer: TrendAnalysisService::new(model),
        session: AnalysisSessionHolder::new(),
    };

    let app = create_routes(state);
    tracing::info!("Сервер запущен на http://{}", config.bind_address);
    axum::Server::bind(&config.bind_address.parse()?)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
