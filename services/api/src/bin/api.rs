//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{db::DbAdapter, OpenAiAnalysisAdapter},
    config::{Config, StoreBackend},
    error::ApiError,
    web::{api_router, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use journal_core::{
    ports::EntryStore, AnalysisPipeline, CompletionService, EntryService, InMemoryEntryStore,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Choose the Entry Store ---
    let store: Arc<dyn EntryStore> = match &config.store_backend {
        StoreBackend::Postgres { database_url } => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let db_adapter = DbAdapter::new(db_pool);
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_adapter)
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory entry store; entries are lost on restart.");
            Arc::new(InMemoryEntryStore::new())
        }
    };

    // --- 3. Initialize the Analysis Adapter ---
    let mut openai_config = OpenAIConfig::new().with_api_base(&config.llm_api_base);
    match &config.llm_api_key {
        Some(key) => openai_config = openai_config.with_api_key(key),
        None => warn!(
            "OPENROUTER_API_KEY is not set; every analysis will fall back to the default response."
        ),
    }
    let analysis_adapter: Arc<dyn CompletionService> = Arc::new(OpenAiAnalysisAdapter::new(
        Client::with_config(openai_config),
        config.analysis_model.clone(),
        config.analysis_timeout,
    ));

    // --- 4. Build the Shared AppState ---
    let pipeline = Arc::new(AnalysisPipeline::new(analysis_adapter));
    let entries = Arc::new(EntryService::new(store, pipeline));
    let app_state = Arc::new(AppState::new(entries));

    // --- 5. Create the Web Router ---
    let allowed_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
