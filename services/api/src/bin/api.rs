//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{OpenAiDiagramAdapter, OpenAiQuizAdapter, OpenAiTutorAdapter, PgStateStore},
    config::Config,
    error::ApiError,
    web::{api_router, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{
    header::{HeaderName, ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use mentormind_core::memory::MemoryStore;
use mentormind_core::ports::StateStore;
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
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            config.log_level.to_string(),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect the State Store ---
    // Without a database the service keeps running with in-memory-only state.
    let store: Arc<dyn StateStore> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let db_store = PgStateStore::new(db_pool);
            info!("Running database migrations...");
            db_store.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_store)
        }
        None => {
            warn!("DATABASE_URL is not set; learner records are held in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    // --- 3. Initialize the LLM Adapters ---
    let api_key = config.llm_api_key.as_ref().ok_or_else(|| {
        ApiError::Internal("GEMINI_API_KEY or OPENAI_API_KEY is required".to_string())
    })?;
    let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(api_base) = &config.llm_api_base {
        openai_config = openai_config.with_api_base(api_base);
    }
    let llm_client = Client::with_config(openai_config);

    let tutor_adapter = Arc::new(OpenAiTutorAdapter::new(
        llm_client.clone(),
        config.tutor_model.clone(),
    ));
    let quiz_adapter = Arc::new(OpenAiQuizAdapter::new(
        llm_client.clone(),
        config.quiz_model.clone(),
    ));
    let diagram_adapter = Arc::new(OpenAiDiagramAdapter::new(
        llm_client.clone(),
        config.diagram_model.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        config: config.clone(),
        tutor_adapter,
        quiz_adapter,
        diagram_adapter,
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .allowed_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("Invalid ALLOWED_ORIGIN: {e}")))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, ACCEPT, HeaderName::from_static("x-user-id")]);

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .merge(api_router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
