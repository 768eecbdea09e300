//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        FsBlobStore, InMemoryDocumentStore, LopdfParser, OpenAiAnswerEngine, ScriptedAnswerEngine,
    },
    config::Config,
    error::ApiError,
    web::{
        chat_handler, get_document_handler, health_handler, raw_document_handler, rest::ApiDoc,
        state::AppState, upload_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use docchat_core::ingest::IngestionPipeline;
use docchat_core::ports::AnswerEngine;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Storage Adapters ---
    let store = Arc::new(InMemoryDocumentStore::new());
    let blobs = Arc::new(FsBlobStore::new(config.upload_dir.clone()).await?);
    let parser = Arc::new(LopdfParser::new());
    info!("Upload storage ready at {}", config.upload_dir.display());

    // --- 3. Select the Answer Engine ---
    let engine: Arc<dyn AnswerEngine> = match &config.openai_api_key {
        Some(api_key) => {
            info!("OPENAI_API_KEY found, using the model-backed answer engine.");
            let openai_config = OpenAIConfig::new().with_api_key(api_key);
            Arc::new(OpenAiAnswerEngine::new(
                Client::with_config(openai_config),
                config.qa_model.clone(),
            ))
        }
        None => {
            info!("No OPENAI_API_KEY set, using the scripted answer engine.");
            Arc::new(ScriptedAnswerEngine::new())
        }
    };

    // --- 4. Build the Ingestion Pipeline & Shared AppState ---
    let pipeline = Arc::new(IngestionPipeline::new(
        parser,
        blobs.clone(),
        store.clone(),
        config.max_upload_bytes,
    ));
    let app_state = Arc::new(AppState::new(
        store,
        blobs,
        engine,
        pipeline,
        config.clone(),
    ));

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // The body limit leaves headroom above the upload limit for multipart
    // framing; the pipeline enforces the exact byte count.
    let api_router = Router::new()
        .route("/api/upload", post(upload_handler))
        .route("/api/document/{id}", get(get_document_handler))
        .route("/api/chat/{document_id}", post(chat_handler))
        .route("/api/uploads/{id}", get(raw_document_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes + 64 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
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
