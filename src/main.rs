mod config;
mod error;
mod handlers;
mod models;
mod normalize;
mod plant_id;

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::Config;
pub use error::{AppError, Result};

use plant_id::PlantIdClient;

pub struct AppState {
    pub config: Config,
    pub plant_id: Option<PlantIdClient>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let config = Config::from_env()?;

    // Build the Plant.id client once; without a key identification answers 500
    let plant_id = match config.plant_id_api_key() {
        Some(key) => Some(PlantIdClient::new(key)?),
        None => {
            tracing::warn!("PLANT_ID_API_KEY is not set, plant identification is disabled");
            None
        }
    };

    tracing::info!(
        "Serving front-end from {} (images from {})",
        config.static_dir.display(),
        config.images_dir_path().display()
    );

    let addr = format!("{}:{}", config.host, config.port);

    let state = Arc::new(AppState { config, plant_id });
    let app = app(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn app(state: Arc<AppState>) -> Router {
    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.max_request_body_bytes();

    let images = ServeDir::new(state.config.images_dir_path())
        .append_index_html_on_directories(false)
        .not_found_service(handlers::assets::not_found.into_service());
    // Remaining front-end files (scripts, styles)
    let static_files = ServeDir::new(&state.config.static_dir)
        .append_index_html_on_directories(false)
        .not_found_service(handlers::assets::not_found.into_service());

    Router::new()
        // Front-end
        .route("/", get(handlers::assets::index))
        .nest_service("/images1", images)
        // Health check
        .route("/health", get(handlers::health_check))
        // Public API
        .route("/api/identify", post(handlers::identify::identify_plant))
        .route("/api/verify", post(handlers::verify::verify_challenge))
        .fallback_service(static_files)
        .layer(middleware::from_fn(handlers::assets::reject_hidden_paths))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
