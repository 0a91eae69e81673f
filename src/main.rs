use anyhow::Result;
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use gamerec::utils::validation;
use gamerec::{init_tracing, AppError, AppState, Config, RecommendRequest, RecommendResponse};
use std::collections::HashMap;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

async fn health_check() -> Json<HashMap<String, String>> {
    let mut status = HashMap::new();
    status.insert("status".to_string(), "healthy".to_string());
    status.insert("service".to_string(), "gamerec".to_string());
    status.insert("version".to_string(), env!("CARGO_PKG_VERSION").to_string());

    Json(status)
}

async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    validation::validate_recommend_request(&request)?;

    let start_time = std::time::Instant::now();
    let recommendations = match state.recommendation_service.recommend(&request).await {
        Ok(recommendations) => recommendations,
        Err(e) => {
            error!("Failed to recommend: {}", e);
            return Err(e);
        }
    };

    info!(
        "Served {} recommendations in {}ms",
        recommendations.len(),
        start_time.elapsed().as_millis()
    );

    Ok(Json(RecommendResponse { recommendations }))
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/recommend/", post(recommend))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &args.log_level);
    }
    init_tracing().await;

    let config = if std::path::Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, using default configuration");
        Config::default()
    };

    info!("Starting gamerec server with config: {:?}", config.server);

    let state = AppState::new(config.clone())?;
    info!(
        "Catalog loaded with {} games; recommendation engine ready",
        state.catalog.len()
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.server.socket_addr()?).await?;
    info!("Server listening on {}", config.server.socket_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
