pub mod config;
pub mod db;
pub mod reviews;
pub mod validation;

use std::sync::Arc;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::AppConfig;
use reviews::{
    CountReviewsRequest, CreateReviewRequest, CreatedReviewResponse, ErrorResponse,
    HttpMovieChecker, MovieExistenceChecker, PgReviewRepository, ReviewInfo, ReviewListResponse,
    ReviewService, ReviewStore,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        ping,
        reviews::handlers::create_review_handler,
        reviews::handlers::list_movie_reviews_handler,
        reviews::handlers::count_reviews_handler,
    ),
    components(
        schemas(
            CreateReviewRequest,
            CreatedReviewResponse,
            ReviewInfo,
            ReviewListResponse,
            CountReviewsRequest,
            ErrorResponse
        )
    ),
    tags(
        (name = "reviews", description = "Movie review endpoints"),
        (name = "health", description = "Liveness probe")
    ),
    info(
        title = "Movie Review API",
        version = "0.1.0",
        description = "Create, page through and count movie reviews"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub review_service: ReviewService,
}

impl AppState {
    pub fn new(store: Arc<dyn ReviewStore>, movies: Arc<dyn MovieExistenceChecker>) -> Self {
        Self {
            review_service: ReviewService::new(store, movies),
        }
    }
}

/// Handler for GET /ping
#[utoipa::path(
    get,
    path = "/ping",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = "health"
)]
async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

/// Creates and configures the application router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/ping", get(ping))
        .route(
            "/reviews",
            post(reviews::create_review_handler).get(reviews::list_movie_reviews_handler),
        )
        .route("/reviews/_count", post(reviews::count_reviews_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Movie Review API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .expect("Failed to create database pool");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let store = Arc::new(PgReviewRepository::new(db_pool));
    let movies = Arc::new(HttpMovieChecker::new(
        reqwest::Client::new(),
        config.movie_service_url.clone(),
    ));
    tracing::info!("Using Movie service at {}", config.movie_service_url);

    let app = create_router(AppState::new(store, movies));

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Movie Review API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
