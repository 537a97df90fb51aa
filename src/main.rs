// Hikecast API v0.1
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod models;
mod routes;
mod services;

use config::AppConfig;
use routes::advisories::AppState;
use services::cache::MemoryCache;
use services::open_meteo::OpenMeteoClient;
use services::registry::MountainRegistry;

/// Registry file looked up inside the data directory.
const MOUNTAINS_FILE: &str = "mountains.json";

/// OpenAPI document for the Hikecast API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hikecast API",
        version = "0.1.0",
        description = "Mountain hiking weather advisory API. Fetches hourly forecasts \
            from Open-Meteo for registered mountains, projects them to mid-slope and \
            summit elevations, and scores each day and time slot as good, caution or \
            poor against regional seasonal baselines.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Mountains", description = "Mountain registry"),
        (name = "Advisories", description = "Hiking condition advisories"),
    ),
    paths(
        routes::health::health_check,
        routes::mountains::list_mountains,
        routes::mountains::get_mountain,
        routes::advisories::get_mountain_advisory,
        routes::advisories::list_advisories,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            models::Mountain,
            models::DifficultyTier,
            models::Category,
            routes::advisories::AdvisoryResponse,
            routes::advisories::BulkAdvisoryResponse,
            services::advisory::AdvisoryReport,
            services::advisory::AdvisoryMeta,
            services::advisory::ForecastOrigin,
            services::advisory::SlotDetail,
            services::baseline::Baseline,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hikecast_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Load the mountain registry, falling back to the built-in set
    let mountains_path = std::path::Path::new(&config.data_dir).join(MOUNTAINS_FILE);
    let registry = match MountainRegistry::load_from_file(&mountains_path) {
        Ok(registry) => {
            tracing::info!(
                "Loaded {} mountains from {}",
                registry.len(),
                mountains_path.display()
            );
            registry
        }
        Err(e) => {
            tracing::warn!(
                "Could not load {} ({}), using built-in mountain set",
                mountains_path.display(),
                e
            );
            MountainRegistry::builtin()
        }
    };
    let registry = Arc::new(registry);

    // Create Open-Meteo client and forecast cache
    let client = OpenMeteoClient::new(&config.open_meteo_base_url, &config.open_meteo_user_agent);
    let cache = Arc::new(MemoryCache::new(Duration::from_secs(config.cache_ttl_secs)));

    // Build shared application state
    let app_state = AppState {
        registry: registry.clone(),
        client,
        cache,
    };

    // Read-only API, restrict CORS methods to GET
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    // Build router
    // Mountain and health routes use the registry directly; advisory routes use AppState.
    let mountain_routes = Router::new()
        .route("/api/v1/mountains", get(routes::mountains::list_mountains))
        .route(
            "/api/v1/mountains/:mountain_id",
            get(routes::mountains::get_mountain),
        )
        .with_state(registry.clone());

    let advisory_routes = Router::new()
        .route(
            "/api/v1/advisories",
            get(routes::advisories::list_advisories),
        )
        .route(
            "/api/v1/advisories/:mountain_id",
            get(routes::advisories::get_mountain_advisory),
        )
        .with_state(app_state);

    let health_routes = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .with_state(registry);

    let app = Router::new()
        .merge(health_routes)
        .merge(mountain_routes)
        .merge(advisory_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
