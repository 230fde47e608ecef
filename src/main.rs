use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadgen_pro::config::Config;
use leadgen_pro::enrichment::Enricher;
use leadgen_pro::handlers::{self, AppState};
use leadgen_pro::rate_limiter::EnrichmentGate;
use leadgen_pro::store::LeadStore;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The enrichment gate and provider cascade.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadgen_pro=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // One gate per process, shared by every enrichment path
    let gate = Arc::new(EnrichmentGate::new(config.enrichment_calls_per_minute));
    tracing::info!(
        "Enrichment gate initialized ({}ms minimum spacing)",
        gate.min_interval().as_millis()
    );

    let enricher = Enricher::from_config(&config, gate)?;

    let app_state = Arc::new(AppState {
        store: LeadStore::new(),
        enricher,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let protected_routes = Router::new()
        .route(
            "/api/v1/leads",
            get(handlers::list_leads).post(handlers::create_lead),
        )
        .route("/api/v1/leads/metrics", get(handlers::lead_metrics))
        .route("/api/v1/leads/generate", post(handlers::generate_leads))
        .route("/api/v1/leads/:id", get(handlers::get_lead))
        .route("/api/v1/leads/:id/score", get(handlers::get_lead_score))
        .route("/api/v1/leads/:id/enrich", post(handlers::enrich_lead))
        .route("/api/v1/enrich", post(handlers::enrich_domain))
        .route("/api/v1/score", post(handlers::score_lead))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Health check bypasses rate limiting
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
