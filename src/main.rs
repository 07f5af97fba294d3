use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sisciac::config::{self, Config};
use sisciac::handlers;
use sisciac::services::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let db_pool = config::database::create_pool(&config.database_url).await?;

    let state = Arc::new(AppState::new(db_pool, config.clone()));

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Producers
        .route("/api/producers", get(handlers::producers::list_producers))
        .route("/api/producers", post(handlers::producers::create_producer))
        .route("/api/producers/:id", get(handlers::producers::get_producer))
        .route("/api/producers/:id", put(handlers::producers::update_producer))
        .route("/api/producers/:id", delete(handlers::producers::delete_producer))
        .route(
            "/api/producers/:id/transactions/summary",
            get(handlers::transactions::producer_summary),
        )
        .route(
            "/api/producers/:id/enrollments",
            get(handlers::training::list_producer_enrollments),
        )
        // Farms and plots
        .route("/api/farms", get(handlers::farms::list_farms))
        .route("/api/farms", post(handlers::farms::create_farm))
        .route("/api/farms/:id", get(handlers::farms::get_farm))
        .route("/api/farms/:id", put(handlers::farms::update_farm))
        .route("/api/farms/:id", delete(handlers::farms::delete_farm))
        .route("/api/farms/:id/plots", get(handlers::farms::list_farm_plots))
        .route("/api/plots", post(handlers::farms::create_plot))
        .route("/api/plots/:id", get(handlers::farms::get_plot))
        .route("/api/plots/:id", put(handlers::farms::update_plot))
        .route("/api/plots/:id", delete(handlers::farms::delete_plot))
        // Crops
        .route("/api/crops", get(handlers::crops::list_crops))
        .route("/api/crops", post(handlers::crops::create_crop))
        .route("/api/crops/:id", get(handlers::crops::get_crop))
        .route("/api/crops/:id", put(handlers::crops::update_crop))
        .route("/api/crops/:id", delete(handlers::crops::delete_crop))
        .route("/api/crops/:id/status", put(handlers::crops::update_crop_status))
        // Collection centers
        .route("/api/centers", get(handlers::centers::list_centers))
        .route("/api/centers", post(handlers::centers::create_center))
        .route("/api/centers/:id", get(handlers::centers::get_center))
        .route("/api/centers/:id", put(handlers::centers::update_center))
        .route("/api/centers/:id", delete(handlers::centers::delete_center))
        // Logistics routes
        .route("/api/routes", get(handlers::routes::list_routes))
        .route("/api/routes", post(handlers::routes::create_route))
        .route("/api/routes/:id", get(handlers::routes::get_route))
        .route("/api/routes/:id", put(handlers::routes::update_route))
        .route("/api/routes/:id", delete(handlers::routes::delete_route))
        // Supplies and inventory movements
        .route("/api/supplies", get(handlers::supplies::list_supplies))
        .route("/api/supplies", post(handlers::supplies::create_supply))
        .route("/api/supplies/:id", get(handlers::supplies::get_supply))
        .route("/api/supplies/:id", put(handlers::supplies::update_supply))
        .route("/api/supplies/:id", delete(handlers::supplies::delete_supply))
        .route("/api/supplies/:id/stock", get(handlers::supplies::get_stock))
        .route("/api/movements", get(handlers::supplies::list_movements))
        .route("/api/movements", post(handlers::supplies::create_movement))
        // Training
        .route("/api/sessions", get(handlers::training::list_sessions))
        .route("/api/sessions", post(handlers::training::create_session))
        .route("/api/sessions/:id", get(handlers::training::get_session))
        .route("/api/sessions/:id", put(handlers::training::update_session))
        .route("/api/sessions/:id", delete(handlers::training::delete_session))
        .route(
            "/api/sessions/:id/enrollments",
            get(handlers::training::list_session_enrollments),
        )
        .route("/api/sessions/:id/enroll", post(handlers::training::enroll))
        .route("/api/enrollments/:id", put(handlers::training::update_enrollment))
        // Market prices
        .route("/api/market-prices", get(handlers::prices::list_prices))
        .route("/api/market-prices", post(handlers::prices::create_price))
        .route("/api/market-prices/latest", get(handlers::prices::latest_prices))
        .route("/api/market-prices/:id", get(handlers::prices::get_price))
        .route("/api/market-prices/:id", delete(handlers::prices::delete_price))
        // Transactions
        .route("/api/transactions", get(handlers::transactions::list_transactions))
        .route("/api/transactions", post(handlers::transactions::create_transaction))
        .route("/api/transactions/:id", get(handlers::transactions::get_transaction))
        .route("/api/transactions/:id", delete(handlers::transactions::delete_transaction))
        // Map
        .route("/api/map/nearby", get(handlers::map::nearby))
        .route("/api/map/clusters", get(handlers::map::clusters))
        // Health
        .route("/health", get(handlers::health::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
