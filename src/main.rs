//! Posada Reservation & Billing Server
//!
//! HTTP server wiring the booking engine to in-memory storage. Clients and
//! locations are seeded by the operating portal; the engine itself only
//! sees the collaborator traits.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use posada_api::{configure_orders, configure_reservations, health};
use posada_core::{
    config::AppConfig,
    models::LoyaltyConfig,
    traits::{ClientStore, HostSettings, LocationCatalog, OrderRepository, ReservationRepository},
};
use posada_services::BookingService;
use posada_store::{
    MemoryClientStore, MemoryHostSettings, MemoryLocationCatalog, MemoryOrderRepository,
    MemoryReservationRepository,
};
use rust_decimal::Decimal;
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health))
            // Reservation and availability endpoints
            .configure(configure_reservations)
            // Order endpoints
            .configure(configure_orders),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "posada={},posada_api={},posada_services={},actix_web=info",
            log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!("Starting Posada server v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().expect("Failed to load configuration");

    // Seed host settings from the configured loyalty defaults
    let loyalty_defaults = LoyaltyConfig {
        enabled: config.loyalty.enabled,
        points_per_night_room: config.loyalty.points_per_night_room,
        points_per_table_booking: config.loyalty.points_per_table_booking,
        points_per_currency_unit: Decimal::try_from(config.loyalty.points_per_currency_unit)
            .unwrap_or(Decimal::ONE),
        signup_bonus: config.loyalty.signup_bonus,
    };
    info!(
        "Loyalty program {} (room {}/night, table {}/booking)",
        if loyalty_defaults.enabled {
            "enabled"
        } else {
            "disabled"
        },
        loyalty_defaults.points_per_night_room,
        loyalty_defaults.points_per_table_booking
    );

    let catalog = Arc::new(MemoryLocationCatalog::new());
    let clients = Arc::new(MemoryClientStore::new());
    let settings = Arc::new(MemoryHostSettings::new(loyalty_defaults));
    let reservations = Arc::new(MemoryReservationRepository::new());
    let orders = Arc::new(MemoryOrderRepository::new());

    let host_id = Uuid::new_v4();
    let service = BookingService::new(
        catalog as Arc<dyn LocationCatalog>,
        clients as Arc<dyn ClientStore>,
        settings as Arc<dyn HostSettings>,
        reservations as Arc<dyn ReservationRepository>,
        orders as Arc<dyn OrderRepository>,
        host_id,
    );
    service
        .rebuild_calendar()
        .await
        .expect("Failed to build calendar index");
    let service = web::Data::new(service);

    // CORS configuration
    let cors_origins = env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let bind_addr = config.server_addr();
    let workers = config.server.workers;
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    HttpServer::new(move || {
        // Configure CORS - clone cors_origins for each worker
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                if let Ok(origin_str) = origin.to_str() {
                    origins.iter().any(|o| o.trim() == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            // Shared booking service
            .app_data(service.clone())
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_query",
                        "message": error_message
                    })),
                )
                .into()
            }))
            // Middleware
            .wrap(cors)
            .wrap(middleware::Logger::new("%a \"%r\" %s %b %Dms"))
            .wrap(middleware::NormalizePath::trim())
            // Configure routes
            .configure(configure_routes)
            // Root redirect to health
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
