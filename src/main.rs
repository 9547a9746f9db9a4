use autolog::{
    handlers::{
        fuel::{
            create_fuel_record, delete_fuel_record, get_fuel_records, get_fuel_summary,
            update_fuel_record,
        },
        health::health_check,
        lookups::{clear_lookups, get_lookup},
        maintenance::{
            create_maintenance_record, delete_maintenance_record, get_maintenance_records,
            get_maintenance_summary, get_recurring_problems, update_maintenance_record,
        },
        workshops::list_workshops,
    },
    middleware::session_middleware,
    state::{AppState, DbProvider, DemoDbProvider, SingleDbProvider},
};
use axum::{
    Extension, Router,
    http::{HeaderValue, header},
    routing::{delete, get, put},
};
use std::{sync::Arc, time::Duration};
use surrealdb::{
    Surreal,
    engine::local::{Db, RocksDb},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEMO_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

async fn persistent_provider(db_path: &str) -> DbProvider {
    info!("Initializing SurrealDB at {}", db_path);

    // Create the data directory if it doesn't exist
    std::fs::create_dir_all(db_path).expect("Failed to create data directory");

    let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path.to_string())
        .await
        .expect("Failed to initialize SurrealDB");

    db.use_ns("autolog")
        .use_db("main")
        .await
        .expect("Failed to use namespace and database");

    info!("Setting up database schema...");
    autolog::db::setup_database(&db).await;

    DbProvider::Single(SingleDbProvider { db })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    // Get configuration from environment or use defaults
    let db_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./data".to_string());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());
    let demo_mode = env_flag("DEMO_MODE");

    let provider = if demo_mode {
        info!("Running in demo mode: each session gets a seeded in-memory database");
        DbProvider::Demo(DemoDbProvider::new())
    } else {
        persistent_provider(&db_path).await
    };

    let state = Arc::new(AppState::new(provider));

    if state.is_demo_mode {
        let sweeper = Arc::clone(&state);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(DEMO_SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                let expired = sweeper.sweep_demo_sessions();
                if expired > 0 {
                    info!("Expired {} idle demo sessions", expired);
                }
            }
        });
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/api/maintenance",
            get(get_maintenance_records).post(create_maintenance_record),
        )
        .route("/api/maintenance/recurring", get(get_recurring_problems))
        .route("/api/maintenance/summary", get(get_maintenance_summary))
        .route(
            "/api/maintenance/{id}",
            put(update_maintenance_record).delete(delete_maintenance_record),
        )
        .route("/api/fuel", get(get_fuel_records).post(create_fuel_record))
        .route("/api/fuel/summary", get(get_fuel_summary))
        .route(
            "/api/fuel/{id}",
            put(update_fuel_record).delete(delete_fuel_record),
        )
        .route("/api/workshops", get(list_workshops))
        .route("/api/lookups", delete(clear_lookups))
        .route("/api/lookups/{kind}", get(get_lookup))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(
            ServiceBuilder::new()
                .layer(Extension(state))
                .layer(axum::middleware::from_fn(session_middleware))
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        // Serve static files as fallback
        .fallback_service(ServeDir::new(&static_dir));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind listener");

    info!("Server running on http://{}", bind_addr);
    if demo_mode {
        info!("Database: in-memory per session");
    } else {
        info!("Database location: {}", db_path);
    }
    axum::serve(listener, app).await.expect("Server error");
}
