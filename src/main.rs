use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod state;

use state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = crate::config::config();
    tracing::info!("Starting Barang Bekas API in {:?} mode", config.environment);

    let state = AppState::from_env()
        .await
        .unwrap_or_else(|e| panic!("failed to initialize store: {}", e));

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("BARANG_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Barang Bekas API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    let config = crate::config::config();

    let mut app = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition)
        .merge(auth_routes(state.clone()))
        // Protected resource routes
        .merge(barang_routes(state));

    if config.security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

fn auth_routes(state: AppState) -> Router {
    use axum::routing::post;
    use handlers::auth;

    Router::new()
        .route("/auth/register", post(auth::auth_register))
        .route("/auth/login", post(auth::auth_login))
        .with_state(state)
}

fn barang_routes(state: AppState) -> Router {
    use axum::routing::{get, put};
    use handlers::barang;

    Router::new()
        .route(
            "/manajemen-barang-bekas",
            get(barang::barang_get).post(barang::barang_post),
        )
        .route(
            "/manajemen-barang-bekas/:id",
            put(barang::barang_put).delete(barang::barang_delete),
        )
        // Every route in this router sits behind the auth gate
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Barang Bekas API (Rust)",
        "version": version,
        "description": "Per-owner used-goods record management built with Rust (Axum)",
        "endpoints": {
            "auth": "/auth/register, /auth/login (public - token acquisition)",
            "barang": "/manajemen-barang-bekas[/:id] (protected)",
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
