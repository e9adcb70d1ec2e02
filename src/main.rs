use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use nexgeo_api::config;
use nexgeo_api::database::{seed, DatabaseManager};
use nexgeo_api::handlers::{protected, public};
use nexgeo_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting NexGeo API in {:?} mode", config.environment);

    if config.database.seed_on_startup {
        match DatabaseManager::pool().await {
            Ok(pool) => {
                if let Err(e) = seed::run(pool).await {
                    tracing::error!("Database seed failed: {}", e);
                }
            }
            Err(e) => tracing::warn!("Skipping seed, database unavailable: {}", e),
        }
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("NEXGEO_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("NexGeo API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    use axum::routing::post;

    Router::new()
        .route("/login", post(public::login::login))
        .route("/geo/tree", get(public::geo::tree))
}

fn protected_routes() -> Router {
    Router::new()
        .route(
            "/api/users",
            get(protected::users::list).post(protected::users::create),
        )
        .route("/api/users/initiate", get(protected::users::initiate))
        .route(
            "/api/users/:id",
            get(protected::users::show)
                .put(protected::users::update)
                .patch(protected::users::update)
                .delete(protected::users::destroy),
        )
        .route(
            "/api/provinces",
            get(protected::provinces::list).post(protected::provinces::create),
        )
        .route(
            "/api/provinces/initiate",
            get(protected::provinces::initiate),
        )
        .route(
            "/api/provinces/:id",
            get(protected::provinces::show)
                .put(protected::provinces::update)
                .patch(protected::provinces::update)
                .delete(protected::provinces::destroy),
        )
        .route(
            "/api/cities",
            get(protected::cities::list).post(protected::cities::create),
        )
        .route("/api/cities/initiate", get(protected::cities::initiate))
        .route(
            "/api/cities/:id",
            get(protected::cities::show)
                .put(protected::cities::update)
                .patch(protected::cities::update)
                .delete(protected::cities::destroy),
        )
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "NexGeo API",
            "version": version,
            "description": "Geographic reference API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "login": "/login (public - token acquisition)",
                "geo": "/geo/tree (public)",
                "users": "/api/users[/:id], /api/users/initiate (protected)",
                "provinces": "/api/provinces[/:id], /api/provinces/initiate (protected)",
                "cities": "/api/cities[/:id], /api/cities/initiate (protected)",
            }
        }
    }))
}

async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
