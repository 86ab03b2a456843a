//! HTTP API for the hangman server.
//!
//! # Endpoints Overview
//!
//! ## Games
//! - `POST /api/v1/games` - Start a game (optional `{"maxAttempts": n}`)
//! - `POST /api/v1/games/guess` - Guess a letter (`{"id": "...", "letter": "a"}`)
//! - `POST /api/v1/games/{id}/guess` - Guess a letter (`{"letter": "a"}`)
//! - `GET /api/v1/games/{id}` - Get game state
//!
//! The same game routes are served without the version prefix under
//! `/api/games` for older clients.
//!
//! ## Health Check
//! - `GET /health` - Server health status
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use hangman::{GameService, GameSettings, WordList, db::InMemoryGameRepository};
//! use hm_server::api::{AppState, create_router};
//! use std::sync::Arc;
//! use tower_http::cors::CorsLayer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = GameService::new(
//!     Arc::new(InMemoryGameRepository::new()),
//!     Arc::new(WordList::default()),
//!     GameSettings::default(),
//! );
//! let state = AppState {
//!     game_service: Arc::new(service),
//! };
//!
//! let app = create_router(state, CorsLayer::permissive());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod games;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use hangman::GameService;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::ServerConfig;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub game_service: Arc<GameService>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// ```text
/// GET  /health                       - Health check
/// POST /api/v1/games                 - Start game
/// POST /api/v1/games/guess           - Guess (ID in body)
/// POST /api/v1/games/{id}/guess      - Guess (ID in path)
/// GET  /api/v1/games/{id}            - Get game
///
/// POST /api/games                    - Use /api/v1/games
/// POST /api/games/guess              - Use /api/v1/games/guess
/// GET  /api/games/{id}               - Use /api/v1/games/{id}
/// ```
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        // Legacy routes (deprecated)
        .route("/api/games", post(games::start_game))
        .route("/api/games/guess", post(games::guess))
        .route("/api/games/{id}", get(games::get_game))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .with_state(state)
}

fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/games", post(games::start_game))
        .route("/games/guess", post(games::guess))
        .route("/games/{id}", get(games::get_game))
        .route("/games/{id}/guess", post(games::guess_by_path))
}

/// Build the CORS layer from the configured origin list.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }

    let origins = allowed_origins(&config.cors_origins);

    let request_id = HeaderName::from_static(request_id::REQUEST_ID_HEADER);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, request_id.clone()])
        .expose_headers([request_id])
}

fn allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {:?}", origin);
                None
            }
        })
        .collect()
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the game store answers, `503 Service Unavailable`
/// otherwise.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","version":"1.0.0","store":true,"timestamp":"2026-10-18T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = match state.game_service.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            false
        }
    };

    let status_code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if store_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": store_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
