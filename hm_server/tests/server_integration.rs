//! Integration tests for the HTTP API.
//!
//! Drives the full router (request-id middleware, CORS, handlers) against an
//! in-memory store and a fixed secret word.

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use hangman::{FixedWord, GameService, GameSettings, db::InMemoryGameRepository};
use hm_server::api::{AppState, create_router, request_id::REQUEST_ID_HEADER};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method
use tower_http::cors::CorsLayer;

/// Helper to create a test router whose games all use `word`
fn create_test_app(word: &str) -> axum::Router {
    let service = GameService::new(
        Arc::new(InMemoryGameRepository::new()),
        Arc::new(FixedWord::new(word).unwrap()),
        GameSettings::default(),
    );
    let state = AppState {
        game_service: Arc::new(service),
    };
    create_router(state, CorsLayer::permissive())
}

async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, headers, json)
}

async fn start_game(app: &axum::Router, body: Option<Value>) -> Value {
    let (status, _, game) = send(app, Method::POST, "/api/v1/games", body).await;
    assert_eq!(status, StatusCode::CREATED);
    game
}

async fn guess(app: &axum::Router, id: &str, letter: &str) -> (StatusCode, Value) {
    let uri = format!("/api/v1/games/{id}/guess");
    let (status, _, body) = send(app, Method::POST, &uri, Some(json!({ "letter": letter }))).await;
    (status, body)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_app("AUTO");

    let (status, headers, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], true);
    assert!(body["version"].is_string());
    assert!(headers.contains_key(REQUEST_ID_HEADER));
}

// ============================================================================
// Request ID Tests
// ============================================================================

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app("AUTO");

    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "client-req-42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "client-req-42"
    );
}

#[tokio::test]
async fn test_request_id_on_error_responses() {
    let app = create_test_app("AUTO");

    let (status, headers, _) = send(&app, Method::GET, "/api/v1/games/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.contains_key(REQUEST_ID_HEADER));
}

// ============================================================================
// Start Game Tests
// ============================================================================

#[tokio::test]
async fn test_start_game_defaults() {
    let app = create_test_app("AUTO");

    let game = start_game(&app, None).await;

    assert_eq!(game["maskedWord"], "_ _ _ _");
    assert_eq!(game["failedAttempts"], 0);
    assert_eq!(game["maxAttempts"], 6);
    assert_eq!(game["status"], "ACTIVE");
    assert_eq!(game["guessedLetters"], json!([]));
    assert_eq!(game["message"], "Game started successfully");
    assert!(game.get("correct").is_none());
}

#[tokio::test]
async fn test_start_game_with_empty_object_uses_default() {
    let app = create_test_app("AUTO");

    let game = start_game(&app, Some(json!({}))).await;

    assert_eq!(game["maxAttempts"], 6);
}

#[tokio::test]
async fn test_start_game_custom_max_attempts() {
    let app = create_test_app("AUTO");

    let game = start_game(&app, Some(json!({ "maxAttempts": 15 }))).await;

    assert_eq!(game["maxAttempts"], 15);
}

#[tokio::test]
async fn test_start_game_rejects_out_of_range_attempts() {
    let app = create_test_app("AUTO");

    for max_attempts in [0, 27] {
        let (status, _, body) = send(
            &app,
            Method::POST,
            "/api/v1/games",
            Some(json!({ "maxAttempts": max_attempts })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

// ============================================================================
// Guess Tests
// ============================================================================

#[tokio::test]
async fn test_winning_game() {
    let app = create_test_app("AUTO");
    let game = start_game(&app, None).await;
    let id = game["id"].as_str().unwrap();

    let (status, body) = guess(&app, id, "a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], true);
    assert_eq!(body["maskedWord"], "A _ _ _");
    assert_eq!(body["message"], "Correct guess!");

    guess(&app, id, "u").await;
    guess(&app, id, "t").await;
    let (status, body) = guess(&app, id, "o").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "WON");
    assert_eq!(body["maskedWord"], "A U T O");
    assert_eq!(body["message"], "Correct! You won!");
    assert_eq!(body["guessedLetters"], json!(["A", "O", "T", "U"]));

    let (status, _, body) = send(&app, Method::GET, &format!("/api/v1/games/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "WON");
}

#[tokio::test]
async fn test_losing_game_reveals_word() {
    let app = create_test_app("AUTO");
    let game = start_game(&app, Some(json!({ "maxAttempts": 2 }))).await;
    let id = game["id"].as_str().unwrap();

    let (_, body) = guess(&app, id, "x").await;
    assert_eq!(body["correct"], false);
    assert_eq!(body["failedAttempts"], 1);
    assert_eq!(body["message"], "Wrong guess. Try again!");

    let (status, body) = guess(&app, id, "y").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "LOST");
    assert_eq!(body["failedAttempts"], 2);
    assert_eq!(body["maskedWord"], "AUTO");
    assert_eq!(body["message"], "Game over! You lost!");
}

#[tokio::test]
async fn test_guess_after_game_over() {
    let app = create_test_app("AUTO");
    let game = start_game(&app, Some(json!({ "maxAttempts": 1 }))).await;
    let id = game["id"].as_str().unwrap();

    guess(&app, id, "x").await;
    let (status, body) = guess(&app, id, "a").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "GAME_OVER");

    let (_, _, game) = send(&app, Method::GET, &format!("/api/v1/games/{id}"), None).await;
    assert_eq!(game["guessedLetters"], json!(["X"]));
}

#[tokio::test]
async fn test_umlaut_reveals_base_letter() {
    let app = create_test_app("AUTO");
    let game = start_game(&app, None).await;
    let id = game["id"].as_str().unwrap();

    let (status, body) = guess(&app, id, "ä").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], true);
    assert_eq!(body["maskedWord"], "A _ _ _");
    assert_eq!(body["guessedLetters"], json!(["Ä"]));
}

#[tokio::test]
async fn test_base_letter_reveals_umlaut() {
    let app = create_test_app("SCHÖN");
    let game = start_game(&app, None).await;
    let id = game["id"].as_str().unwrap();

    let (_, body) = guess(&app, id, "o").await;

    assert_eq!(body["correct"], true);
    assert_eq!(body["maskedWord"], "_ _ _ Ö _");
}

#[tokio::test]
async fn test_repeat_guess_is_not_counted() {
    let app = create_test_app("AUTO");
    let game = start_game(&app, None).await;
    let id = game["id"].as_str().unwrap();

    guess(&app, id, "x").await;
    let (status, body) = guess(&app, id, "X").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["correct"], false);
    assert_eq!(body["failedAttempts"], 1);
    assert_eq!(body["message"], "Letter already guessed");
}

#[tokio::test]
async fn test_guess_with_id_in_body() {
    let app = create_test_app("AUTO");
    let game = start_game(&app, None).await;

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/v1/games/guess",
        Some(json!({ "id": game["id"], "letter": "t" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["maskedWord"], "_ _ T _");
}

#[tokio::test]
async fn test_invalid_letters_rejected() {
    let app = create_test_app("AUTO");
    let game = start_game(&app, None).await;
    let id = game["id"].as_str().unwrap();

    for letter in ["1", "ab", "?"] {
        let (status, body) = guess(&app, id, letter).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "letter {letter:?}");
        assert_eq!(body["code"], "INVALID_LETTER");
    }

    let (_, _, game) = send(&app, Method::GET, &format!("/api/v1/games/{id}"), None).await;
    assert_eq!(game["failedAttempts"], 0);
    assert_eq!(game["guessedLetters"], json!([]));
}

#[tokio::test]
async fn test_missing_fields_rejected() {
    let app = create_test_app("AUTO");
    let game = start_game(&app, None).await;

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/v1/games/guess",
        Some(json!({ "letter": "a" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/v1/games/guess",
        Some(json!({ "id": game["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = create_test_app("AUTO");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/games/guess")
        .header("content-type", "application/json")
        .body(Body::from("{\"id\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ============================================================================
// Not Found Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_game_not_found() {
    let app = create_test_app("AUTO");
    let id = uuid::Uuid::new_v4();

    let (status, _, body) = send(&app, Method::GET, &format!("/api/v1/games/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "GAME_NOT_FOUND");

    let (status, body) = guess(&app, &id.to_string(), "a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "GAME_NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_game_id_not_found() {
    let app = create_test_app("AUTO");

    let (status, body) = guess(&app, "invalid-id", "a").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "GAME_NOT_FOUND");
}

// ============================================================================
// Legacy Route Tests
// ============================================================================

#[tokio::test]
async fn test_legacy_routes() {
    let app = create_test_app("AUTO");

    let (status, _, game) = send(&app, Method::POST, "/api/games", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = game["id"].as_str().unwrap();

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/games/guess",
        Some(json!({ "id": id, "letter": "o" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["maskedWord"], "_ _ _ O");

    let (status, _, body) = send(&app, Method::GET, &format!("/api/games/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["maskedWord"], "_ _ _ O");
    assert_eq!(body["message"], "");
}
