//! Game API handlers.
//!
//! Starting games, guessing letters and reading game state. Request bodies
//! are parsed by hand so that malformed JSON gets the same
//! `{"error", "code"}` shape as every other failure.
//!
//! # Examples
//!
//! Start a game:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/games \
//!   -H "Content-Type: application/json" \
//!   -d '{"maxAttempts": 8}'
//! ```
//!
//! Guess a letter:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/games/GAME_ID/guess \
//!   -H "Content-Type: application/json" \
//!   -d '{"letter": "e"}'
//! ```

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use hangman::{
    Game, GameStatus, GuessReport, ServiceError,
    service::ServiceResult,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::{AppState, request_id::RequestId};
use crate::{logging, metrics};

const GAME_STARTED_MESSAGE: &str = "Game started successfully";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    pub max_attempts: Option<u32>,
}

/// Guess with the game ID in the body (`/games/guess`)
#[derive(Debug, Default, Deserialize)]
pub struct GuessRequest {
    pub id: Option<String>,
    pub letter: Option<String>,
}

/// Guess with the game ID in the path (`/games/{id}/guess`)
#[derive(Debug, Default, Deserialize)]
pub struct LetterRequest {
    pub letter: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: String,
    pub masked_word: String,
    pub failed_attempts: u32,
    pub max_attempts: u32,
    pub status: GameStatus,
    pub guessed_letters: Vec<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    pub message: String,
}

impl GameResponse {
    fn from_game(game: &Game, message: &str) -> Self {
        Self {
            id: game.id().to_string(),
            masked_word: game.masked_word(),
            failed_attempts: game.failed_attempts(),
            max_attempts: game.max_attempts(),
            status: game.status(),
            guessed_letters: game.guessed_letters().iter().copied().collect(),
            correct: None,
            message: message.to_string(),
        }
    }

    fn from_report(report: &GuessReport) -> Self {
        Self {
            correct: Some(report.outcome.correct),
            ..Self::from_game(&report.game, report.outcome.message())
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

/// Map a service error to its HTTP status and client-safe body.
fn error_response(request_id: &RequestId, err: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::GameOver | ServiceError::InvalidLetter(_) | ServiceError::Validation(_) => {
            StatusCode::BAD_REQUEST
        }
        ServiceError::Store(_) | ServiceError::Internal(_) => {
            tracing::error!(request_id = request_id.as_str(), "Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let body = ErrorResponse {
        error: err.client_message(),
        code: err.code().to_string(),
    };
    if status != StatusCode::INTERNAL_SERVER_ERROR {
        logging::log_rejected_request(request_id.as_str(), &body.code, &body.error);
    }

    (status, Json(body))
}

/// An absent or blank body means "all defaults".
fn parse_body<T>(body: &Bytes) -> ServiceResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ServiceError::Validation(format!("Invalid request body: {}", e)))
}

/// Start a new game.
///
/// # Request Body
///
/// Optional. `{"maxAttempts": 8}` overrides the configured default.
///
/// # Response
///
/// Returns `201 Created`:
/// ```json
/// {
///   "id": "6f1d3c0e-...",
///   "maskedWord": "_ _ _ _ _ _ _ _",
///   "failedAttempts": 0,
///   "maxAttempts": 6,
///   "status": "ACTIVE",
///   "guessedLetters": [],
///   "message": "Game started successfully"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `maxAttempts` out of range or malformed body
/// - `500 Internal Server Error`: Store failure
pub async fn start_game(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<GameResponse>)> {
    let request: StartGameRequest =
        parse_body(&body).map_err(|e| error_response(&request_id, e))?;

    let game = state
        .game_service
        .start_game(request.max_attempts)
        .await
        .map_err(|e| error_response(&request_id, e))?;

    metrics::games_started_total();
    Ok((
        StatusCode::CREATED,
        Json(GameResponse::from_game(&game, GAME_STARTED_MESSAGE)),
    ))
}

/// Guess a letter, game ID in the body.
///
/// # Request Body
///
/// ```json
/// {"id": "6f1d3c0e-...", "letter": "a"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing field, invalid letter, or game already over
/// - `404 Not Found`: Game doesn't exist
/// - `409 Conflict`: Another guess on the same game was saved first
pub async fn guess(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Bytes,
) -> ApiResult<Json<GameResponse>> {
    let request: GuessRequest = parse_body(&body).map_err(|e| error_response(&request_id, e))?;
    let id = request.id.unwrap_or_default();
    let letter = request.letter.unwrap_or_default();

    apply_guess(&state, &request_id, &id, &letter).await
}

/// Guess a letter, game ID in the path.
///
/// # Path Parameters
///
/// - `id`: Game ID (UUID)
///
/// # Request Body
///
/// ```json
/// {"letter": "a"}
/// ```
pub async fn guess_by_path(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<GameResponse>> {
    let request: LetterRequest = parse_body(&body).map_err(|e| error_response(&request_id, e))?;
    let letter = request.letter.unwrap_or_default();

    apply_guess(&state, &request_id, &id, &letter).await
}

async fn apply_guess(
    state: &AppState,
    request_id: &RequestId,
    id: &str,
    letter: &str,
) -> ApiResult<Json<GameResponse>> {
    match state.game_service.guess(id, letter).await {
        Ok(report) => {
            metrics::guesses_total(report.outcome.reason.as_str());
            if report.outcome.game_over {
                let game = &report.game;
                metrics::games_finished_total(game.status().as_str());
                logging::log_game_finished(
                    &game.id().to_string(),
                    game.status().as_str(),
                    game.failed_attempts(),
                    game.max_attempts(),
                );
            }
            Ok(Json(GameResponse::from_report(&report)))
        }
        Err(e) => {
            metrics::guesses_rejected_total(e.code());
            Err(error_response(request_id, e))
        }
    }
}

/// Get the current state of a game.
///
/// # Path Parameters
///
/// - `id`: Game ID (UUID)
///
/// # Errors
///
/// - `404 Not Found`: Game doesn't exist or the ID is malformed
pub async fn get_game(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> ApiResult<Json<GameResponse>> {
    let game = state
        .game_service
        .get_game(&id)
        .await
        .map_err(|e| error_response(&request_id, e))?;

    Ok(Json(GameResponse::from_game(&game, "")))
}
