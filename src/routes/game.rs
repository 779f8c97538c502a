use axum::{Json, Router, extract::State, routing::get, routing::post};
use validator::Validate;

use crate::{
    dto::game::{
        GameSummary, RoundResultResponse, StandingsResponse, StartGameRequest, SubmitRoundRequest,
    },
    error::{AppError, ErrorBody},
    services::game_service,
    state::SharedState,
};

/// Routes driving the single tracked game.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game", get(get_game).post(start_game).delete(reset_game))
        .route("/game/rounds", post(submit_round))
        .route("/game/standings", get(get_standings))
}

/// Return the current game, whatever its phase.
#[utoipa::path(
    get,
    path = "/game",
    tag = "game",
    responses(
        (status = 200, description = "Current game", body = GameSummary)
    )
)]
pub async fn get_game(State(state): State<SharedState>) -> Json<GameSummary> {
    Json(game_service::get_game(&state).await)
}

/// Start a game from a list of player names.
#[utoipa::path(
    post,
    path = "/game",
    tag = "game",
    request_body = StartGameRequest,
    responses(
        (status = 200, description = "Game started", body = GameSummary),
        (status = 400, description = "Roster or target refused", body = ErrorBody),
        (status = 409, description = "A game is already running", body = ErrorBody)
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Json(payload): Json<StartGameRequest>,
) -> Result<Json<GameSummary>, AppError> {
    payload.validate()?;
    let summary = game_service::start_game(&state, payload).await?;
    Ok(Json(summary))
}

/// Discard the game and return to setup.
#[utoipa::path(
    delete,
    path = "/game",
    tag = "game",
    responses(
        (status = 200, description = "Game reset", body = GameSummary)
    )
)]
pub async fn reset_game(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    let summary = game_service::reset_game(&state).await?;
    Ok(Json(summary))
}

/// Record the outcome of a round.
#[utoipa::path(
    post,
    path = "/game/rounds",
    tag = "game",
    request_body = SubmitRoundRequest,
    responses(
        (status = 200, description = "Round recorded", body = RoundResultResponse),
        (status = 400, description = "Round winner missing or unknown", body = ErrorBody),
        (status = 409, description = "No game in progress", body = ErrorBody),
        (status = 422, description = "Score entries refused, per player", body = ErrorBody)
    )
)]
pub async fn submit_round(
    State(state): State<SharedState>,
    Json(payload): Json<SubmitRoundRequest>,
) -> Result<Json<RoundResultResponse>, AppError> {
    let result = game_service::submit_round(&state, payload).await?;
    Ok(Json(result))
}

/// Scoreboard, best score first.
#[utoipa::path(
    get,
    path = "/game/standings",
    tag = "game",
    responses(
        (status = 200, description = "Scoreboard", body = StandingsResponse)
    )
)]
pub async fn get_standings(State(state): State<SharedState>) -> Json<StandingsResponse> {
    Json(game_service::get_standings(&state).await)
}
