use tracing::info;

use crate::{
    dto::game::{
        GameSummary, RoundResultResponse, StandingEntry, StandingsResponse, StartGameRequest,
        SubmitRoundRequest,
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        game::GameState,
        round::RoundSubmission,
        standings::standings,
        state_machine::GameEvent,
    },
};

/// Current game, whatever its phase.
pub async fn get_game(state: &SharedState) -> GameSummary {
    GameSummary::from(&state.current_game().await)
}

/// Start a game from the submitted roster; only allowed during setup.
pub async fn start_game(
    state: &SharedState,
    request: StartGameRequest,
) -> Result<GameSummary, ServiceError> {
    let config = state.config();
    let target_score = request
        .target_score
        .unwrap_or_else(|| config.default_target_score());

    let (summary, _) = state
        .run_transition(
            GameEvent::Start,
            |_| {
                let game = GameState::start(
                    &request.players,
                    target_score,
                    config.colors(),
                    config.limits(),
                )?;
                let summary = GameSummary::from(&game);
                Ok((game, summary))
            },
            |game, _| sse_events::broadcast_game_started(state, game),
        )
        .await?;

    info!(
        players = summary.players.len(),
        target = summary.target_score,
        "game started"
    );
    Ok(summary)
}

/// Record one round; the whole round is refused when any entry is wrong.
pub async fn submit_round(
    state: &SharedState,
    request: SubmitRoundRequest,
) -> Result<RoundResultResponse, ServiceError> {
    let submission = RoundSubmission::from(request);

    let (outcome, _) = state
        .run_transition(
            GameEvent::SubmitRound,
            |game| {
                let outcome = game.resolve_round(&submission)?;
                Ok((outcome.game.clone(), outcome))
            },
            |_, outcome| sse_events::broadcast_round_resolved(state, outcome),
        )
        .await?;

    info!(
        round = outcome.round,
        winner = %outcome.round_winner_id,
        points = outcome.points_awarded,
        ended = outcome.ended_game(),
        "round recorded"
    );
    if let Some(winner) = outcome.game.winner() {
        info!(winner = %winner.id, score = winner.score, "game won");
    }

    Ok(RoundResultResponse::from(&outcome))
}

/// Discard the game and go back to setup, keeping the configured default target.
pub async fn reset_game(state: &SharedState) -> Result<GameSummary, ServiceError> {
    let target_score = state.config().default_target_score();

    let (summary, _) = state
        .run_transition(
            GameEvent::Reset,
            |_| {
                let game = GameState::idle(target_score);
                let summary = GameSummary::from(&game);
                Ok((game, summary))
            },
            |game, _| sse_events::broadcast_game_reset(state, game),
        )
        .await?;

    info!("game reset");
    Ok(summary)
}

/// Scoreboard of the current game, best score first.
pub async fn get_standings(state: &SharedState) -> StandingsResponse {
    let game = state.current_game().await;
    StandingsResponse {
        phase: game.phase().into(),
        target_score: game.target_score,
        current_round: game.current_round,
        standings: standings(&game.players, game.target_score)
            .into_iter()
            .map(StandingEntry::from)
            .collect(),
    }
}
