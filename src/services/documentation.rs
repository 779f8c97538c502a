use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for UNO Score Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::game::get_game,
        crate::routes::game::start_game,
        crate::routes::game::reset_game,
        crate::routes::game::submit_round,
        crate::routes::game::get_standings,
        crate::routes::share::share_link,
        crate::routes::share::view_shared,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::StartGameRequest,
            crate::dto::game::SubmitRoundRequest,
            crate::dto::game::GameSummary,
            crate::dto::game::RoundResultResponse,
            crate::dto::game::StandingsResponse,
            crate::dto::share::ShareKind,
            crate::dto::share::ShareLinkResponse,
            crate::dto::share::SharedViewResponse,
            crate::dto::sse::Handshake,
            crate::dto::sse::GameStartedEvent,
            crate::dto::sse::RoundResolvedEvent,
            crate::dto::sse::GameWonEvent,
            crate::dto::sse::GameResetEvent,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Game setup, rounds and scoreboard"),
        (name = "share", description = "Share links and shared game viewer"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
