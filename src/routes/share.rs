use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::share::{ShareLinkQuery, ShareLinkResponse, SharedViewQuery, SharedViewResponse},
    error::{AppError, ErrorBody},
    services::share_service,
    state::SharedState,
};

/// Routes producing and reading share links.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game/share", get(share_link))
        .route("/shared", get(view_shared))
}

/// Build a link embedding the current game.
#[utoipa::path(
    get,
    path = "/game/share",
    tag = "share",
    params(ShareLinkQuery),
    responses(
        (status = 200, description = "Share link", body = ShareLinkResponse),
        (status = 409, description = "Nothing to share for this kind", body = ErrorBody)
    )
)]
pub async fn share_link(
    State(state): State<SharedState>,
    Query(query): Query<ShareLinkQuery>,
) -> Result<Json<ShareLinkResponse>, AppError> {
    let link = share_service::share_link(&state, query.kind).await?;
    Ok(Json(link))
}

/// Decode a shared game for read-only display.
#[utoipa::path(
    get,
    path = "/shared",
    tag = "share",
    params(SharedViewQuery),
    responses(
        (status = 200, description = "Shared game, or the reason it cannot be shown", body = SharedViewResponse)
    )
)]
pub async fn view_shared(Query(query): Query<SharedViewQuery>) -> Json<SharedViewResponse> {
    Json(share_service::view_shared(query))
}
