/// OpenAPI documentation generation.
pub mod documentation;
/// Game lifecycle: start, rounds, reset and standings.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Share links and the read-only shared viewer.
pub mod share_service;
/// Boot-time restore of the persisted game.
pub mod snapshot_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
