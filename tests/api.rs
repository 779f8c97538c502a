use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use uno_score_back::{
    build_router,
    config::AppConfig,
    dao::game_store::memory::MemoryGameStore,
    services::snapshot_service::{self, RestoreOutcome},
    state::AppState,
};

fn app_with(store: MemoryGameStore) -> Router {
    build_router(AppState::new(AppConfig::default(), Arc::new(store)))
}

fn app() -> Router {
    app_with(MemoryGameStore::new())
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn start(app: &Router, players: Value) -> (StatusCode, Value) {
    call(app, Method::POST, "/game", Some(json!({ "players": players }))).await
}

#[tokio::test]
async fn full_game_to_a_winner() {
    let app = app();

    let (status, game) = start(&app, json!(["Ann", "Bob"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["phase"], "in_progress");
    assert_eq!(game["target_score"], 250);
    assert_eq!(game["players"][0]["id"], "player-0");
    assert_eq!(game["players"][1]["color"], "#FFD700");

    let (status, round) = call(
        &app,
        Method::POST,
        "/game/rounds",
        Some(json!({"winner_id": "player-0", "scores": {"player-1": 30}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(round["round"], 1);
    assert_eq!(round["points_awarded"], 30);
    assert_eq!(round["game"]["players"][0]["score"], 30);
    assert_eq!(round["game"]["players"][1]["score"], 0);
    assert_eq!(round["game"]["current_round"], 2);
    assert_eq!(round["game_ended"], false);

    let (status, round) = call(
        &app,
        Method::POST,
        "/game/rounds",
        Some(json!({"winner_id": "player-1", "scores": {"player-0": "300"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(round["game_ended"], true);
    assert_eq!(round["game"]["phase"], "finished");
    assert_eq!(round["game"]["winner"]["id"], "player-1");
    assert_eq!(round["game"]["winner"]["score"], 300);

    let (status, _) = call(
        &app,
        Method::POST,
        "/game/rounds",
        Some(json!({"winner_id": "player-0", "scores": {"player-1": 5}})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, board) = call(&app, Method::GET, "/game/standings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["standings"][0]["player"]["name"], "Bob");
    assert_eq!(board["standings"][0]["progress_percent"], 100);
    assert_eq!(board["standings"][1]["points_to_win"], 220);
}

#[tokio::test]
async fn roster_rules() {
    let app = app();

    let (status, body) = start(&app, json!(["Ann", "", "  "])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("at least 2"));

    let (status, _) = start(&app, json!(["a", "b", "c", "d", "e", "f", "g", "h", "i"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/game",
        Some(json!({"players": ["Ann", "Bob"], "target_score": 20})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, game) = start(&app, json!(["Ann", " Bob ", "", "", "", "", "", ""])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["players"].as_array().unwrap().len(), 2);
    assert_eq!(game["players"][1]["name"], "Bob");

    let (status, _) = start(&app, json!(["Cid", "Dan"])).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn bad_rounds_report_field_errors() {
    let app = app();
    start(&app, json!(["Ann", "Bob", "Cid"])).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/game/rounds",
        Some(json!({"scores": {"player-1": 3, "player-2": 4}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please select a round winner");

    let (status, body) = call(
        &app,
        Method::POST,
        "/game/rounds",
        Some(json!({"winner_id": "player-0", "scores": {"player-1": -2, "player-2": null}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"]["player-1"], "Must be a non-negative number");
    assert_eq!(body["fields"]["player-2"], "Score required");

    let (_, game) = call(&app, Method::GET, "/game", None).await;
    assert_eq!(game["current_round"], 1);
    assert!(
        game["players"]
            .as_array()
            .unwrap()
            .iter()
            .all(|player| player["score"] == 0)
    );
}

#[tokio::test]
async fn reset_clears_game_and_snapshot() {
    let store = MemoryGameStore::new();
    let app = app_with(store.clone());

    start(&app, json!(["Ann", "Bob"])).await;
    assert!(store.raw().unwrap().is_some());

    let (status, game) = call(&app, Method::DELETE, "/game", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["phase"], "setup");
    assert!(game["players"].as_array().unwrap().is_empty());
    assert!(store.raw().unwrap().is_none());
}

#[tokio::test]
async fn share_link_round_trips_through_the_viewer() {
    let app = app();
    start(&app, json!(["Ann", "Bob"])).await;
    call(
        &app,
        Method::POST,
        "/game/rounds",
        Some(json!({"winner_id": "player-1", "scores": {"player-0": 260}})),
    )
    .await;

    let (status, link) = call(&app, Method::GET, "/game/share?type=winner", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(link["title"], "🏆 Bob Won UNO!");
    assert_eq!(link["text"], "Bob just won our UNO game with 260 points!");

    let url = Url::parse(link["url"].as_str().unwrap()).unwrap();
    let query = url.query().unwrap();
    let (status, view) = call(&app, Method::GET, &format!("/shared?{query}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "valid");
    assert_eq!(view["kind"], "winner");
    assert_eq!(view["winner"]["name"], "Bob");
    assert_eq!(view["runners_up"][0]["player"]["name"], "Ann");
    assert!(view["roast"].as_str().is_some());
    assert_eq!(view["round"], 2);
}

#[tokio::test]
async fn share_needs_a_game() {
    let app = app();
    let (status, _) = call(&app, Method::GET, "/game/share", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    start(&app, json!(["Ann", "Bob"])).await;
    let (status, _) = call(&app, Method::GET, "/game/share?type=winner", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, link) = call(&app, Method::GET, "/game/share?type=game", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(link["title"], "🎮 UNO Game in Progress");
    assert_eq!(link["text"], "Join our UNO game! Currently on round 1");
}

#[tokio::test]
async fn malformed_shared_payload_is_invalid_not_an_error() {
    let app = app();
    let (status, view) = call(&app, Method::GET, "/shared?shared=%7Bbroken&type=game", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "invalid");
    assert!(view["reason"].as_str().is_some());

    let (status, view) = call(&app, Method::GET, "/shared", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "invalid");
}

#[tokio::test]
async fn malformed_snapshot_at_boot_falls_back_to_setup() {
    let store = MemoryGameStore::with_raw(r#"{"players": 3"#);
    let state = AppState::new(AppConfig::default(), Arc::new(store.clone()));

    assert_eq!(
        snapshot_service::restore(&state).await,
        RestoreOutcome::Discarded
    );
    let app = build_router(state);
    let (status, game) = call(&app, Method::GET, "/game", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["phase"], "setup");
    assert!(store.raw().unwrap().is_none());
}

#[tokio::test]
async fn healthcheck_reports_ok() {
    let (status, body) = call(&app(), Method::GET, "/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
