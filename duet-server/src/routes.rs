use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use duet_core::room::RoomView;
use duet_core::{GameConfigOverrides, GuessOutcome, RoomCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::ws;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/rooms", post(create_room))
        .route("/api/rooms/:code", get(get_room))
        .route("/api/rooms/:code/join", post(join_room))
        .route("/api/rooms/:code/start", post(start_game))
        .route("/api/rooms/:code/clue", post(submit_clue))
        .route("/api/rooms/:code/guess", post(submit_guess))
        .route("/api/rooms/:code/next-turn", post(next_turn))
        .route("/api/ws/:code/:player_id", get(ws::ws_handler))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    rooms: usize,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoomRequest {
    host_id: String,
    #[serde(default)]
    config: GameConfigOverrides,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRequest {
    player_id: String,
    nickname: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActorRequest {
    player_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClueRequest {
    player_id: String,
    clue_word: String,
    clue_number: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuessRequest {
    player_id: String,
    card_position: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewerQuery {
    player_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ClueResponse {
    success: bool,
    room: RoomView,
}

#[derive(Debug, Serialize)]
struct GuessResponse {
    #[serde(flatten)]
    outcome: GuessOutcome,
    room: RoomView,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Parse a body that may be left out entirely.
fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| ApiError::bad_request(err.to_string()))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        rooms: state.service.room_count(),
        timestamp: Utc::now(),
    })
}

async fn create_room(
    State(state): State<AppState>,
    payload: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RoomView>), ApiError> {
    let request = json_body(payload)?;
    let room = state.service.create_room(&request.host_id, &request.config)?;
    Ok((
        StatusCode::CREATED,
        Json(room.view_for(Some(room.host_id()))),
    ))
}

async fn get_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<RoomView>, ApiError> {
    let room = state.service.get_room(&RoomCode::new(code))?;
    Ok(Json(room.view_for(query.player_id.as_deref())))
}

async fn join_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<JoinRequest>, JsonRejection>,
) -> Result<Json<RoomView>, ApiError> {
    let request = json_body(payload)?;
    let code = RoomCode::new(code);
    let room = state.hub.sequence(&code, || {
        let room = state
            .service
            .join_room(&code, &request.player_id, &request.nickname)?;
        state.hub.push_state(&room);
        Ok::<_, ApiError>(room)
    })?;
    Ok(Json(room.view_for(Some(request.player_id.trim()))))
}

async fn start_game(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Bytes,
) -> Result<Json<RoomView>, ApiError> {
    let request: ActorRequest = optional_body(&body)?;
    let code = RoomCode::new(code);
    let room = state.hub.sequence(&code, || {
        let room = state.service.start_game(&code)?;
        state.hub.push_state(&room);
        Ok::<_, ApiError>(room)
    })?;
    Ok(Json(room.view_for(request.player_id.as_deref())))
}

async fn submit_clue(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<ClueRequest>, JsonRejection>,
) -> Result<Json<ClueResponse>, ApiError> {
    let request = json_body(payload)?;
    let code = RoomCode::new(code);
    let submission = state.hub.sequence(&code, || {
        let submission = state.service.submit_clue(
            &code,
            &request.player_id,
            &request.clue_word,
            request.clue_number,
        )?;
        state.hub.push_state(&submission.room);
        Ok::<_, ApiError>(submission)
    })?;
    Ok(Json(ClueResponse {
        success: true,
        room: submission.room.view_for(Some(request.player_id.as_str())),
    }))
}

async fn submit_guess(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<GuessRequest>, JsonRejection>,
) -> Result<Json<GuessResponse>, ApiError> {
    let request = json_body(payload)?;
    let code = RoomCode::new(code);
    let resolution = state.hub.sequence(&code, || {
        let resolution = state
            .service
            .process_guess(&code, &request.player_id, request.card_position)?
            .ok_or(ApiError::IllegalAction)?;
        state.hub.push_state(&resolution.room);
        Ok::<_, ApiError>(resolution)
    })?;
    Ok(Json(GuessResponse {
        outcome: resolution.outcome,
        room: resolution.room.view_for(Some(request.player_id.as_str())),
    }))
}

async fn next_turn(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Bytes,
) -> Result<Json<RoomView>, ApiError> {
    let request: ActorRequest = optional_body(&body)?;
    let code = RoomCode::new(code);
    let room = state.hub.sequence(&code, || {
        let room = state.service.next_turn(&code)?;
        state.hub.push_state(&room);
        Ok::<_, ApiError>(room)
    })?;
    Ok(Json(room.view_for(request.player_id.as_deref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use duet_core::{CardType, InMemoryRoomStore, RoomService, WordPool};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let service = RoomService::with_seed(
            Arc::new(InMemoryRoomStore::new()),
            WordPool::standard(),
            17,
        );
        AppState::new(Arc::new(service), Duration::from_millis(10))
    }

    async fn call(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn started_room(state: &AppState) -> String {
        let (status, room) = call(state, "POST", "/api/rooms", Some(json!({"hostId": "p1"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let code = room["roomCode"].as_str().unwrap().to_string();

        for (id, nick) in [("p1", "Ann"), ("p2", "Ben")] {
            let (status, _) = call(
                state,
                "POST",
                &format!("/api/rooms/{}/join", code),
                Some(json!({"playerId": id, "nickname": nick})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, room) = call(state, "POST", &format!("/api/rooms/{}/start", code), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(room["status"], "ACTIVE");
        code
    }

    #[tokio::test]
    async fn test_health() {
        let state = test_state();
        let (status, body) = call(&state, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["rooms"], 0);
    }

    #[tokio::test]
    async fn test_create_room_with_config() {
        let state = test_state();
        let (status, body) = call(
            &state,
            "POST",
            "/api/rooms",
            Some(json!({"hostId": "p1", "config": {"maxTurns": 5}})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "WAITING");
        assert_eq!(body["hostId"], "p1");
        assert_eq!(body["config"]["maxTurns"], 5);
        assert_eq!(body["config"]["gridSize"], 5);
    }

    #[tokio::test]
    async fn test_create_room_errors() {
        let state = test_state();

        let (status, body) = call(&state, "POST", "/api/rooms", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION");

        let (status, body) = call(
            &state,
            "POST",
            "/api/rooms",
            Some(json!({"hostId": "p1", "config": {"gridSize": 2}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION");
    }

    #[tokio::test]
    async fn test_unknown_room() {
        let state = test_state();
        let (status, body) = call(&state, "GET", "/api/rooms/ZZZZZZ", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_join_full_and_start_not_ready() {
        let state = test_state();
        let (_, room) = call(&state, "POST", "/api/rooms", Some(json!({"hostId": "p1"}))).await;
        let code = room["roomCode"].as_str().unwrap().to_string();
        call(
            &state,
            "POST",
            &format!("/api/rooms/{}/join", code),
            Some(json!({"playerId": "p1", "nickname": "Ann"})),
        )
        .await;

        let (status, body) = call(&state, "POST", &format!("/api/rooms/{}/start", code), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "NOT_READY");

        call(
            &state,
            "POST",
            &format!("/api/rooms/{}/join", code),
            Some(json!({"playerId": "p2", "nickname": "Ben"})),
        )
        .await;
        let (status, body) = call(
            &state,
            "POST",
            &format!("/api/rooms/{}/join", code.to_lowercase()),
            Some(json!({"playerId": "p3", "nickname": "Cat"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "ROOM_FULL");
    }

    #[tokio::test]
    async fn test_get_room_is_scoped() {
        let state = test_state();
        let code = started_room(&state).await;

        let (_, anonymous) = call(&state, "GET", &format!("/api/rooms/{}", code), None).await;
        assert!(anonymous["keyMaps"][0]["cards"][0].get("cardType").is_none());

        let (_, giver) = call(&state, "GET", &format!("/api/rooms/{}?playerId=p1", code), None).await;
        assert_eq!(giver["viewerId"], "p1");
        assert!(giver["keyMaps"][0]["cards"][0].get("cardType").is_some());
    }

    #[tokio::test]
    async fn test_clue_guess_and_next_turn() {
        let state = test_state();
        let code = started_room(&state).await;

        let (status, body) = call(
            &state,
            "POST",
            &format!("/api/rooms/{}/clue", code),
            Some(json!({"playerId": "p2", "clueWord": "river", "clueNumber": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION");

        let (status, body) = call(
            &state,
            "POST",
            &format!("/api/rooms/{}/clue", code),
            Some(json!({"playerId": "p1", "clueWord": "river", "clueNumber": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["room"]["clueGiven"]["word"], "RIVER");

        let room = state.service.get_room(&RoomCode::new(&code)).unwrap();
        let green = room.key_map("p2").unwrap().positions_of(CardType::Green)[0];

        let (status, body) = call(
            &state,
            "POST",
            &format!("/api/rooms/{}/guess", code),
            Some(json!({"playerId": "p2", "cardPosition": green})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "CORRECT");
        assert_eq!(body["cardType"], "GREEN");
        assert_eq!(body["guessesUsed"], 1);
        assert_eq!(body["turnOver"], true);
        assert_eq!(body["room"]["revealedCards"], json!([green]));

        let (status, body) = call(
            &state,
            "POST",
            &format!("/api/rooms/{}/guess", code),
            Some(json!({"playerId": "p2", "cardPosition": green})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ILLEGAL_ACTION");

        let (status, body) = call(
            &state,
            "POST",
            &format!("/api/rooms/{}/next-turn", code),
            Some(json!({"playerId": "p2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentTurn"], 1);
        assert_eq!(body["currentPhase"], "CLUE");
        assert_eq!(body["activePlayerId"], "p2");
    }

    #[tokio::test]
    async fn test_malformed_guess_body() {
        let state = test_state();
        let code = started_room(&state).await;
        let (status, body) = call(
            &state,
            "POST",
            &format!("/api/rooms/{}/guess", code),
            Some(json!({"playerId": "p2", "cardPosition": "first"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION");
    }
}
