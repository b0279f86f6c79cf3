//! Push channel: one WebSocket per player per room.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use duet_core::{ErrorKind, RoomCode};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::error::ApiError;
use crate::hub::Outbox;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::AppState;

pub async fn ws_handler(
    State(state): State<AppState>,
    Path((code, player_id)): Path<(String, String)>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let code = RoomCode::new(code);
    let room = state.service.get_room(&code)?;
    if room.player(&player_id).is_none() {
        return Err(ApiError::Forbidden(format!(
            "player {} is not in room {}",
            player_id, code
        )));
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(state, code, player_id, socket)))
}

async fn handle_socket(state: AppState, code: RoomCode, player_id: String, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let connection = state.hub.register(&code, &player_id, tx.clone());
    tracing::info!("Player {} connected to room {}", player_id, code);

    let forward = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!("Failed to encode outbound message: {}", err);
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    state.hub.sequence(&code, || {
        match state.service.mark_connected(&code, &player_id, true) {
            Ok(()) => {
                if let Ok(room) = state.service.get_room(&code) {
                    state.hub.push_state(&room);
                }
            }
            Err(err) => {
                let _ = tx.send(ServerMessage::from(&err));
            }
        }
    });

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(err) => {
                tracing::debug!("Socket error for {} in room {}: {}", player_id, code, err);
                break;
            }
        };

        match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => handle_message(&state, &code, &player_id, &tx, message),
            Err(err) => {
                let _ = tx.send(ServerMessage::error(
                    format!("Bad message: {}", err),
                    ErrorKind::Validation,
                ));
            }
        }
    }

    forward.abort();
    tracing::info!("Player {} disconnected from room {}", player_id, code);

    // A newer socket for the same player keeps the player connected.
    if state.hub.unregister(&code, &player_id, connection) {
        state.hub.sequence(&code, || {
            if state.service.mark_connected(&code, &player_id, false).is_ok() {
                if let Ok(room) = state.service.get_room(&code) {
                    state.hub.push_state(&room);
                }
            }
        });
    }
}

/// Apply one inbound message. Replies meant only for the sender go to `tx`.
pub fn handle_message(
    state: &AppState,
    code: &RoomCode,
    player_id: &str,
    tx: &Outbox,
    message: ClientMessage,
) {
    state
        .hub
        .sequence(code, || apply_message(state, code, player_id, tx, message));
}

fn apply_message(
    state: &AppState,
    code: &RoomCode,
    player_id: &str,
    tx: &Outbox,
    message: ClientMessage,
) {
    match message {
        ClientMessage::Clue {
            clue_word,
            clue_number,
        } => match state
            .service
            .submit_clue(code, player_id, &clue_word, clue_number)
        {
            Ok(submission) => {
                let clue = submission.clue;
                state
                    .hub
                    .broadcast_with(&submission.room, |room| ServerMessage::ClueSubmitted {
                        player_id: player_id.to_string(),
                        clue: clue.clone(),
                        room,
                    });
            }
            Err(err) => {
                let _ = tx.send(ServerMessage::from(&err));
            }
        },
        ClientMessage::Guess { card_position } => {
            match state.service.process_guess(code, player_id, card_position) {
                Ok(Some(resolution)) => {
                    let outcome = resolution.outcome;
                    let room = resolution.room;
                    state.hub.broadcast_with(&room, |view| ServerMessage::GuessResult {
                        player_id: player_id.to_string(),
                        card_position: outcome.position,
                        outcome: outcome.outcome,
                        card_type: outcome.card_type,
                        game_status: outcome.status,
                        guesses_used: outcome.guesses_used,
                        guesses_allowed: outcome.guesses_allowed,
                        room: view,
                    });

                    if room.is_finished() {
                        state.hub.announce_turn(&room);
                    } else if outcome.turn_over {
                        schedule_turn_advance(state.clone(), code.clone(), room.current_turn());
                    }
                }
                Ok(None) => {
                    tracing::debug!(
                        "Dropped illegal guess {} from {} in room {}",
                        card_position,
                        player_id,
                        code
                    );
                }
                Err(err) => {
                    let _ = tx.send(ServerMessage::from(&err));
                }
            }
        }
        ClientMessage::NextTurn => match state.service.next_turn(code) {
            Ok(room) => state.hub.announce_turn(&room),
            Err(err) => {
                let _ = tx.send(ServerMessage::from(&err));
            }
        },
        ClientMessage::Heartbeat => {
            if let Err(err) = state.service.record_heartbeat(code, player_id) {
                tracing::debug!("Heartbeat from {} ignored: {}", player_id, err);
            }
            let _ = tx.send(ServerMessage::Pong);
        }
    }
}

/// Advance the turn after the configured pause, unless someone already did.
fn schedule_turn_advance(state: AppState, code: RoomCode, turn: u32) {
    tokio::spawn(async move {
        tokio::time::sleep(state.turn_advance_delay).await;
        state
            .hub
            .sequence(&code, || match state.service.next_turn_from(&code, turn) {
                Ok(Some(room)) => state.hub.announce_turn(&room),
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!("Delayed turn advance in room {} skipped: {}", code, err);
                }
            });
    });
}
