use serde::Serialize;
use tracing::warn;

use crate::{
    dto::sse::{
        AnswerWrongEvent, GameSolvedEvent, GameStartedEvent, RosterExhaustedEvent, ServerEvent,
        StatusChangedEvent, StudentPickedEvent, TileRevealedEvent,
    },
    state::{AppState, SseHub, events::QuizEvent, state_machine::GameStatus},
};

/// Forward quiz notifications to every SSE subscriber, in emission order.
pub fn broadcast_quiz_events(state: &AppState, events: &[QuizEvent]) {
    for event in events {
        broadcast_quiz_event(state.events(), event);
    }
}

fn broadcast_quiz_event(hub: &SseHub, event: &QuizEvent) {
    let name = event.name();
    match event {
        QuizEvent::Started {
            session_id,
            grade,
            tile_count,
        } => send_event(
            hub,
            name,
            &GameStartedEvent {
                session_id: *session_id,
                grade: *grade,
                tile_count: *tile_count,
            },
        ),
        QuizEvent::TileRevealed {
            position,
            slot,
            letter,
            revealed,
            total,
        } => send_event(
            hub,
            name,
            &TileRevealedEvent {
                position: *position,
                slot: *slot,
                letter: letter.to_string(),
                revealed: *revealed,
                total: *total,
            },
        ),
        QuizEvent::WrongAnswer { position } => send_event(
            hub,
            name,
            &AnswerWrongEvent {
                position: *position,
            },
        ),
        QuizEvent::AllRevealed => send_status(hub, name, GameStatus::Revealed),
        QuizEvent::Solved { keyword } => send_event(
            hub,
            name,
            &GameSolvedEvent {
                keyword: keyword.clone(),
            },
        ),
        QuizEvent::ProgressReset => send_status(hub, name, GameStatus::Playing),
        QuizEvent::BackToSetup => send_status(hub, name, GameStatus::Setup),
        QuizEvent::StudentPicked { name: student, remaining } => send_event(
            hub,
            name,
            &StudentPickedEvent {
                name: student.clone(),
                remaining: *remaining,
            },
        ),
        QuizEvent::RosterExhausted => {
            send_event(hub, name, &RosterExhaustedEvent { remaining: 0 })
        }
    }
}

fn send_status(hub: &SseHub, event: &str, status: GameStatus) {
    send_event(hub, event, &StatusChangedEvent { status });
}

fn send_event(hub: &SseHub, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[tokio::test]
    async fn events_reach_subscribers_in_order() {
        let state = AppState::new(AppConfig::default(), None);
        let mut receiver = state.events().subscribe();

        broadcast_quiz_events(
            &state,
            &[
                QuizEvent::TileRevealed {
                    position: 1,
                    slot: 0,
                    letter: 'I',
                    revealed: 1,
                    total: 2,
                },
                QuizEvent::AllRevealed,
            ],
        );

        let first = receiver.recv().await.unwrap();
        assert_eq!(first.event.as_deref(), Some("tile.revealed"));
        let payload: serde_json::Value = serde_json::from_str(&first.data).unwrap();
        assert_eq!(payload["letter"], "I");
        assert_eq!(payload["slot"], 0);

        let second = receiver.recv().await.unwrap();
        assert_eq!(second.event.as_deref(), Some("game.revealed"));
        assert_eq!(second.data, r#"{"status":"revealed"}"#);
    }
}
