use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::{question::Grade, state_machine::GameStatus};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Construct an event from an already serialised payload.
    pub fn new<E>(event: E, data: String) -> Self
    where
        E: Into<Option<String>>,
    {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent when a presentation client connects.
pub struct Handshake {
    pub message: String,
    /// Whether the backend runs without a question generator.
    pub degraded: bool,
    pub status: GameStatus,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a round starts.
pub struct GameStartedEvent {
    pub session_id: Uuid,
    pub grade: Grade,
    pub tile_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a correct answer flips a tile.
pub struct TileRevealedEvent {
    pub position: usize,
    pub slot: usize,
    pub letter: String,
    pub revealed: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a wrong option was submitted.
pub struct AnswerWrongEvent {
    pub position: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the keyword is decoded.
pub struct GameSolvedEvent {
    pub keyword: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast on status changes that carry no other data.
pub struct StatusChangedEvent {
    pub status: GameStatus,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the blind bag picks a student.
pub struct StudentPickedEvent {
    pub name: String,
    pub remaining: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the blind bag is opened empty.
pub struct RosterExhaustedEvent {
    pub remaining: usize,
}
