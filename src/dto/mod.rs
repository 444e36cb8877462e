use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod game;
pub mod health;
pub mod setup;
pub mod sse;
pub mod validation;

/// RFC 3339 rendering used for `started_at`.
fn format_system_time(at: SystemTime) -> String {
    match OffsetDateTime::from(at).format(&Rfc3339) {
        Ok(text) => text,
        Err(_) => String::from("unknown"),
    }
}
