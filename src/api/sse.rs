//! Server-Sent Events support

use crate::runtime::SessionUpdate;
use crate::state_machine::SessionSnapshot;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Snapshot first, then live updates
pub fn sse_stream(
    snapshot: SessionSnapshot,
    broadcast_rx: tokio::sync::broadcast::Receiver<SessionUpdate>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move {
        let data = json!({ "type": "init", "session": snapshot });
        Ok(Event::default().event("init").data(data.to_string()))
    });

    let updates = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(update) => Some(Ok(update_to_event(update))),
        Err(_) => None, // Skip lagged updates
    });

    Sse::new(init.chain(updates)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn update_to_event(update: SessionUpdate) -> Event {
    let (event_type, data) = match update {
        SessionUpdate::Message { message } => (
            "message",
            json!({
                "type": "message",
                "message": message
            }),
        ),
        SessionUpdate::StateChange {
            state,
            current_index,
        } => (
            "state_change",
            json!({
                "type": "state_change",
                "state": state,
                "currentIndex": current_index
            }),
        ),
        SessionUpdate::Timer { timer } => (
            "timer",
            json!({
                "type": "timer",
                "timer": timer
            }),
        ),
        SessionUpdate::Error { message } => (
            "error",
            json!({
                "type": "error",
                "message": message
            }),
        ),
    };

    Event::default().event(event_type).data(data.to_string())
}
