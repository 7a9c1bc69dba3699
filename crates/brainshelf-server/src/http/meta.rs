use std::convert::Infallible;

use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use brainshelf_core::domain::{KNOWN_CATEGORIES, KNOWN_PRICING};
use futures::Stream;
use serde::Serialize;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::warn;

use crate::state::AppState;

#[derive(Serialize)]
pub struct MetaResponse {
    categories: &'static [&'static str],
    pricing: &'static [&'static str],
}

/// `GET /meta`
pub async fn meta() -> Json<MetaResponse> {
    Json(MetaResponse {
        categories: KNOWN_CATEGORIES,
        pricing: KNOWN_PRICING,
    })
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

/// `GET /events`
///
/// 購読者ごとに broadcast を購読し、SSE として流す。
/// 取りこぼした分は捨てて最新から続ける。
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(|received| {
        match received {
            Ok(event) => Event::default().json_data(&event).ok().map(Ok),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(skipped, "event subscriber lagged");
                None
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
