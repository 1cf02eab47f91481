//! Check-in endpoints.
//!
//! Generation streams `CheckInStreamEvent`s as server-sent events, one
//! `data: {json}` frame per event.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::Stream;
use serde::Deserialize;

use cadence_ai::DEFAULT_HISTORY_LIMIT;
use cadence_core::checkins::{CheckIn, CheckInEligibility};

use crate::{
    auth::{Caller, MaybeCaller},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const MAX_HISTORY_LIMIT: i64 = 100;

/// POST /api/v1/check-ins/generate
///
/// Never rejects at the HTTP layer: an unauthenticated caller gets a stream
/// holding a single 401 `error` event.
async fn generate_check_in(
    State(state): State<Arc<AppState>>,
    MaybeCaller(user_id): MaybeCaller,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let events = state.check_in_service.generate(user_id);
    let stream = tokio_stream::StreamExt::filter_map(events, |event| {
        match SseEvent::default().json_data(&event) {
            Ok(sse_event) => Some(Ok(sse_event)),
            Err(err) => {
                tracing::error!(
                    "Failed to serialize check-in event {:?}: {}",
                    event.status,
                    err
                );
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

async fn get_eligibility(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
) -> ApiResult<Json<CheckInEligibility>> {
    Ok(Json(state.check_in_service.eligibility(&user_id)?))
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

async fn list_check_ins(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<CheckIn>>> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if limit < 1 {
        return Err(ApiError::BadRequest(
            "limit must be a positive number".to_string(),
        ));
    }
    let check_ins = state
        .check_in_service
        .list_check_ins(&user_id, limit.min(MAX_HISTORY_LIMIT))?;
    Ok(Json(check_ins))
}

async fn get_check_in(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
) -> ApiResult<Json<CheckIn>> {
    state
        .check_in_service
        .get_check_in(&user_id, &id)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/check-ins", get(list_check_ins))
        .route("/check-ins/generate", post(generate_check_in))
        .route("/check-ins/eligibility", get(get_eligibility))
        .route("/check-ins/{id}", get(get_check_in))
}
