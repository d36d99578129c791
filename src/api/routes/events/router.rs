//! Router for the events API

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router, http::StatusCode};

use super::public::{RegisterParticipantRequest, SaveAvailabilityRequest, SuccessResponse};
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::core::MeetError;
use crate::schedule::{AvailabilityMap, DateSlots, Event, GroupGrid, NewEvent, build_group_grid};
use crate::store::sqlite::{self, Participant};
use crate::store::{AvailabilityStore, EventStore};

type SharedState = Arc<AppState>;

// Malformed bodies are client errors with the same shape as any
// other validation failure
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, MeetError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| MeetError::Validation(rejection.body_text()))
}

async fn find_event(state: &AppState, id: &str) -> Result<Event, ApiError> {
    state
        .store
        .get_event(id)
        .await?
        .ok_or_else(|| MeetError::NotFound(String::from("Event not found")).into())
}

fn required_username(username: &str) -> Result<String, MeetError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(MeetError::Validation(String::from("Missing username")));
    }
    Ok(username.to_string())
}

/// Create an event along with its share link
async fn create_event(
    State(state): State<SharedState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let new_event = json_body(payload)?;
    let event = state.store.create_event(new_event).await?;
    tracing::info!("Created event {} with {} dates", event.id, event.dates.len());
    Ok((StatusCode::CREATED, Json(event)))
}

async fn get_event(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(find_event(&state, &id).await?))
}

async fn register_participant(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<RegisterParticipantRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Participant>), ApiError> {
    let req = json_body(payload)?;
    let username = required_username(&req.username)?;
    let event = find_event(&state, &id).await?;
    let participant = sqlite::upsert_participant(state.store.db(), event.id, username).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

async fn get_availability(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<AvailabilityMap>, ApiError> {
    let event = find_event(&state, &id).await?;
    Ok(Json(state.store.get(&event.id).await?))
}

// Keep the dates the event has, checking each has one flag per slot
fn event_slots(event: &Event, slots: DateSlots) -> Result<DateSlots, MeetError> {
    let slot_count = event.slot_count();
    let mut kept = DateSlots::new();
    for (date_key, day) in slots {
        if !event.has_date(&date_key) {
            tracing::debug!("Ignoring unknown date {} for event {}", date_key, event.id);
            continue;
        }
        if day.len() != slot_count {
            return Err(MeetError::Validation(format!(
                "Expected {} slots for {}, got {}",
                slot_count,
                date_key,
                day.len()
            )));
        }
        kept.insert(date_key, day);
    }
    Ok(kept)
}

/// Upsert one participant's slots. Dates left out of the request keep
/// their stored value.
async fn save_availability(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<SaveAvailabilityRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let req = json_body(payload)?;
    let event = find_event(&state, &id).await?;
    let username = required_username(&req.username)?;
    let slots = event_slots(&event, req.slots)?;
    sqlite::save_participant_availability(state.store.db(), event.id, username, &slots).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// The aggregated heatmap for an event
async fn get_grid(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GroupGrid>, ApiError> {
    let event = find_event(&state, &id).await?;
    let map = state.store.get(&event.id).await?;
    Ok(Json(build_group_grid(&event, &map)))
}

/// Create the events router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(create_event))
        .route("/{id}", get(get_event))
        .route("/{id}/participants", post(register_participant))
        .route(
            "/{id}/availability",
            get(get_availability).put(save_availability),
        )
        .route("/{id}/grid", get(get_grid))
}
