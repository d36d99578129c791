//! Public types for the events API

use serde::{Deserialize, Serialize};

use crate::schedule::DateSlots;

/// Request to join an event under a display name
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterParticipantRequest {
    pub username: String,
}

/// One participant's slots for some or all of the event's dates
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveAvailabilityRequest {
    pub username: String,
    pub slots: DateSlots,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}
