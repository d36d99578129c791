//! HTTP client for a remote MeetSync server

use anyhow::{Error, Result};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};

use crate::api::public::ErrorResponse;
use crate::api::public::events::{RegisterParticipantRequest, SaveAvailabilityRequest};
use crate::api::public::health::HealthResponse;
use crate::core::MeetError;
use crate::schedule::{AvailabilityMap, DateSlots, Event, NewEvent};
use crate::store::sqlite::Participant;
use crate::store::{AvailabilityStore, EventStore};

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

// Turn error statuses into domain errors, using the server's error
// message when there is one
async fn error_for_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());
    let err = match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => MeetError::Validation(message),
        StatusCode::NOT_FOUND => MeetError::NotFound(message),
        _ => MeetError::Persistence(format!("{}: {}", status, message)),
    };
    Err(Error::from(err))
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(error_for_status(resp).await?.json().await?)
    }

    pub async fn register_participant(&self, event_id: &str, username: &str) -> Result<Participant> {
        let resp = self
            .client
            .post(self.url(&format!("/api/events/{}/participants", event_id)))
            .json(&RegisterParticipantRequest {
                username: username.to_string(),
            })
            .send()
            .await?;
        Ok(error_for_status(resp).await?.json().await?)
    }

    /// Upsert one participant's slots. Dates the event doesn't have
    /// are dropped by the server.
    pub async fn save_participant_availability(
        &self,
        event_id: &str,
        username: &str,
        slots: &DateSlots,
    ) -> Result<()> {
        let resp = self
            .client
            .put(self.url(&format!("/api/events/{}/availability", event_id)))
            .json(&SaveAvailabilityRequest {
                username: username.to_string(),
                slots: slots.clone(),
            })
            .send()
            .await?;
        error_for_status(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl EventStore for ApiClient {
    async fn create_event(&self, new_event: NewEvent) -> Result<Event> {
        let resp = self
            .client
            .post(self.url("/api/events"))
            .json(&new_event)
            .send()
            .await?;
        Ok(error_for_status(resp).await?.json().await?)
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let resp = self
            .client
            .get(self.url(&format!("/api/events/{}", id)))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(error_for_status(resp).await?.json().await?))
    }
}

#[async_trait]
impl AvailabilityStore for ApiClient {
    async fn get(&self, event_id: &str) -> Result<AvailabilityMap> {
        let resp = self
            .client
            .get(self.url(&format!("/api/events/{}/availability", event_id)))
            .send()
            .await?;
        Ok(error_for_status(resp).await?.json().await?)
    }

    /// Saves participants one request at a time. Each request is
    /// atomic on the server, the map as a whole is not.
    async fn put(&self, event_id: &str, map: &AvailabilityMap) -> Result<()> {
        for (username, slots) in map.iter() {
            self.save_participant_availability(event_id, username, slots)
                .await?;
        }
        Ok(())
    }

    async fn put_participant(
        &self,
        event_id: &str,
        username: &str,
        slots: &DateSlots,
    ) -> Result<()> {
        self.save_participant_availability(event_id, username, slots)
            .await
    }
}
