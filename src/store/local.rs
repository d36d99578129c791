//! Local JSON snapshot cache
//!
//! Keeps the last known event and availability map for each event id
//! on disk so the client keeps working when the server is unreachable.
//! Each file is a full snapshot that is overwritten on save.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::fs;

use super::{AvailabilityStore, EventStore};
use crate::core::MeetError;
use crate::schedule::{AvailabilityMap, DateSlots, Event, NewEvent, generate_event_id};

const EVENT_PREFIX: &str = "event-";
const AVAIL_PREFIX: &str = "avail-";
const USER_PREFIX: &str = "user-";

#[derive(Clone, Debug)]
pub struct LocalCache {
    dir: PathBuf,
}

// Ids become file names so only allow characters that can't escape
// the cache directory
fn is_valid_key(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, prefix: &str, id: &str, ext: &str) -> Result<PathBuf, MeetError> {
        if !is_valid_key(id) {
            return Err(MeetError::Validation(format!("Invalid event id \"{}\"", id)));
        }
        Ok(self.dir.join(format!("{}{}.{}", prefix, id, ext)))
    }

    async fn write(&self, path: PathBuf, contents: String) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create cache dir {}", self.dir.display()))?;
        fs::write(&path, contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    async fn read_string(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    // A snapshot that can't be parsed is treated as missing
    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        let Some(contents) = self.read_string(path).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!("Ignoring unreadable cache file {}: {}", path.display(), err);
                Ok(None)
            }
        }
    }

    pub async fn save_event(&self, event: &Event) -> Result<()> {
        let path = self.path(EVENT_PREFIX, &event.id, "json")?;
        self.write(path, serde_json::to_string(event)?).await
    }

    pub async fn load_event(&self, id: &str) -> Result<Option<Event>> {
        match self.path(EVENT_PREFIX, id, "json") {
            Ok(path) => self.read_json(&path).await,
            Err(_) => Ok(None),
        }
    }

    pub async fn save_availability(&self, event_id: &str, map: &AvailabilityMap) -> Result<()> {
        let path = self.path(AVAIL_PREFIX, event_id, "json")?;
        self.write(path, serde_json::to_string(map)?).await
    }

    pub async fn load_availability(&self, event_id: &str) -> Result<AvailabilityMap> {
        match self.path(AVAIL_PREFIX, event_id, "json") {
            Ok(path) => Ok(self.read_json(&path).await?.unwrap_or_default()),
            Err(_) => Ok(AvailabilityMap::new()),
        }
    }

    /// Remember which name this device responds to an event as
    pub async fn save_username(&self, event_id: &str, username: &str) -> Result<()> {
        let path = self.path(USER_PREFIX, event_id, "txt")?;
        self.write(path, username.to_string()).await
    }

    pub async fn load_username(&self, event_id: &str) -> Result<Option<String>> {
        let Ok(path) = self.path(USER_PREFIX, event_id, "txt") else {
            return Ok(None);
        };
        Ok(self
            .read_string(&path)
            .await?
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()))
    }
}

#[async_trait]
impl EventStore for LocalCache {
    async fn create_event(&self, new_event: NewEvent) -> Result<Event> {
        let new_event = new_event.validate()?;
        let event = new_event.into_event(
            generate_event_id(),
            chrono::Utc::now().timestamp_millis(),
        );
        self.save_event(&event).await?;
        Ok(event)
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        self.load_event(id).await
    }
}

#[async_trait]
impl AvailabilityStore for LocalCache {
    async fn get(&self, event_id: &str) -> Result<AvailabilityMap> {
        self.load_availability(event_id).await
    }

    async fn put(&self, event_id: &str, map: &AvailabilityMap) -> Result<()> {
        self.save_availability(event_id, map).await
    }

    // Read the snapshot back so entries saved by others since it was
    // loaded survive
    async fn put_participant(
        &self,
        event_id: &str,
        username: &str,
        slots: &DateSlots,
    ) -> Result<()> {
        let mut map = self.load_availability(event_id).await?;
        map.insert(username.to_string(), slots.clone());
        self.save_availability(event_id, &map).await
    }
}
