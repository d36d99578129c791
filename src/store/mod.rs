//! Repositories for events and availability
//!
//! Every backend hands the aggregation layer a complete map. A
//! participant only ever writes their own entry through
//! [`AvailabilityStore::put_participant`]; the last writer for that
//! participant wins.

pub mod fallback;
pub mod local;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::schedule::{AvailabilityMap, DateSlots, Event, NewEvent};

pub use fallback::FallbackStore;
pub use local::LocalCache;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Validate and persist a new event, assigning its id
    async fn create_event(&self, new_event: NewEvent) -> Result<Event>;

    /// `None` when no event has this id
    async fn get_event(&self, id: &str) -> Result<Option<Event>>;
}

#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    /// The map for an event, empty when nothing was saved yet
    async fn get(&self, event_id: &str) -> Result<AvailabilityMap>;

    /// Save every entry in `map`. `LocalCache` replaces its snapshot
    /// with `map`. `SqliteStore` and `ApiClient` upsert one row per
    /// participant and date, so participants and dates missing from
    /// `map` keep their stored values.
    async fn put(&self, event_id: &str, map: &AvailabilityMap) -> Result<()>;

    /// Save one participant's slots, leaving everyone else untouched.
    /// Dates missing from `slots` keep their stored values on the
    /// server and are replaced in the local snapshot.
    async fn put_participant(
        &self,
        event_id: &str,
        username: &str,
        slots: &DateSlots,
    ) -> Result<()>;
}

#[async_trait]
impl<T: EventStore + ?Sized> EventStore for &T {
    async fn create_event(&self, new_event: NewEvent) -> Result<Event> {
        (**self).create_event(new_event).await
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        (**self).get_event(id).await
    }
}

#[async_trait]
impl<T: AvailabilityStore + ?Sized> AvailabilityStore for &T {
    async fn get(&self, event_id: &str) -> Result<AvailabilityMap> {
        (**self).get(event_id).await
    }

    async fn put(&self, event_id: &str, map: &AvailabilityMap) -> Result<()> {
        (**self).put(event_id, map).await
    }

    async fn put_participant(
        &self,
        event_id: &str,
        username: &str,
        slots: &DateSlots,
    ) -> Result<()> {
        (**self).put_participant(event_id, username, slots).await
    }
}
