//! Remote store with a local cache to fall back on

use anyhow::Result;
use async_trait::async_trait;

use super::{AvailabilityStore, EventStore, LocalCache};
use crate::core::MeetError;
use crate::schedule::{AvailabilityMap, DateSlots, Event, NewEvent};

/// Reads prefer the remote store and refresh the local cache. When the
/// remote store fails the cached snapshot is used instead, so creating
/// and viewing events keeps working offline. Invalid input is never
/// retried against the cache.
pub struct FallbackStore<R> {
    remote: R,
    local: LocalCache,
}

impl<R> FallbackStore<R> {
    pub fn new(remote: R, local: LocalCache) -> Self {
        Self { remote, local }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn local(&self) -> &LocalCache {
        &self.local
    }
}

#[async_trait]
impl<R: EventStore> EventStore for FallbackStore<R> {
    async fn create_event(&self, new_event: NewEvent) -> Result<Event> {
        match self.remote.create_event(new_event.clone()).await {
            Ok(event) => {
                if let Err(err) = self.local.save_event(&event).await {
                    tracing::warn!("Failed to cache event {}: {}", event.id, err);
                }
                Ok(event)
            }
            Err(err) if MeetError::is_validation(&err) => Err(err),
            Err(err) => {
                tracing::warn!("Remote unavailable, creating event locally: {}", err);
                self.local.create_event(new_event).await
            }
        }
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        match self.remote.get_event(id).await {
            Ok(Some(event)) => {
                if let Err(err) = self.local.save_event(&event).await {
                    tracing::warn!("Failed to cache event {}: {}", event.id, err);
                }
                Ok(Some(event))
            }
            // Events created while offline only exist locally
            Ok(None) => self.local.load_event(id).await,
            Err(err) => {
                tracing::warn!("Remote unavailable, loading event {} from cache: {}", id, err);
                self.local.load_event(id).await
            }
        }
    }
}

#[async_trait]
impl<R: AvailabilityStore> AvailabilityStore for FallbackStore<R> {
    async fn get(&self, event_id: &str) -> Result<AvailabilityMap> {
        match self.remote.get(event_id).await {
            Ok(map) if map.is_empty() => {
                // Nothing upstream yet, keep whatever was recorded offline
                self.local.load_availability(event_id).await
            }
            Ok(map) => {
                if let Err(err) = self.local.save_availability(event_id, &map).await {
                    tracing::warn!("Failed to cache availability for {}: {}", event_id, err);
                }
                Ok(map)
            }
            Err(err) => {
                tracing::warn!(
                    "Remote unavailable, loading availability for {} from cache: {}",
                    event_id,
                    err
                );
                self.local.load_availability(event_id).await
            }
        }
    }

    async fn put(&self, event_id: &str, map: &AvailabilityMap) -> Result<()> {
        self.local.save_availability(event_id, map).await?;
        if let Err(err) = self.remote.put(event_id, map).await {
            tracing::warn!(
                "Remote unavailable, availability for {} saved locally only: {}",
                event_id,
                err
            );
        }
        Ok(())
    }

    async fn put_participant(
        &self,
        event_id: &str,
        username: &str,
        slots: &DateSlots,
    ) -> Result<()> {
        self.local.put_participant(event_id, username, slots).await?;
        if let Err(err) = self.remote.put_participant(event_id, username, slots).await {
            tracing::warn!(
                "Remote unavailable, availability of {} for {} saved locally only: {}",
                username,
                event_id,
                err
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DateMode, SlotUpdate};
    use anyhow::anyhow;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Remote that is either down or backed by an in-memory snapshot
    #[derive(Default)]
    struct FakeRemote {
        down: bool,
        event: Mutex<Option<Event>>,
        map: Mutex<AvailabilityMap>,
    }

    impl FakeRemote {
        fn down() -> Self {
            Self {
                down: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl EventStore for FakeRemote {
        async fn create_event(&self, new_event: NewEvent) -> Result<Event> {
            if self.down {
                return Err(anyhow!("connection refused"));
            }
            let event = new_event.validate()?.into_event(String::from("remote01"), 1);
            *self.event.lock().unwrap() = Some(event.clone());
            Ok(event)
        }

        async fn get_event(&self, id: &str) -> Result<Option<Event>> {
            if self.down {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.event.lock().unwrap().clone().filter(|e| e.id == id))
        }
    }

    #[async_trait]
    impl AvailabilityStore for FakeRemote {
        async fn get(&self, _event_id: &str) -> Result<AvailabilityMap> {
            if self.down {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.map.lock().unwrap().clone())
        }

        async fn put(&self, _event_id: &str, map: &AvailabilityMap) -> Result<()> {
            if self.down {
                return Err(anyhow!("connection refused"));
            }
            *self.map.lock().unwrap() = map.clone();
            Ok(())
        }

        async fn put_participant(
            &self,
            _event_id: &str,
            username: &str,
            slots: &DateSlots,
        ) -> Result<()> {
            if self.down {
                return Err(anyhow!("connection refused"));
            }
            self.map
                .lock()
                .unwrap()
                .insert(username.to_string(), slots.clone());
            Ok(())
        }
    }

    fn new_event() -> NewEvent {
        NewEvent {
            name: String::from("Retro"),
            date_mode: DateMode::Specific,
            dates: vec![String::from("2026-03-02")],
            start_hour: 9,
            end_hour: 10,
        }
    }

    #[tokio::test]
    async fn it_caches_remote_events() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FallbackStore::new(FakeRemote::default(), LocalCache::new(temp_dir.path()));

        let event = store.create_event(new_event()).await?;
        assert_eq!(event.id, "remote01");
        assert_eq!(store.local().load_event("remote01").await?, Some(event));
        Ok(())
    }

    #[tokio::test]
    async fn it_creates_locally_when_remote_is_down() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FallbackStore::new(FakeRemote::down(), LocalCache::new(temp_dir.path()));

        let event = store.create_event(new_event()).await?;
        assert_ne!(event.id, "remote01");
        assert_eq!(store.get_event(&event.id).await?, Some(event));
        Ok(())
    }

    #[tokio::test]
    async fn it_does_not_fall_back_on_invalid_input() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FallbackStore::new(FakeRemote::default(), LocalCache::new(temp_dir.path()));

        let mut event = new_event();
        event.end_hour = 9;
        let err = store.create_event(event).await.unwrap_err();
        assert!(MeetError::is_validation(&err));
        Ok(())
    }

    #[tokio::test]
    async fn it_keeps_writes_locally_when_remote_is_down() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FallbackStore::new(FakeRemote::down(), LocalCache::new(temp_dir.path()));
        let event = store.create_event(new_event()).await?;

        let mut map = AvailabilityMap::new();
        map.init_participant("Ann", &event);
        map.set_slots("Ann", &[SlotUpdate::new("2026-03-02", 0, true)]);
        store.put(&event.id, &map).await?;

        assert_eq!(store.get(&event.id).await?, map);
        Ok(())
    }

    #[tokio::test]
    async fn it_prefers_the_remote_snapshot() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FallbackStore::new(FakeRemote::default(), LocalCache::new(temp_dir.path()));
        let event = store.create_event(new_event()).await?;

        let mut stale = AvailabilityMap::new();
        stale.init_participant("Ann", &event);
        store.local().save_availability(&event.id, &stale).await?;

        let mut fresh = AvailabilityMap::new();
        fresh.init_participant("Bo", &event);
        store.remote().put(&event.id, &fresh).await?;

        assert_eq!(store.get(&event.id).await?, fresh);
        assert_eq!(store.local().load_availability(&event.id).await?, fresh);
        Ok(())
    }

    #[tokio::test]
    async fn it_writes_only_the_given_participant() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FallbackStore::new(FakeRemote::default(), LocalCache::new(temp_dir.path()));
        let event = store.create_event(new_event()).await?;

        let mut ann = AvailabilityMap::new();
        ann.init_participant("Ann", &event);
        ann.set_slots("Ann", &[SlotUpdate::new("2026-03-02", 1, true)]);
        store.put(&event.id, &ann).await?;

        let bo = DateSlots::from([(String::from("2026-03-02"), vec![true, false])]);
        store.put_participant(&event.id, "Bo", &bo).await?;

        let map = store.get(&event.id).await?;
        assert_eq!(map.participants().collect::<Vec<_>>(), vec!["Ann", "Bo"]);
        assert!(map.is_available("Ann", "2026-03-02", 1));
        assert!(map.is_available("Bo", "2026-03-02", 0));
        assert_eq!(store.local().load_availability(&event.id).await?, map);
        Ok(())
    }

    #[tokio::test]
    async fn it_keeps_participant_writes_locally_when_remote_is_down() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FallbackStore::new(FakeRemote::down(), LocalCache::new(temp_dir.path()));
        let event = store.create_event(new_event()).await?;

        let slots = DateSlots::from([(String::from("2026-03-02"), vec![false, true])]);
        store.put_participant(&event.id, "Ann", &slots).await?;

        let map = store.get(&event.id).await?;
        assert!(map.is_available("Ann", "2026-03-02", 1));
        Ok(())
    }
}
