//! A participant's view of one event

use anyhow::Result;

use crate::core::MeetError;
use crate::schedule::{
    AvailabilityMap, Event, GroupGrid, PaintStroke, SlotUpdate, available_names,
    build_group_grid, group_count, max_count,
};
use crate::store::AvailabilityStore;

/// Holds an event, the name the user responds as and the current
/// availability map. Every change writes the user's own entry back to
/// the store.
pub struct EventSession<S> {
    event: Event,
    username: Option<String>,
    availability: AvailabilityMap,
    store: S,
}

impl<S: AvailabilityStore> EventSession<S> {
    pub async fn load(event: Event, store: S) -> Result<Self> {
        let availability = store.get(&event.id).await?;
        Ok(Self {
            event,
            username: None,
            availability,
            store,
        })
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn availability(&self) -> &AvailabilityMap {
        &self.availability
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn participants(&self) -> Vec<&str> {
        self.availability.participants().collect()
    }

    /// Respond as `name`. A name seen for the first time gets an empty
    /// grid; a returning name keeps what they marked before.
    pub async fn set_username(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MeetError::Validation(String::from("Missing username")).into());
        }
        self.username = Some(name.to_string());
        if self.availability.init_participant(name, &self.event) {
            self.persist().await?;
        }
        Ok(())
    }

    /// Apply updates to the current user's slots and save. Does nothing
    /// before a username is set.
    pub async fn set_slots(&mut self, updates: &[SlotUpdate]) -> Result<usize> {
        let Some(name) = self.username.as_deref() else {
            return Ok(0);
        };
        let applied = self.availability.set_slots(name, updates);
        self.persist().await?;
        Ok(applied)
    }

    /// Drag across `cells` in order, starting from the first one
    pub async fn paint(&mut self, cells: &[(String, usize)]) -> Result<usize> {
        let (Some(name), Some(((date, slot_index), rest))) =
            (self.username.as_deref(), cells.split_first())
        else {
            return Ok(0);
        };
        let (mut stroke, first) = PaintStroke::begin(&self.availability, name, date, *slot_index);
        let mut updates = vec![first];
        updates.extend(
            rest.iter()
                .filter_map(|(date, slot_index)| stroke.extend(date, *slot_index)),
        );
        self.set_slots(&updates).await
    }

    pub fn group_count(&self, date: &str, slot_index: usize) -> usize {
        group_count(&self.availability, date, slot_index)
    }

    pub fn available_names(&self, date: &str, slot_index: usize) -> Vec<String> {
        available_names(&self.availability, date, slot_index)
    }

    pub fn max_count(&self) -> usize {
        max_count(
            &self.availability,
            &self.event.dates,
            self.event.slot_count(),
        )
    }

    pub fn grid(&self) -> GroupGrid {
        build_group_grid(&self.event, &self.availability)
    }

    // Only the current user's entry is written, other participants'
    // entries may be stale copies
    async fn persist(&self) -> Result<()> {
        let Some(name) = self.username.as_deref() else {
            return Ok(());
        };
        let Some(slots) = self.availability.get(name) else {
            return Ok(());
        };
        self.store
            .put_participant(&self.event.id, name, slots)
            .await
    }
}
