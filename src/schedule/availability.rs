//! Per-participant slot grids

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::event::Event;

/// Slots for one participant keyed by date key. Index `i` of each
/// sequence is the slot starting at `startHour + i * 30min`.
pub type DateSlots = BTreeMap<String, Vec<bool>>;

/// Availability of every participant in an event, keyed by name.
///
/// Participants keep the order in which they first appeared, which is
/// the order names are listed in when aggregating. Serializes to a
/// JSON object `{ name: { dateKey: [bool] } }`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AvailabilityMap {
    entries: Vec<(String, DateSlots)>,
}

/// A single cell change for one participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotUpdate {
    pub date: String,
    pub slot_index: usize,
    pub value: bool,
}

impl SlotUpdate {
    pub fn new(date: &str, slot_index: usize, value: bool) -> Self {
        Self {
            date: date.to_string(),
            slot_index,
            value,
        }
    }
}

impl AvailabilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Participant names in order of first appearance
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DateSlots)> {
        self.entries.iter().map(|(name, slots)| (name.as_str(), slots))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&DateSlots> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, slots)| slots)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut DateSlots> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, slots)| slots)
    }

    /// Set the slots for `name`. An existing participant keeps their
    /// position; a new one is appended.
    pub fn insert(&mut self, name: String, slots: DateSlots) {
        match self.get_mut(&name) {
            Some(existing) => *existing = slots,
            None => self.entries.push((name, slots)),
        }
    }

    /// Whether `name` marked the slot as available. Missing
    /// participants, dates and slots all read as unavailable.
    pub fn is_available(&self, name: &str, date: &str, slot_index: usize) -> bool {
        self.get(name)
            .and_then(|slots| slots.get(date))
            .and_then(|day| day.get(slot_index))
            .copied()
            .unwrap_or(false)
    }

    /// Add `name` with every slot of every event date unset. A
    /// participant that already exists keeps their data. Returns
    /// whether the map changed.
    pub fn init_participant(&mut self, name: &str, event: &Event) -> bool {
        if self.contains(name) {
            return false;
        }
        let slot_count = event.slot_count();
        let slots = event
            .dates
            .iter()
            .map(|date| (date.clone(), vec![false; slot_count]))
            .collect();
        self.entries.push((name.to_string(), slots));
        true
    }

    /// Apply each update to `name`'s slots independently. Updates for
    /// a date the participant has no entry for, or for a slot past the
    /// end of the day, are skipped. Returns how many were applied.
    pub fn set_slots(&mut self, name: &str, updates: &[SlotUpdate]) -> usize {
        let Some(person) = self.get_mut(name) else {
            return 0;
        };
        let mut applied = 0;
        for update in updates {
            let Some(slot) = person
                .get_mut(&update.date)
                .and_then(|day| day.get_mut(update.slot_index))
            else {
                continue;
            };
            *slot = update.value;
            applied += 1;
        }
        applied
    }
}

impl FromIterator<(String, DateSlots)> for AvailabilityMap {
    fn from_iter<T: IntoIterator<Item = (String, DateSlots)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (name, slots) in iter {
            map.insert(name, slots);
        }
        map
    }
}

impl Serialize for AvailabilityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, slots) in &self.entries {
            map.serialize_entry(name, slots)?;
        }
        map.end()
    }
}

struct AvailabilityMapVisitor;

impl<'de> Visitor<'de> for AvailabilityMapVisitor {
    type Value = AvailabilityMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of participant name to date slots")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = AvailabilityMap::new();
        while let Some((name, slots)) = access.next_entry::<String, DateSlots>()? {
            map.insert(name, slots);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for AvailabilityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AvailabilityMapVisitor)
    }
}

/// One click-and-drag over a participant's grid.
///
/// The first cell flips its current value and every other cell the
/// stroke passes over is set to that same value. A cell is only
/// updated the first time the stroke reaches it.
#[derive(Debug)]
pub struct PaintStroke {
    value: bool,
    visited: HashSet<(String, usize)>,
}

impl PaintStroke {
    pub fn begin(
        map: &AvailabilityMap,
        name: &str,
        date: &str,
        slot_index: usize,
    ) -> (Self, SlotUpdate) {
        let value = !map.is_available(name, date, slot_index);
        let mut visited = HashSet::new();
        visited.insert((date.to_string(), slot_index));
        (Self { value, visited }, SlotUpdate::new(date, slot_index, value))
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn extend(&mut self, date: &str, slot_index: usize) -> Option<SlotUpdate> {
        if self.visited.insert((date.to_string(), slot_index)) {
            Some(SlotUpdate::new(date, slot_index, self.value))
        } else {
            None
        }
    }
}
