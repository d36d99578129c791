//! Group counts over an availability map

use serde::Serialize;

use super::availability::AvailabilityMap;

/// Number of participants available at `(date, slot_index)`
pub fn group_count(map: &AvailabilityMap, date: &str, slot_index: usize) -> usize {
    map.participants()
        .filter(|name| map.is_available(name, date, slot_index))
        .count()
}

/// Names of the participants available at `(date, slot_index)` in the
/// order they first appeared in the map
pub fn available_names(map: &AvailabilityMap, date: &str, slot_index: usize) -> Vec<String> {
    map.participants()
        .filter(|name| map.is_available(name, date, slot_index))
        .map(String::from)
        .collect()
}

/// Highest group count over every date and slot of an event
pub fn max_count<S: AsRef<str>>(map: &AvailabilityMap, dates: &[S], slot_count: usize) -> usize {
    dates
        .iter()
        .flat_map(|date| (0..slot_count).map(move |slot| group_count(map, date.as_ref(), slot)))
        .max()
        .unwrap_or(0)
}

/// A `(date, slot)` position in the grid
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRef {
    pub date: String,
    pub slot_index: usize,
}

/// Every position sharing the highest group count. Ties are all
/// returned. Empty when nobody is available anywhere.
pub fn best_slots<S: AsRef<str>>(
    map: &AvailabilityMap,
    dates: &[S],
    slot_count: usize,
) -> Vec<SlotRef> {
    let max = max_count(map, dates, slot_count);
    if max == 0 {
        return vec![];
    }
    dates
        .iter()
        .flat_map(|date| (0..slot_count).map(move |slot| (date.as_ref(), slot)))
        .filter(|(date, slot)| group_count(map, date, *slot) == max)
        .map(|(date, slot)| SlotRef {
            date: date.to_string(),
            slot_index: slot,
        })
        .collect()
}

/// Shading tier of a group grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityTier {
    /// Nobody available
    Empty,
    /// Up to a quarter
    Low,
    /// Up to half
    Medium,
    /// Up to three quarters
    High,
    /// More than three quarters
    Full,
}

impl IntensityTier {
    /// 0 for `Empty` through 4 for `Full`
    pub fn level(self) -> u8 {
        self as u8
    }
}

/// Bucket `count / total` into a tier. Buckets are closed on the right
/// so exactly a quarter is `Low` and exactly half is `Medium`.
pub fn intensity_tier(count: usize, total: usize) -> IntensityTier {
    if count == 0 || total == 0 {
        return IntensityTier::Empty;
    }
    // Compare in integers so the boundaries are exact
    if 4 * count <= total {
        IntensityTier::Low
    } else if 2 * count <= total {
        IntensityTier::Medium
    } else if 4 * count <= 3 * total {
        IntensityTier::High
    } else {
        IntensityTier::Full
    }
}

/// Whether more than half of the participants are available. Cells
/// like this are dark enough to need contrasting text.
pub fn is_majority(count: usize, total: usize) -> bool {
    total > 0 && 2 * count > total
}
