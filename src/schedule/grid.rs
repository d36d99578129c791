//! Rendering model for the group availability grid

use serde::Serialize;

use super::aggregate::{
    IntensityTier, SlotRef, available_names, best_slots, intensity_tier, is_majority, max_count,
};
use super::availability::AvailabilityMap;
use super::event::Event;
use super::slots::{DateLabel, format_date_key};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridColumn {
    pub date: String,
    pub label: DateLabel,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub date: String,
    pub slot_index: usize,
    pub count: usize,
    pub tier: IntensityTier,
    pub names: Vec<String>,
    /// Shares the highest count in the grid
    pub is_best: bool,
    /// More than half available
    pub majority: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub slot_index: usize,
    pub label: String,
    /// Only rows on the hour show their time
    pub show_label: bool,
    pub cells: Vec<GridCell>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupGrid {
    pub participants: Vec<String>,
    pub total: usize,
    pub max_count: usize,
    pub columns: Vec<GridColumn>,
    pub rows: Vec<GridRow>,
    pub best: Vec<SlotRef>,
}

impl GroupGrid {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn cell(&self, date: &str, slot_index: usize) -> Option<&GridCell> {
        self.rows
            .get(slot_index)
            .and_then(|row| row.cells.iter().find(|cell| cell.date == date))
    }
}

/// Aggregate `map` over every date and slot of `event`
pub fn build_group_grid(event: &Event, map: &AvailabilityMap) -> GroupGrid {
    let slot_count = event.slot_count();
    let total = map.len();
    let max = max_count(map, &event.dates, slot_count);

    let columns = event
        .dates
        .iter()
        .map(|date| GridColumn {
            date: date.clone(),
            label: format_date_key(date, event.date_mode),
        })
        .collect();

    let rows = event
        .time_slots()
        .into_iter()
        .enumerate()
        .map(|(slot_index, label)| GridRow {
            slot_index,
            label,
            show_label: slot_index % 2 == 0,
            cells: event
                .dates
                .iter()
                .map(|date| {
                    let names = available_names(map, date, slot_index);
                    let count = names.len();
                    GridCell {
                        date: date.clone(),
                        slot_index,
                        count,
                        tier: intensity_tier(count, total),
                        names,
                        is_best: max > 0 && count == max,
                        majority: is_majority(count, total),
                    }
                })
                .collect(),
        })
        .collect();

    GroupGrid {
        participants: map.participants().map(String::from).collect(),
        total,
        max_count: max,
        columns,
        rows,
        best: best_slots(map, &event.dates, slot_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DateMode, SlotUpdate};

    fn test_event() -> Event {
        Event {
            id: String::from("abc12345"),
            name: String::from("Standup"),
            date_mode: DateMode::DaysOfWeek,
            dates: vec![String::from("Monday"), String::from("Tuesday")],
            start_hour: 9,
            end_hour: 11,
            created_at: 0,
        }
    }

    #[test]
    fn it_builds_an_empty_grid() {
        let event = test_event();
        let grid = build_group_grid(&event, &AvailabilityMap::new());
        assert!(grid.is_empty());
        assert_eq!(grid.max_count, 0);
        assert_eq!(grid.rows.len(), 4);
        assert!(grid.best.is_empty());
        assert!(
            grid.rows
                .iter()
                .flat_map(|row| row.cells.iter())
                .all(|cell| cell.tier == IntensityTier::Empty && !cell.is_best)
        );
    }

    #[test]
    fn it_highlights_the_best_cells() {
        let event = test_event();
        let mut map = AvailabilityMap::new();
        for name in ["Ann", "Bo", "Cy", "Di"] {
            map.init_participant(name, &event);
        }
        map.set_slots("Ann", &[SlotUpdate::new("Monday", 2, true)]);
        map.set_slots("Bo", &[SlotUpdate::new("Monday", 2, true)]);
        map.set_slots("Cy", &[SlotUpdate::new("Monday", 2, true)]);
        map.set_slots("Di", &[SlotUpdate::new("Tuesday", 0, true)]);

        let grid = build_group_grid(&event, &map);
        assert_eq!(grid.total, 4);
        assert_eq!(grid.max_count, 3);
        assert_eq!(grid.columns[0].label.primary, "Mon");
        assert_eq!(grid.rows[2].label, "10:00 AM");
        assert!(grid.rows[2].show_label);
        assert!(!grid.rows[1].show_label);

        let best = grid.cell("Monday", 2).unwrap();
        assert_eq!(best.count, 3);
        assert_eq!(best.names, vec!["Ann", "Bo", "Cy"]);
        assert_eq!(best.tier, IntensityTier::High);
        assert!(best.is_best);
        assert!(best.majority);

        let single = grid.cell("Tuesday", 0).unwrap();
        assert_eq!(single.tier, IntensityTier::Low);
        assert!(!single.is_best);
        assert!(!single.majority);

        assert_eq!(grid.best.len(), 1);
        assert!(grid.cell("Wednesday", 0).is_none());
    }
}
