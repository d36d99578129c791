//! Slot model, availability maps and aggregation

pub mod aggregate;
pub mod availability;
pub mod event;
pub mod grid;
pub mod slots;

pub use aggregate::{
    IntensityTier, SlotRef, available_names, best_slots, group_count, intensity_tier, is_majority,
    max_count,
};
pub use availability::{AvailabilityMap, DateSlots, PaintStroke, SlotUpdate};
pub use event::{
    DAY_NAMES, DateMode, Event, NewEvent, generate_event_id, generate_link_token,
};
pub use grid::{GridCell, GridColumn, GridRow, GroupGrid, build_group_grid};
pub use slots::{
    DateLabel, format_date_key, generate_time_slots, hour_label, hour_options, slot_count,
};
