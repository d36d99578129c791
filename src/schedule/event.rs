//! Event records and the rules for creating them

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rand::Rng;
use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slots::{generate_time_slots, slot_count};
use crate::core::MeetError;

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const ID_LENGTH: usize = 8;

/// How the date keys of an event are interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateMode {
    /// ISO calendar dates, e.g. `2026-03-02`
    #[default]
    Specific,
    /// Weekday names, e.g. `Monday`
    DaysOfWeek,
}

impl DateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateMode::Specific => "specific",
            DateMode::DaysOfWeek => "daysOfWeek",
        }
    }
}

impl fmt::Display for DateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateMode {
    type Err = MeetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "specific" => Ok(DateMode::Specific),
            "daysOfWeek" => Ok(DateMode::DaysOfWeek),
            other => Err(MeetError::Validation(format!(
                "Unknown date mode \"{}\"",
                other
            ))),
        }
    }
}

impl ToSql for DateMode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for DateMode {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: MeetError| FromSqlError::Other(Box::new(e)))
    }
}

/// A scheduling poll. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    // Events cached before date modes existed only had specific dates
    #[serde(default)]
    pub date_mode: DateMode,
    pub dates: Vec<String>,
    pub start_hour: u8,
    pub end_hour: u8,
    /// Milliseconds since the unix epoch
    pub created_at: i64,
}

impl Event {
    pub fn slot_count(&self) -> usize {
        slot_count(self.start_hour, self.end_hour)
    }

    pub fn time_slots(&self) -> Vec<String> {
        generate_time_slots(self.start_hour, self.end_hour)
    }

    pub fn has_date(&self, key: &str) -> bool {
        self.dates.iter().any(|d| d == key)
    }
}

/// Request to create an event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewEvent {
    pub name: String,
    pub date_mode: DateMode,
    pub dates: Vec<String>,
    pub start_hour: u8,
    pub end_hour: u8,
}

impl NewEvent {
    /// Check the request and normalize it: the name is trimmed and the
    /// dates are deduplicated and put in calendar (or week) order.
    pub fn validate(self) -> Result<Self, MeetError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(MeetError::Validation(String::from("Missing event name")));
        }
        if self.dates.is_empty() {
            return Err(MeetError::Validation(String::from("Missing dates")));
        }
        if self.start_hour >= self.end_hour {
            return Err(MeetError::Validation(String::from(
                "startHour must be less than endHour",
            )));
        }
        if self.end_hour > 24 {
            return Err(MeetError::Validation(String::from(
                "endHour must be at most 24",
            )));
        }

        let dates = normalize_dates(self.date_mode, self.dates)?;

        Ok(Self {
            name,
            dates,
            ..self
        })
    }

    pub fn into_event(self, id: String, created_at: i64) -> Event {
        Event {
            id,
            name: self.name,
            date_mode: self.date_mode,
            dates: self.dates,
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            created_at,
        }
    }
}

fn normalize_dates(date_mode: DateMode, dates: Vec<String>) -> Result<Vec<String>, MeetError> {
    match date_mode {
        DateMode::Specific => {
            let mut parsed = dates
                .iter()
                .map(|key| {
                    NaiveDate::parse_from_str(key, "%Y-%m-%d")
                        .map_err(|_| MeetError::Validation(format!("Invalid date \"{}\"", key)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            parsed.sort();
            parsed.dedup();
            Ok(parsed
                .into_iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect())
        }
        DateMode::DaysOfWeek => {
            let mut indices = dates
                .iter()
                .map(|key| {
                    DAY_NAMES
                        .iter()
                        .position(|day| day == key)
                        .ok_or_else(|| MeetError::Validation(format!("Invalid day \"{}\"", key)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            indices.sort_unstable();
            indices.dedup();
            Ok(indices.into_iter().map(|i| DAY_NAMES[i].to_string()).collect())
        }
    }
}

/// Random 8 character event id drawn from lowercase letters and
/// digits. Uniqueness is left to the store.
pub fn generate_event_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Token for the sharing link of an event
pub fn generate_link_token() -> String {
    Uuid::new_v4().simple().to_string()
}
