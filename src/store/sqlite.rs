//! SQLite backed event and availability storage
//!
//! Availability is stored one row per participant and date so a
//! participant's save only touches their own rows.

use anyhow::{Error, Result};
use async_trait::async_trait;
use rusqlite::{ErrorCode, OptionalExtension};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::{Connection, params};

use super::{AvailabilityStore, EventStore};
use crate::schedule::{
    AvailabilityMap, DateMode, DateSlots, Event, NewEvent, generate_event_id, generate_link_token,
};

/// A row from the participant table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i64,
    pub event_id: String,
    pub username: String,
    pub created_at: i64,
}

struct EventRow {
    id: String,
    name: String,
    date_mode: DateMode,
    dates: String,
    start_hour: u8,
    end_hour: u8,
    created_at: i64,
}

impl EventRow {
    fn into_event(self) -> Result<Event> {
        Ok(Event {
            id: self.id,
            name: self.name,
            date_mode: self.date_mode,
            dates: serde_json::from_str(&self.dates)?,
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            created_at: self.created_at,
        })
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Insert a new event along with its sharing link.
///
/// Both rows land in one transaction. When the generated id is
/// already taken a new one is drawn, up to `id_attempts` times.
pub async fn create_event(
    db: &Connection,
    new_event: NewEvent,
    id_attempts: usize,
) -> Result<Event> {
    create_event_with_ids(db, new_event, id_attempts, generate_event_id).await
}

/// Same as [`create_event`] with a custom id source
pub async fn create_event_with_ids<F>(
    db: &Connection,
    new_event: NewEvent,
    id_attempts: usize,
    mut next_id: F,
) -> Result<Event>
where
    F: FnMut() -> String + Send + 'static,
{
    let new_event = new_event.validate()?;
    let dates = serde_json::to_string(&new_event.dates)?;
    let created_at = now_millis();
    let token = generate_link_token();
    let date_mode = new_event.date_mode;
    let name = new_event.name.clone();
    let (start_hour, end_hour) = (new_event.start_hour, new_event.end_hour);

    let id = db
        .call(move |conn| {
            let mut last_err = None;
            for _ in 0..id_attempts {
                let id = next_id();
                let tx = conn.transaction()?;
                let inserted = tx.execute(
                    r"
                    INSERT INTO event (id, name, date_mode, dates, start_hour, end_hour, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    ",
                    params![id, name, date_mode, dates, start_hour, end_hour, created_at],
                );
                match inserted {
                    Ok(_) => {}
                    Err(err) if is_primary_key_violation(&err) => {
                        tracing::warn!("Event id {} already taken, retrying", id);
                        last_err = Some(err);
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                }
                tx.execute(
                    "INSERT INTO link (event_id, token, created_at) VALUES (?1, ?2, ?3)",
                    params![id, token, created_at],
                )?;
                tx.commit()?;
                return Ok(id);
            }
            Err(match last_err {
                Some(err) => err.into(),
                None => tokio_rusqlite::Error::Other("No event id attempts configured".into()),
            })
        })
        .await?;

    Ok(new_event.into_event(id, created_at))
}

/// Get an event by ID from the database
pub async fn get_event_by_id(db: &Connection, id: String) -> Result<Option<Event>> {
    let row = db
        .call(move |conn| {
            let row = conn
                .query_row(
                    r"
                    SELECT id, name, date_mode, dates, start_hour, end_hour, created_at
                    FROM event
                    WHERE id = ?
                    LIMIT 1
                    ",
                    [id],
                    |i| {
                        Ok(EventRow {
                            id: i.get(0)?,
                            name: i.get(1)?,
                            date_mode: i.get(2)?,
                            dates: i.get(3)?,
                            start_hour: i.get(4)?,
                            end_hour: i.get(5)?,
                            created_at: i.get(6)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
        .await?;
    row.map(EventRow::into_event).transpose()
}

fn upsert_participant_row(
    conn: &rusqlite::Connection,
    event_id: &str,
    username: &str,
    created_at: i64,
) -> rusqlite::Result<Participant> {
    conn.query_row(
        r"
        INSERT INTO participant (event_id, username, created_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (event_id, username) DO UPDATE SET username = excluded.username
        RETURNING id, event_id, username, created_at
        ",
        params![event_id, username, created_at],
        |i| {
            Ok(Participant {
                id: i.get(0)?,
                event_id: i.get(1)?,
                username: i.get(2)?,
                created_at: i.get(3)?,
            })
        },
    )
}

fn upsert_slots_row(
    conn: &rusqlite::Connection,
    participant_id: i64,
    event_id: &str,
    date_key: &str,
    slots: &str,
    updated_at: i64,
) -> rusqlite::Result<()> {
    conn.execute(
        r"
        INSERT INTO availability (participant_id, event_id, date_key, slots, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (participant_id, event_id, date_key)
        DO UPDATE SET slots = excluded.slots, updated_at = excluded.updated_at
        ",
        params![participant_id, event_id, date_key, slots, updated_at],
    )?;
    Ok(())
}

/// Register a participant. Registering the same name twice returns
/// the existing row.
pub async fn upsert_participant(
    db: &Connection,
    event_id: String,
    username: String,
) -> Result<Participant> {
    let created_at = now_millis();
    let participant = db
        .call(move |conn| Ok(upsert_participant_row(conn, &event_id, &username, created_at)?))
        .await?;
    Ok(participant)
}

// Slots are stored as JSON text, one row per date
fn encode_slots(slots: &DateSlots) -> Result<Vec<(String, String)>> {
    slots
        .iter()
        .map(|(date_key, day)| Ok((date_key.clone(), serde_json::to_string(day)?)))
        .collect()
}

/// Upsert a participant and each of their dates in one transaction.
/// Dates not mentioned in `slots` keep their stored value.
pub async fn save_participant_availability(
    db: &Connection,
    event_id: String,
    username: String,
    slots: &DateSlots,
) -> Result<()> {
    let rows = encode_slots(slots)?;
    let now = now_millis();
    db.call(move |conn| {
        let tx = conn.transaction()?;
        let participant = upsert_participant_row(&tx, &event_id, &username, now)?;
        for (date_key, day) in rows {
            upsert_slots_row(&tx, participant.id, &event_id, &date_key, &day, now)?;
        }
        tx.commit()?;
        Ok(())
    })
    .await?;
    Ok(())
}

/// Every participant's slots for an event, in registration order
pub async fn get_availability(db: &Connection, event_id: String) -> Result<AvailabilityMap> {
    let rows = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT p.username, a.date_key, a.slots
                FROM availability a
                JOIN participant p ON a.participant_id = p.id
                WHERE a.event_id = ?1
                ORDER BY p.id, a.date_key
                ",
            )?;
            let rows = stmt
                .query_map([event_id], |i| {
                    Ok((
                        i.get::<_, String>(0)?,
                        i.get::<_, String>(1)?,
                        i.get::<_, String>(2)?,
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await?;

    let mut entries: Vec<(String, DateSlots)> = Vec::new();
    for (username, date_key, slots) in rows {
        let day: Vec<bool> = serde_json::from_str(&slots)?;
        match entries.last_mut() {
            Some((name, dates)) if *name == username => {
                dates.insert(date_key, day);
            }
            _ => entries.push((username, DateSlots::from([(date_key, day)]))),
        }
    }
    Ok(entries.into_iter().collect())
}

/// Save every participant in `map` in a single transaction
pub async fn put_availability(
    db: &Connection,
    event_id: String,
    map: &AvailabilityMap,
) -> Result<()> {
    let participants = map
        .iter()
        .map(|(name, slots)| Ok((name.to_string(), encode_slots(slots)?)))
        .collect::<Result<Vec<_>, Error>>()?;
    let now = now_millis();
    db.call(move |conn| {
        let tx = conn.transaction()?;
        for (username, rows) in participants {
            let participant = upsert_participant_row(&tx, &event_id, &username, now)?;
            for (date_key, day) in rows {
                upsert_slots_row(&tx, participant.id, &event_id, &date_key, &day, now)?;
            }
        }
        tx.commit()?;
        Ok(())
    })
    .await?;
    Ok(())
}

/// Repository view over the SQLite functions in this module
#[derive(Clone)]
pub struct SqliteStore {
    db: Connection,
    id_attempts: usize,
}

impl SqliteStore {
    pub fn new(db: Connection, id_attempts: usize) -> Self {
        Self { db, id_attempts }
    }

    pub fn db(&self) -> &Connection {
        &self.db
    }
}

#[async_trait]
impl EventStore for SqliteStore {
    async fn create_event(&self, new_event: NewEvent) -> Result<Event> {
        create_event(&self.db, new_event, self.id_attempts).await
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        get_event_by_id(&self.db, id.to_string()).await
    }
}

#[async_trait]
impl AvailabilityStore for SqliteStore {
    async fn get(&self, event_id: &str) -> Result<AvailabilityMap> {
        get_availability(&self.db, event_id.to_string()).await
    }

    async fn put(&self, event_id: &str, map: &AvailabilityMap) -> Result<()> {
        put_availability(&self.db, event_id.to_string(), map).await
    }

    async fn put_participant(
        &self,
        event_id: &str,
        username: &str,
        slots: &DateSlots,
    ) -> Result<()> {
        save_participant_availability(&self.db, event_id.to_string(), username.to_string(), slots)
            .await
    }
}
