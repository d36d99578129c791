use anyhow::Result;

use crate::client::{EventSession, connect};
use crate::core::{AppConfig, MeetError};
use crate::schedule::Event;
use crate::store::{EventStore, FallbackStore};

/// Load an event through the client store or fail with a not found
pub(super) async fn load_event<R: EventStore>(
    store: &FallbackStore<R>,
    event_id: &str,
) -> Result<Event> {
    store
        .get_event(event_id)
        .await?
        .ok_or_else(|| MeetError::NotFound(format!("Event {} not found", event_id)).into())
}

pub async fn run(config: &AppConfig, event_id: &str, name: &str) -> Result<()> {
    let store = connect(config);
    let event = load_event(&store, event_id).await?;

    let mut session = EventSession::load(event, &store).await?;
    session.set_username(name).await?;
    if let Some(username) = session.username() {
        store.local().save_username(event_id, username).await?;
        println!(
            "Joined \"{}\" as {} ({} responding)",
            session.event().name,
            username,
            session.participants().len()
        );
    }
    Ok(())
}
