use anyhow::Result;

use super::join::load_event;
use crate::client::{EventSession, connect};
use crate::core::{AppConfig, MeetError};

// Cells look like `2026-03-02:3` or `Monday:0`
fn parse_cell(cell: &str) -> Result<(String, usize), MeetError> {
    cell.rsplit_once(':')
        .and_then(|(date, slot)| Some((date.to_string(), slot.parse().ok()?)))
        .filter(|(date, _)| !date.is_empty())
        .ok_or_else(|| MeetError::Validation(format!("Invalid cell \"{}\", expected DATE:SLOT", cell)))
}

pub async fn run(
    config: &AppConfig,
    event_id: &str,
    name: Option<String>,
    cells: &[String],
) -> Result<()> {
    let cells = cells
        .iter()
        .map(|cell| parse_cell(cell))
        .collect::<Result<Vec<_>, _>>()?;

    let store = connect(config);
    let name = match name {
        Some(name) => name,
        None => store.local().load_username(event_id).await?.ok_or_else(|| {
            MeetError::Validation(String::from("Missing --name and no name saved for this event"))
        })?,
    };

    let event = load_event(&store, event_id).await?;
    let mut session = EventSession::load(event, &store).await?;
    session.set_username(&name).await?;
    let applied = session.paint(&cells).await?;
    println!("Updated {} of {} cells for {}", applied, cells.len(), name);
    Ok(())
}
