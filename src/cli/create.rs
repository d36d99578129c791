use anyhow::Result;

use crate::client::connect;
use crate::core::AppConfig;
use crate::schedule::{DateMode, NewEvent};
use crate::store::EventStore;

pub async fn run(
    config: &AppConfig,
    name: String,
    date_mode: DateMode,
    dates: Vec<String>,
    start_hour: u8,
    end_hour: u8,
) -> Result<()> {
    let store = connect(config);
    let event = store
        .create_event(NewEvent {
            name,
            date_mode,
            dates,
            start_hour,
            end_hour,
        })
        .await?;

    println!("Created \"{}\" with id {}", event.name, event.id);
    println!("Share it with: meetsync join --event {} --name <name>", event.id);
    Ok(())
}
