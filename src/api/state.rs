use tokio_rusqlite::Connection;

use crate::core::AppConfig;
use crate::store::SqliteStore;

pub struct AppState {
    pub store: SqliteStore,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig) -> Self {
        Self {
            store: SqliteStore::new(db, config.id_attempts),
            config,
        }
    }
}
