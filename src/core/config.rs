use std::env;

const DEFAULT_ID_ATTEMPTS: usize = 5;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    pub cache_path: String,
    pub api_url: String,
    // Allowed CORS origin in addition to localhost
    pub frontend_url: Option<String>,
    // How many event ids to try before giving up on a collision
    pub id_attempts: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let host = "127.0.0.1";
        let port = "3001";
        let storage_path = env::var("MEETSYNC_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = env::var("MEETSYNC_DB_PATH")
            .unwrap_or_else(|_| format!("{}/db/meetsync.sqlite", storage_path));
        let cache_path =
            env::var("MEETSYNC_CACHE_PATH").unwrap_or_else(|_| format!("{}/cache", storage_path));
        let api_url =
            env::var("MEETSYNC_API_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));
        let frontend_url = env::var("MEETSYNC_FRONTEND_URL")
            .ok()
            .filter(|url| !url.is_empty());
        let id_attempts = env::var("MEETSYNC_ID_ATTEMPTS")
            .ok()
            .and_then(|attempts| attempts.parse().ok())
            .filter(|attempts| *attempts > 0)
            .unwrap_or(DEFAULT_ID_ATTEMPTS);

        Self {
            storage_path,
            db_path,
            cache_path,
            api_url,
            frontend_url,
            id_attempts,
        }
    }
}
