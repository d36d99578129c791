pub mod config;
pub mod db;
pub mod error;

pub use config::AppConfig;
pub use error::MeetError;
