pub mod api;
pub mod cli;
pub mod client;
pub mod core;
pub mod schedule;
pub mod store;
