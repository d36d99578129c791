use anyhow::{Context, Result};

use crate::core::db::{async_db, migrate};

pub async fn run(db: bool, db_path: &str) -> Result<()> {
    // Run the DB migration script
    if db {
        println!("Migrating db...");
        let db = async_db(db_path).await.context("Failed to connect to db")?;
        migrate(&db).await.context("DB migration failed")?;
        println!("Finished migrating db");
    }
    Ok(())
}
