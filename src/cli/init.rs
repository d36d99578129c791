use anyhow::{Context, Result, anyhow};

use crate::core::db::{async_db, migrate};

pub async fn run(db: bool, db_path: &str) -> Result<()> {
    if !db {
        return Err(anyhow!("Missing value for init \"--db\""));
    }

    println!("Initializing db at {}...", db_path);
    let db = async_db(db_path).await.context("Failed to connect to db")?;
    migrate(&db).await.context("DB initialization failed")?;
    println!("Finished initializing db");
    Ok(())
}
