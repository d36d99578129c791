use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::core::AppConfig;
use crate::schedule::DateMode;

pub mod create;
pub mod init;
pub mod join;
pub mod mark;
pub mod migrate;
pub mod serve;
pub mod show;

#[derive(Subcommand)]
enum Command {
    /// Create the db schema
    Init {
        #[arg(long, action, default_value = "false")]
        db: bool,
    },
    /// Migrate the db schema
    Migrate {
        #[arg(long, action, default_value = "false")]
        db: bool,
    },
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "3001")]
        port: String,
    },
    /// Create an event and print its id
    Create {
        #[arg(long)]
        name: String,
        /// Dates as YYYY-MM-DD, or weekday names with --mode days-of-week
        #[arg(long, value_delimiter = ',', required = true)]
        dates: Vec<String>,
        #[arg(long, value_enum, default_value = "specific")]
        mode: ModeArg,
        /// First hour of the day, 0-23
        #[arg(long, default_value = "9")]
        start: u8,
        /// Hour the day ends, 1-24
        #[arg(long, default_value = "17")]
        end: u8,
    },
    /// Respond to an event under a name
    Join {
        #[arg(long)]
        event: String,
        #[arg(long)]
        name: String,
    },
    /// Toggle cells as if dragging across them, e.g. 2026-03-02:0
    Mark {
        #[arg(long)]
        event: String,
        /// Defaults to the name last used to join this event
        #[arg(long)]
        name: Option<String>,
        #[arg(required = true)]
        cells: Vec<String>,
    },
    /// Print the group heatmap
    Show {
        #[arg(long)]
        event: String,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    Specific,
    DaysOfWeek,
}

impl From<ModeArg> for DateMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Specific => DateMode::Specific,
            ModeArg::DaysOfWeek => DateMode::DaysOfWeek,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default();

    // Client commands only log warnings such as falling back to the
    // local cache
    if !matches!(args.command, Some(Command::Serve { .. })) {
        crate::api::init_tracing(&format!("{}=info", env!("CARGO_CRATE_NAME")));
    }

    // Handle each sub command
    match args.command {
        Some(Command::Init { db }) => {
            init::run(db, &config.db_path).await?;
        }
        Some(Command::Migrate { db }) => {
            migrate::run(db, &config.db_path).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        Some(Command::Create {
            name,
            dates,
            mode,
            start,
            end,
        }) => {
            create::run(&config, name, mode.into(), dates, start, end).await?;
        }
        Some(Command::Join { event, name }) => {
            join::run(&config, &event, &name).await?;
        }
        Some(Command::Mark { event, name, cells }) => {
            mark::run(&config, &event, name, &cells).await?;
        }
        Some(Command::Show { event }) => {
            show::run(&config, &event).await?;
        }
        None => {}
    }

    Ok(())
}
