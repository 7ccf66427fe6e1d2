mod app;
mod config;
mod error;
mod ui;

use std::{fs::OpenOptions, sync::Mutex};

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    // The terminal belongs to the UI, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "trustbank={level},engine={level},advisor={level}",
            level = config.log_level
        ))
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    let mut app = app::App::new(config)?;
    app.run()?;
    Ok(())
}
