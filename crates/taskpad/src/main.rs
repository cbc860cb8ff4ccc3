//! Taskpad terminal front end
//!
//! Reads one command per line from stdin and runs it against a single
//! task store backed by files in the configured data directory.

mod app;
mod command;
mod config;

use anyhow::Context;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskpad_core::storage::FileStorage;
use taskpad_core::task::TaskStore;

use crate::app::{App, Outcome};
use crate::command::Command;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskpad=info,taskpad_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!("Using data directory: {:?}", config.data_dir);

    let storage = Arc::new(FileStorage::new(&config.data_dir));
    let store = TaskStore::open(storage, config.store_options())
        .await
        .with_context(|| format!("Failed to load tasks from {:?}", config.data_dir))?;
    let app = App::new(store);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(b"taskpad ready. Type `help` for commands.\n").await?;
    while let Some(line) = lines.next_line().await? {
        let output = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => match app.execute(command).await {
                Outcome::Print(text) => text,
                Outcome::Quit => break,
            },
            Err(e) => e.to_string(),
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    // Mutations already persist as they happen; this surfaces a failed last write
    if let Err(e) = app.store().save().await {
        tracing::error!("Failed to save tasks on exit: {}", e);
    }
    Ok(())
}
