use std::sync::Arc;

use clap::{CommandFactory, Parser};

use client::{FileStore, KeyValueStore, SessionManager, SyncClient};
use laporctl::cli::{self, CommandError};
use laporctl::config::Config;

fn main() -> Result<(), CommandError> {
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();

    if cli.markdown_help {
        clap_markdown::print_help_markdown::<cli::Cli>();
        std::process::exit(0);
    }

    let Some(command) = cli.command else {
        cli::Cli::command()
            .print_help()
            .map_err(CommandError::Io)?;
        std::process::exit(0);
    };

    let config = Config::load(&cli.config)?;

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.data_dir)?);
    let sync = SyncClient::builder(config.endpoint.as_str()).build(store.clone())?;
    let sessions = SessionManager::new(store, config.registry);
    let ctx = cli::Context { sync, sessions };

    if let Err(e) = cli::execute(&ctx, command) {
        eprintln!("Error executing command: {e}");
        std::process::exit(1);
    }
    Ok(())
}
