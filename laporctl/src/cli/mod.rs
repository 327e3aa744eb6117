use clap::{Parser, Subcommand};

use client::{AuthError, SessionManager, StoreError, SyncClient, SyncError};
use common::{Role, Session};

use crate::VERSION;
use crate::config::ConfigError;

mod login;
mod reports;
mod stats;
mod submit;

#[derive(Parser, Debug)]
#[command(name = "laporctl")]
#[command(about = "Monthly entrepreneur reporting for PPPK officers", long_about = None)]
#[command(version = VERSION)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE", default_value = "laporctl.toml")]
    pub config: String,
    #[arg(long, hide = true)]
    pub markdown_help: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Generic(String),
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Login(login::LoginCommand),
    Logout(login::LogoutCommand),
    Whoami(login::WhoamiCommand),
    Submit(submit::SubmitCommand),
    Reports(reports::ReportsCommand),
    Stats(stats::StatsCommand),
}

/// Everything a command needs: the store client and the session manager,
/// built once from the config.
pub struct Context {
    pub sync: SyncClient,
    pub sessions: SessionManager,
}

pub fn execute(ctx: &Context, command: Commands) -> Result<(), CommandError> {
    match command {
        Commands::Login(cmd) => cmd.execute(ctx),
        Commands::Logout(cmd) => cmd.execute(ctx),
        Commands::Whoami(cmd) => cmd.execute(ctx),
        Commands::Submit(cmd) => cmd.execute(ctx),
        Commands::Reports(cmd) => cmd.execute(ctx),
        Commands::Stats(cmd) => cmd.execute(ctx),
    }
}

pub trait Command {
    fn execute(&self, ctx: &Context) -> Result<(), CommandError>;
}

pub(crate) fn require_session(ctx: &Context) -> Result<Session, CommandError> {
    ctx.sessions
        .current()
        .ok_or_else(|| CommandError::Generic("Not logged in; run 'laporctl login' first".to_string()))
}

pub(crate) fn require_role(ctx: &Context, role: Role) -> Result<Session, CommandError> {
    let session = require_session(ctx)?;
    if session.role == role {
        Ok(session)
    } else {
        Err(CommandError::Generic(format!(
            "This command needs a {role} session (logged in as {})",
            session.role
        )))
    }
}
