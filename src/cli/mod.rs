//! Command-line interface.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{init::InitArgs, serve::ServeArgs, user::UserArgs};

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "user-cache")]
#[command(about = "Cached user store with an HTTP front end", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Path to a config file (defaults to .user-cache/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration and database
    Init(InitArgs),

    /// Run the HTTP server
    Serve(ServeArgs),

    /// User management commands
    User(UserArgs),
}

/// Print an error in the requested format and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1)
}
