//! Implementation of the `user-cache init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::CONFIG_DIR;

/// Arguments for `user-cache init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Result of `user-cache init`.
#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    /// False when the project was already initialized.
    pub success: bool,
    /// Summary line.
    pub message: String,
    /// Directory that was initialized.
    pub initialized_path: PathBuf,
    /// Whether `config.yaml` was written.
    pub config_written: bool,
    /// Database file that was created or migrated.
    pub database_path: Option<String>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("\nWrote {CONFIG_DIR}/config.yaml"));
        }
        if let Some(ref db) = self.database_path {
            lines.push(format!("Database initialized at {db}"));
        }
        lines.join("\n")
    }
}

/// Run `user-cache init` and print the outcome.
pub async fn execute(args: InitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let out = initialize_project(&args, config).await?;
    output(&out, json_mode);
    Ok(())
}

/// Create the project directory, default config file and migrated database.
pub async fn initialize_project(args: &InitArgs, config: &Config) -> Result<InitOutput> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let config_dir = target_path.join(CONFIG_DIR);

    if config_dir.exists() && !args.force {
        return Ok(InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            config_written: false,
            database_path: None,
        });
    }

    if args.force && config_dir.exists() {
        fs::remove_dir_all(&config_dir)
            .await
            .with_context(|| format!("Failed to remove existing {CONFIG_DIR} directory"))?;
    }

    fs::create_dir_all(&config_dir)
        .await
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    fs::write(config_dir.join("config.yaml"), yaml)
        .await
        .context("Failed to write config.yaml")?;

    let mut database = config.database.clone();
    database.path = resolve_against(&target_path, &database.path);
    initialize_database(&database)
        .await
        .context("Failed to initialize database")?;

    Ok(InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        config_written: true,
        database_path: Some(database.path),
    })
}

fn resolve_against(base: &Path, path: &str) -> String {
    let path = Path::new(path);
    if path.is_absolute() {
        path.display().to_string()
    } else {
        base.join(path).display().to_string()
    }
}
