//! User CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, EntityId, User};
use crate::infrastructure::http::build_service;

/// Arguments for `user-cache user`.
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

/// User subcommands.
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Show a user
    Get {
        /// User ID
        id: String,
    },
    /// Create a user, or replace one when --id is given
    Save {
        /// User name
        name: String,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Existing user ID to overwrite
        #[arg(long)]
        id: Option<String>,
    },
    /// Delete a user
    Delete {
        /// User ID
        id: String,
    },
}

/// A user as printed by the CLI.
#[derive(Debug, serde::Serialize)]
pub struct UserOutput {
    /// Stored key.
    pub id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Email address, if any.
    pub email: Option<String>,
    /// RFC 3339 creation time.
    pub created_at: Option<String>,
    /// RFC 3339 last update time.
    pub updated_at: Option<String>,
}

impl From<&User> for UserOutput {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.map(EntityId::get),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at.map(|t| t.to_rfc3339()),
            updated_at: user.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

impl CommandOutput for UserOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("ID: {}", self.id.map_or_else(|| "-".to_string(), |id| id.to_string())),
            format!("Name: {}", self.name),
        ];
        if let Some(email) = &self.email {
            lines.push(format!("Email: {email}"));
        }
        if let Some(created) = &self.created_at {
            lines.push(format!("Created: {created}"));
        }
        if let Some(updated) = &self.updated_at {
            lines.push(format!("Updated: {updated}"));
        }
        lines.join("\n")
    }
}

/// Result of a save or delete.
#[derive(Debug, serde::Serialize)]
pub struct UserActionOutput {
    /// Whether the operation completed.
    pub success: bool,
    /// Summary line.
    pub message: String,
    /// The stored user after a save.
    pub user: Option<UserOutput>,
}

impl CommandOutput for UserActionOutput {
    fn to_human(&self) -> String {
        match &self.user {
            Some(user) => format!("{}\n{}", self.message, user.to_human()),
            None => self.message.clone(),
        }
    }
}

fn parse_id(raw: &str) -> Result<EntityId> {
    raw.parse::<EntityId>().context("Invalid user ID")
}

/// Run one `user` subcommand through the cached service.
pub async fn execute(args: UserArgs, config: &Config, json_mode: bool) -> Result<()> {
    let service = build_service(config, false)
        .await
        .context("Failed to initialize database. Run 'user-cache init' first.")?;

    match args.command {
        UserCommands::Get { id } => {
            let id = parse_id(&id)?;
            let user = service
                .get(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;
            output(&UserOutput::from(&user), json_mode);
        }

        UserCommands::Save { name, email, id } => {
            let mut user = User::new(name);
            user.email = email;
            if let Some(raw) = id {
                user = user.with_id(parse_id(&raw)?);
            }

            let saved = service.save(user).await?;
            let out = UserActionOutput {
                success: true,
                message: format!(
                    "User saved: {}",
                    saved.id.map_or_else(|| "-".to_string(), |id| id.to_string())
                ),
                user: Some(UserOutput::from(&saved)),
            };
            output(&out, json_mode);
        }

        UserCommands::Delete { id } => {
            let id = parse_id(&id)?;
            service.delete(id).await?;
            let out = UserActionOutput {
                success: true,
                message: format!("User deleted: {id}"),
                user: None,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
