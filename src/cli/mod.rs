//! Command-line interface
//!
//! `serve` runs the HTTP server; `create-admin` bootstraps the first admin
//! account (registration via the API always produces a plain pending user).

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::errors::{AgentHubError, Result};
use crate::storage::HubStorage;
use crate::storage::models::{ROLE_ADMIN, ROLE_USER};
use crate::utils::password::hash_password;

#[derive(Parser, Debug)]
#[command(name = "agenthub", version, about = "AI Agent Hub backend service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create an active admin account (prompts for a password)
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
    },
    /// Print a sample config.toml to stdout
    SampleConfig,
}

/// Create an active admin account
pub async fn create_admin(storage: &HubStorage, email: &str, username: &str) -> Result<()> {
    if storage.find_user_by_email(email).await?.is_some() {
        return Err(AgentHubError::conflict("Email already registered"));
    }
    if storage.find_user_by_username(username).await?.is_some() {
        return Err(AgentHubError::conflict("Username already taken"));
    }

    let password = rpassword::prompt_password("Admin password: ")
        .map_err(|e| AgentHubError::validation(format!("Cannot read password: {}", e)))?;
    let confirm = rpassword::prompt_password("Confirm password: ")
        .map_err(|e| AgentHubError::validation(format!("Cannot read password: {}", e)))?;

    if password != confirm {
        return Err(AgentHubError::validation("Passwords do not match"));
    }
    if password.len() < 8 {
        return Err(AgentHubError::validation(
            "Password must be at least 8 characters",
        ));
    }

    let password_hash = hash_password(&password)
        .map_err(|e| AgentHubError::validation(format!("Cannot hash password: {}", e)))?;

    let user = storage
        .insert_user(
            email,
            username,
            &password_hash,
            &[ROLE_USER.to_string(), ROLE_ADMIN.to_string()],
        )
        .await?;

    // Self-approved: the bootstrap admin does not wait for anyone
    storage.activate_user(user.id, user.id).await?;

    println!(
        "{} admin account '{}' created (id {})",
        "[OK]".green().bold(),
        username,
        user.id
    );
    Ok(())
}
