//! Login command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use crate::client::RegistryClient;
use crate::utils::Output;

/// Execute the login command.
pub async fn execute(
    client: &RegistryClient,
    authority_id: String,
    access_key: String,
    output: Output,
) -> Result<()> {
    let session = client
        .login(&authority_id, &access_key)
        .await
        .with_context(|| format!("Login failed for {}", authority_id))?;

    info!(code = %session.authority.authority_id, "Logged in");

    if !output.json(&session)? && !output.quiet {
        let authority = &session.authority;
        println!("{} Logged in as {}", "✓".green().bold(), authority.name.bold());
        println!("   {} {}", "Authority:".dimmed(), authority.authority_id);
        println!("   {} {}", "Department:".dimmed(), authority.department);
        println!("   {} {}", "Access level:".dimmed(), authority.access_level);
        println!("   {} {}", "Token:".dimmed(), session.token);
    }
    Ok(())
}
