//! Stats command implementation.

use anyhow::Result;
use colored::Colorize;

use crate::client::RegistryClient;
use crate::utils::Output;

/// Execute the stats command.
pub async fn execute(client: &RegistryClient, output: Output) -> Result<()> {
    let stats = client.statistics().await?;

    if !output.json(&stats)? && !output.quiet {
        println!();
        println!("{}", "Registry statistics".bold());
        println!("   {} {}", "Registered vehicles:".dimmed(), stats.total_vehicles);
        println!("   {} {}", "Active vehicles:".dimmed(), stats.verified_vehicles);
        println!("   {} {}", "Estimated scans:".dimmed(), stats.total_scans);
        println!("   {} {}", "Estimated users:".dimmed(), stats.active_users);
    }
    Ok(())
}
