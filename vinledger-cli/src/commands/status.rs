//! Status command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;
use vinledger_core::VehicleStatus;

use crate::client::RegistryClient;
use crate::utils::{status_label, Output};

/// Execute the status command.
pub async fn execute(
    client: &RegistryClient,
    id: u64,
    status: VehicleStatus,
    output: Output,
) -> Result<()> {
    let vehicle = client
        .update_status(id, status)
        .await
        .with_context(|| format!("Failed to set status of vehicle {}", id))?;

    info!(id, vin = %vehicle.vin, %status, "Status updated");

    if !output.json(&vehicle)? && !output.quiet {
        println!(
            "{} {} ({}) is now {}",
            "✓".green().bold(),
            vehicle.vin.bold(),
            vehicle.plates,
            status_label(vehicle.status)
        );
    }
    Ok(())
}
