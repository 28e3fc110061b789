//! Register command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};
use vinledger_core::{is_valid_vin, NewVehicle};

use crate::client::RegistryClient;
use crate::utils::{print_vehicle, Output};

/// Execute the register command.
pub async fn execute(client: &RegistryClient, input: NewVehicle, output: Output) -> Result<()> {
    if !is_valid_vin(&input.vin) {
        warn!(vin = %input.vin, "VIN does not follow the 17-character VIN alphabet");
        if !output.quiet && !output.json {
            eprintln!(
                "{} {} is not a standard VIN; registering anyway",
                "warning:".yellow().bold(),
                input.vin
            );
        }
    }

    let vehicle = client
        .register_vehicle(&input)
        .await
        .with_context(|| format!("Failed to register vehicle {}", input.vin))?;

    info!(id = vehicle.id, vin = %vehicle.vin, nft_id = %vehicle.nft_id, "Vehicle registered");

    if !output.json(&vehicle)? && !output.quiet {
        println!();
        println!("{} Vehicle registered", "✓".green().bold());
        println!();
        print_vehicle(&vehicle);
    }
    Ok(())
}
