//! History command implementation.

use anyhow::Result;
use colored::Colorize;

use crate::client::RegistryClient;
use crate::utils::{format_timestamp, result_label, Output};

/// Execute the history command.
pub async fn execute(client: &RegistryClient, vehicle_id: u64, output: Output) -> Result<()> {
    let verifications = client.verifications(vehicle_id).await?;

    if output.json(&verifications)? || output.quiet {
        return Ok(());
    }

    if verifications.is_empty() {
        println!("No verifications recorded for vehicle {}", vehicle_id);
        return Ok(());
    }

    println!();
    println!(
        "{} {} verification(s) for vehicle {}",
        "History:".bold(),
        verifications.len(),
        vehicle_id
    );
    for verification in &verifications {
        println!(
            "   #{:<5} {}  {:<10}  {}",
            verification.id,
            format_timestamp(&verification.verification_at),
            result_label(verification.result),
            verification
                .verifier_address
                .as_deref()
                .unwrap_or("-")
                .dimmed()
        );
    }
    Ok(())
}
