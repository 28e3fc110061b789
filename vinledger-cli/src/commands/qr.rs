//! QR command implementation.

use anyhow::{anyhow, Result};
use colored::Colorize;

use crate::client::RegistryClient;
use crate::utils::Output;

/// Execute the qr command.
pub async fn execute(client: &RegistryClient, vehicle_id: u64, output: Output) -> Result<()> {
    let qr = client
        .qr(vehicle_id)
        .await?
        .ok_or_else(|| anyhow!("Vehicle not found"))?;

    if !output.json(&qr)? && !output.quiet {
        println!();
        println!("   {} {}", "VIN:".dimmed(), qr.payload.vin);
        println!("   {} {}", "NFT token:".dimmed(), qr.payload.nft_id);
        println!("   {} {}", "Verify URL:".dimmed(), qr.payload.verify_url);
        println!("   {} {}", "QR image:".dimmed(), qr.qr_image_url.cyan());
    }
    Ok(())
}
