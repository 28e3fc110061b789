//! Lookup command implementation.

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::client::RegistryClient;
use crate::utils::{print_vehicle, Output};

/// Which index to search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(u64),
    Vin(String),
    Plates(String),
    NftId(String),
}

/// Execute the lookup command.
pub async fn execute(client: &RegistryClient, selector: Selector, output: Output) -> Result<()> {
    debug!(?selector, "Looking up vehicle");

    let vehicle = match &selector {
        Selector::Id(id) => client.vehicle(*id).await?,
        Selector::Vin(vin) => client.vehicle_by_vin(vin).await?,
        Selector::Plates(plates) => client.vehicle_by_plates(plates).await?,
        Selector::NftId(nft_id) => client.vehicle_by_nft_id(nft_id).await?,
    }
    .ok_or_else(|| anyhow!("Vehicle not found"))?;

    if !output.json(&vehicle)? && !output.quiet {
        println!();
        print_vehicle(&vehicle);
    }
    Ok(())
}
