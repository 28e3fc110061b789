//! Common utility functions shared across CLI commands.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use vinledger_core::{Vehicle, VehicleStatus, VerificationResult};

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Print nothing on success
    pub quiet: bool,
    /// Print raw JSON records instead of formatted text
    pub json: bool,
}

impl Output {
    /// Print `value` as pretty JSON when JSON output is selected.
    ///
    /// Returns `true` if it printed, so callers skip the text rendering.
    pub fn json<T: Serialize>(&self, value: &T) -> Result<bool> {
        if !self.json {
            return Ok(false);
        }
        if !self.quiet {
            let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
            println!("{}", text);
        }
        Ok(true)
    }
}

/// Format a timestamp as a human-readable UTC string.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn status_label(status: VehicleStatus) -> ColoredString {
    match status {
        VehicleStatus::Active => status.as_str().green(),
        VehicleStatus::Suspended => status.as_str().yellow(),
        VehicleStatus::Stolen => status.as_str().red().bold(),
    }
}

pub fn result_label(result: VerificationResult) -> ColoredString {
    match result {
        VerificationResult::Verified => result.as_str().green(),
        VerificationResult::Suspicious => result.as_str().yellow(),
        VerificationResult::Stolen => result.as_str().red().bold(),
    }
}

/// Outcome a scan implies for a vehicle in the given status.
pub fn outcome_for(status: VehicleStatus) -> VerificationResult {
    match status {
        VehicleStatus::Active => VerificationResult::Verified,
        VehicleStatus::Suspended => VerificationResult::Suspicious,
        VehicleStatus::Stolen => VerificationResult::Stolen,
    }
}

/// Print the labelled fields of a vehicle record.
pub fn print_vehicle(vehicle: &Vehicle) {
    println!("   {} {}", "ID:".dimmed(), vehicle.id);
    println!("   {} {}", "VIN:".dimmed(), vehicle.vin.bold());
    println!(
        "   {} {} ({}, {})",
        "Model:".dimmed(),
        vehicle.model,
        vehicle.year,
        vehicle.color
    );
    println!("   {} {}", "Plates:".dimmed(), vehicle.plates);
    println!("   {} {}", "Owner:".dimmed(), vehicle.owner);
    println!("   {} {}", "Status:".dimmed(), status_label(vehicle.status));
    println!("   {} {}", "NFT token:".dimmed(), vehicle.nft_id);
    println!("   {} {}", "QR code:".dimmed(), vehicle.qr_code);
    println!(
        "   {} {}",
        "Registered:".dimmed(),
        format_timestamp(&vehicle.registered_at)
    );
    if let Some(wallet) = &vehicle.wallet_address {
        println!("   {} {}", "Wallet:".dimmed(), wallet);
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 45).unwrap();
        assert_eq!(format_timestamp(&at), "2024-01-15 12:30:45 UTC");
    }

    #[test]
    fn test_outcome_for_status() {
        assert_eq!(outcome_for(VehicleStatus::Active), VerificationResult::Verified);
        assert_eq!(
            outcome_for(VehicleStatus::Suspended),
            VerificationResult::Suspicious
        );
        assert_eq!(outcome_for(VehicleStatus::Stolen), VerificationResult::Stolen);
    }

    #[test]
    fn test_json_output_disabled() {
        let output = Output::default();
        assert!(!output.json(&VehicleStatus::Active).unwrap());
    }
}
