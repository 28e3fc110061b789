//! Verify command implementation.
//!
//! Resolves scanned data to a registered vehicle, derives the verdict from
//! the vehicle's status and records it.

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use vinledger_core::{
    parse_qr_data, vehicle_id_from_url, NewVerification, ScannedCode, Vehicle, Verification,
    VerificationResult,
};

use crate::client::RegistryClient;
use crate::utils::{outcome_for, print_vehicle, result_label, status_label, Output};

/// What a scan resolved to before any lookup.
#[derive(Debug, PartialEq, Eq)]
pub enum ScanTarget {
    /// QR payload JSON or a bare VIN
    Code(ScannedCode),
    /// A verification page URL carrying the vehicle id
    Url(u64),
}

/// Interpret the scanned text.
///
/// A QR payload wins over a URL it embeds, and a verification URL wins over
/// the 17-character bare VIN rule.
pub fn parse_scan(raw: &str) -> Result<ScanTarget> {
    let raw = raw.trim();
    match (parse_qr_data(raw), vehicle_id_from_url(raw)) {
        (Some(code @ ScannedCode::Payload(_)), _) => Ok(ScanTarget::Code(code)),
        (_, Some(id)) => Ok(ScanTarget::Url(id)),
        (Some(code), None) => Ok(ScanTarget::Code(code)),
        (None, None) => {
            bail!("Invalid input: scan data is neither a QR payload, a verification URL nor a VIN")
        }
    }
}

/// Verdict for a resolved vehicle.
///
/// The status decides, except that a QR payload carrying a different NFT
/// token than the registry makes an otherwise clean vehicle suspicious.
pub fn verdict(target: &ScanTarget, vehicle: &Vehicle) -> VerificationResult {
    let outcome = outcome_for(vehicle.status);
    match target {
        ScanTarget::Code(ScannedCode::Payload(payload))
            if payload.nft_id != vehicle.nft_id && outcome == VerificationResult::Verified =>
        {
            warn!(
                scanned = %payload.nft_id,
                registered = %vehicle.nft_id,
                "NFT token mismatch"
            );
            VerificationResult::Suspicious
        }
        _ => outcome,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyReport<'a> {
    result: VerificationResult,
    vehicle: &'a Vehicle,
    recorded: Option<&'a Verification>,
}

/// Execute the verify command.
pub async fn execute(
    client: &RegistryClient,
    scan: String,
    verifier: Option<String>,
    record: bool,
    output: Output,
) -> Result<()> {
    let target = parse_scan(&scan)?;
    debug!(?target, "Parsed scan");

    let vehicle = match &target {
        ScanTarget::Code(code) => client.vehicle_by_vin(code.vin()).await?,
        ScanTarget::Url(id) => client.vehicle(*id).await?,
    }
    .ok_or_else(|| anyhow!("Verification failed: no registered vehicle matches the scan"))?;

    let result = verdict(&target, &vehicle);

    let recorded = if record {
        let verification = client
            .record_verification(&NewVerification {
                vehicle_id: vehicle.id,
                verifier_address: verifier,
                result,
            })
            .await?;
        info!(id = verification.id, vehicle_id = vehicle.id, %result, "Recorded verification");
        Some(verification)
    } else {
        None
    };

    let report = VerifyReport {
        result,
        vehicle: &vehicle,
        recorded: recorded.as_ref(),
    };
    if !output.json(&report)? && !output.quiet {
        print_verdict(&vehicle, result, recorded.as_ref());
    }

    if result == VerificationResult::Verified {
        Ok(())
    } else {
        error!(vin = %vehicle.vin, status = %vehicle.status, "Vehicle flagged");
        bail!("Verification failed: vehicle {} is {}", vehicle.vin, result)
    }
}

fn print_verdict(vehicle: &Vehicle, result: VerificationResult, recorded: Option<&Verification>) {
    let banner = match result {
        VerificationResult::Verified => "║              VERIFIED                  ║",
        VerificationResult::Suspicious => "║             SUSPICIOUS                 ║",
        VerificationResult::Stolen => "║         REPORTED STOLEN                ║",
    };
    let paint = |line: &str| match result {
        VerificationResult::Verified => line.green(),
        VerificationResult::Suspicious => line.yellow(),
        VerificationResult::Stolen => line.red(),
    };

    println!();
    println!("{}", paint("╔════════════════════════════════════════╗"));
    println!("{}", paint(banner).bold());
    println!("{}", paint("╚════════════════════════════════════════╝"));
    println!();
    print_vehicle(vehicle);
    println!(
        "   {} {} ({})",
        "Verdict:".dimmed(),
        result_label(result),
        status_label(vehicle.status)
    );
    match recorded {
        Some(verification) => println!("   {} #{}", "Recorded as:".dimmed(), verification.id),
        None => println!("   {} {}", "Recorded as:".dimmed(), "not recorded".dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use vinledger_core::{QrPayload, VehicleStatus};

    use super::*;

    fn vehicle(status: VehicleStatus) -> Vehicle {
        Vehicle {
            id: 1,
            vin: "1HGBH41JXMN109186".into(),
            model: "Toyota Corolla 2023".into(),
            year: 2023,
            color: "Blanco".into(),
            plates: "ABC-123-XYZ".into(),
            owner: "Juan Pérez García".into(),
            nft_id: "1234".into(),
            qr_code: "qr_1HGBH41JXMN109186".into(),
            status,
            registered_at: Utc::now(),
            wallet_address: None,
        }
    }

    fn payload(nft_id: &str) -> ScanTarget {
        ScanTarget::Code(ScannedCode::Payload(QrPayload {
            vin: "1HGBH41JXMN109186".into(),
            nft_id: nft_id.into(),
            verify_url: String::new(),
        }))
    }

    #[test]
    fn test_parse_scan_variants() {
        assert_eq!(
            parse_scan(" 1HGBH41JXMN109186 ").unwrap(),
            ScanTarget::Code(ScannedCode::Vin("1HGBH41JXMN109186".into()))
        );
        assert_eq!(
            parse_scan("http://localhost:3000/verify/7").unwrap(),
            ScanTarget::Url(7)
        );
        assert!(matches!(
            parse_scan(r#"{"vin":"1HGBH41JXMN109186","nftId":"1234"}"#).unwrap(),
            ScanTarget::Code(ScannedCode::Payload(_))
        ));
    }

    #[test]
    fn test_parse_scan_short_url_is_not_a_vin() {
        assert_eq!("http://a/verify/1".len(), 17);
        assert_eq!(parse_scan("http://a/verify/1").unwrap(), ScanTarget::Url(1));
    }

    #[test]
    fn test_parse_scan_payload_keeps_embedded_url() {
        let scan = parse_scan(
            r#"{"vin":"1HGBH41JXMN109186","nftId":"1234","verifyUrl":"http://localhost/verify/1"}"#,
        )
        .unwrap();
        match scan {
            ScanTarget::Code(ScannedCode::Payload(payload)) => {
                assert_eq!(payload.nft_id, "1234");
                assert_eq!(payload.verify_url, "http://localhost/verify/1");
            }
            other => panic!("expected payload, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_scan_rejects_garbage() {
        let err = parse_scan("hello").unwrap_err();
        assert!(err.to_string().starts_with("Invalid input"));
    }

    #[test]
    fn test_verdict_follows_status() {
        let scan = payload("1234");
        assert_eq!(
            verdict(&scan, &vehicle(VehicleStatus::Active)),
            VerificationResult::Verified
        );
        assert_eq!(
            verdict(&scan, &vehicle(VehicleStatus::Suspended)),
            VerificationResult::Suspicious
        );
        assert_eq!(
            verdict(&scan, &vehicle(VehicleStatus::Stolen)),
            VerificationResult::Stolen
        );
    }

    #[test]
    fn test_verdict_token_mismatch() {
        assert_eq!(
            verdict(&payload("9999"), &vehicle(VehicleStatus::Active)),
            VerificationResult::Suspicious
        );
        assert_eq!(
            verdict(&payload("9999"), &vehicle(VehicleStatus::Stolen)),
            VerificationResult::Stolen
        );
    }
}
