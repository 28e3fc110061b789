//! Registry records and their creation inputs.
//!
//! Records serialize with camelCase field names and lowercase enum values,
//! matching the JSON the web client consumes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Registration status of a vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    /// Registered and in good standing (default)
    #[default]
    Active,
    /// Registration suspended by an authority
    Suspended,
    /// Reported stolen
    Stolen,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 3] = [Self::Active, Self::Suspended, Self::Stolen];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Stolen => "stolen",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = RegistryError;

    /// Exact, case-sensitive match on the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "stolen" => Ok(Self::Stolen),
            other => Err(RegistryError::InvalidStatus(other.to_string())),
        }
    }
}

/// Access level granted to an authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Admin,
    Officer,
    Verifier,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Officer => "officer",
            Self::Verifier => "verifier",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "officer" => Ok(Self::Officer),
            "verifier" => Ok(Self::Verifier),
            other => Err(RegistryError::InvalidAccessLevel(other.to_string())),
        }
    }
}

/// Outcome recorded by a verification event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum VerificationResult {
    Verified,
    Suspicious,
    Stolen,
}

impl VerificationResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Suspicious => "suspicious",
            Self::Stolen => "stolen",
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationResult {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verified" => Ok(Self::Verified),
            "suspicious" => Ok(Self::Suspicious),
            "stolen" => Ok(Self::Stolen),
            other => Err(RegistryError::InvalidVerificationResult(other.to_string())),
        }
    }
}

/// A registered vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Store-assigned identifier, stable for the record's lifetime
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: u64,
    /// Vehicle identification number
    #[cfg_attr(feature = "openapi", schema(example = "1HGBH41JXMN109186"))]
    pub vin: String,
    #[cfg_attr(feature = "openapi", schema(example = "Toyota Corolla 2023"))]
    pub model: String,
    #[cfg_attr(feature = "openapi", schema(example = 2023))]
    pub year: i32,
    pub color: String,
    /// License plate
    #[cfg_attr(feature = "openapi", schema(example = "ABC-123-XYZ"))]
    pub plates: String,
    pub owner: String,
    /// Simulated NFT token id, string-encoded integer
    #[cfg_attr(feature = "openapi", schema(example = "1234"))]
    pub nft_id: String,
    /// QR reference, always `qr_<vin>`
    #[cfg_attr(feature = "openapi", schema(example = "qr_1HGBH41JXMN109186"))]
    pub qr_code: String,
    pub status: VehicleStatus,
    pub registered_at: DateTime<Utc>,
    pub wallet_address: Option<String>,
}

/// Input for registering a vehicle
///
/// The store assigns the id, NFT id, QR reference, status and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub vin: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub plates: String,
    pub owner: String,
    #[serde(default)]
    pub wallet_address: Option<String>,
}

/// A registered authority (police, transit office, inspector)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Authority {
    pub id: u64,
    /// Authority code used to log in
    #[cfg_attr(feature = "openapi", schema(example = "AUTH001"))]
    pub authority_id: String,
    pub name: String,
    pub department: String,
    pub access_level: AccessLevel,
    pub wallet_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewAuthority {
    pub authority_id: String,
    pub name: String,
    pub department: String,
    pub access_level: AccessLevel,
    #[serde(default)]
    pub wallet_address: Option<String>,
}

/// A single verification event against a vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub id: u64,
    /// Referenced vehicle; not checked for existence
    pub vehicle_id: u64,
    pub verifier_address: Option<String>,
    pub verification_at: DateTime<Utc>,
    pub result: VerificationResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewVerification {
    pub vehicle_id: u64,
    #[serde(default)]
    pub verifier_address: Option<String>,
    pub result: VerificationResult,
}
