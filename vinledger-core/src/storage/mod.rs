//! Registry storage
//!
//! The [`RegistryStorage`] trait is the contract the request dispatcher works
//! against. [`MemStorage`] is the only backend: all state lives in process
//! memory and is lost on restart.
//!
//! Lookups return `Option`; a miss is a normal outcome, not an error. The
//! plain `create_*` methods never enforce key uniqueness. Callers that need
//! it use the `register_*` variants, which check and insert atomically.

mod memory;

pub use memory::{MemStorage, MAX_TOKEN_DRAWS};

use std::fmt::Debug;

use crate::error::Result;
use crate::model::{
    Authority, NewAuthority, NewVehicle, NewVerification, Vehicle, VehicleStatus, Verification,
};
use crate::stats::Statistics;

/// Storage contract for vehicles, authorities and verifications.
///
/// Implementations must be thread-safe. Every method is atomic with respect
/// to every other method.
pub trait RegistryStorage: Send + Sync + Debug {
    // =========================================================================
    // Vehicles
    // =========================================================================

    /// Get a vehicle by store id
    fn vehicle(&self, id: u64) -> Option<Vehicle>;

    /// First vehicle registered with exactly this VIN
    fn vehicle_by_vin(&self, vin: &str) -> Option<Vehicle>;

    /// First vehicle registered with exactly these plates
    fn vehicle_by_plates(&self, plates: &str) -> Option<Vehicle>;

    /// Vehicle holding this NFT token id
    fn vehicle_by_nft_id(&self, nft_id: &str) -> Option<Vehicle>;

    /// Store a new vehicle without checking VIN uniqueness
    fn create_vehicle(&self, input: NewVehicle) -> Vehicle;

    /// Store a new vehicle unless its VIN is already registered
    fn register_vehicle(&self, input: NewVehicle) -> Result<Vehicle>;

    /// Change a vehicle's status, leaving every other field untouched.
    /// Returns `None` when the id is unknown.
    fn update_vehicle_status(&self, id: u64, status: VehicleStatus) -> Option<Vehicle>;

    /// All vehicles in registration order
    fn vehicles(&self) -> Vec<Vehicle>;

    /// Number of registered vehicles
    fn vehicle_count(&self) -> u64;

    // =========================================================================
    // Authorities
    // =========================================================================

    fn authority(&self, id: u64) -> Option<Authority>;

    /// First authority registered with exactly this code
    fn authority_by_code(&self, code: &str) -> Option<Authority>;

    /// Store a new authority without checking code uniqueness
    fn create_authority(&self, input: NewAuthority) -> Authority;

    /// Store a new authority unless its code is already registered
    fn register_authority(&self, input: NewAuthority) -> Result<Authority>;

    // =========================================================================
    // Verifications
    // =========================================================================

    fn create_verification(&self, input: NewVerification) -> Verification;

    /// Verifications recorded for a vehicle id, oldest first. Empty both when
    /// the vehicle has none and when it does not exist.
    fn verifications_for_vehicle(&self, vehicle_id: u64) -> Vec<Verification>;

    // =========================================================================
    // Statistics
    // =========================================================================

    fn statistics(&self) -> Statistics;
}
