//! In-memory storage backend
//!
//! A single mutex guards every collection, id counter and secondary index,
//! so reads never observe a half-applied insert.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::RegistryStorage;
use crate::error::{RegistryError, Result};
use crate::model::{
    AccessLevel, Authority, NewAuthority, NewVehicle, NewVerification, Vehicle, VehicleStatus,
    Verification,
};
use crate::qr::qr_reference;
use crate::stats::Statistics;
use crate::token::{RandomTokenIds, TokenIdSource, TOKEN_ID_RANGE};

/// Candidate draws before falling back to the first free id past the range.
pub const MAX_TOKEN_DRAWS: usize = 32;

/// Collections, counters and indices. Only touched with the lock held.
#[derive(Default)]
struct Registry {
    // Keyed by id; ids are handed out in increasing order, so iteration
    // order is insertion order.
    vehicles: BTreeMap<u64, Vehicle>,
    authorities: BTreeMap<u64, Authority>,
    verifications: BTreeMap<u64, Verification>,

    last_vehicle_id: u64,
    last_authority_id: u64,
    last_verification_id: u64,

    // Secondary indices keep the first id registered under each key.
    vins: HashMap<String, u64>,
    plates: HashMap<String, u64>,
    nft_ids: HashMap<String, u64>,
    authority_codes: HashMap<String, u64>,
    verifications_by_vehicle: HashMap<u64, Vec<u64>>,
}

impl Registry {
    fn next_vehicle_id(&mut self) -> u64 {
        self.last_vehicle_id += 1;
        self.last_vehicle_id
    }

    fn next_authority_id(&mut self) -> u64 {
        self.last_authority_id += 1;
        self.last_authority_id
    }

    fn next_verification_id(&mut self) -> u64 {
        self.last_verification_id += 1;
        self.last_verification_id
    }

    fn lookup<'a>(
        index: &HashMap<String, u64>,
        records: &'a BTreeMap<u64, Vehicle>,
        key: &str,
    ) -> Option<&'a Vehicle> {
        index.get(key).and_then(|id| records.get(id))
    }

    fn insert_vehicle(&mut self, input: NewVehicle, nft_id: String) -> Vehicle {
        let id = self.next_vehicle_id();
        let vehicle = Vehicle {
            id,
            qr_code: qr_reference(&input.vin),
            vin: input.vin,
            model: input.model,
            year: input.year,
            color: input.color,
            plates: input.plates,
            owner: input.owner,
            nft_id,
            status: VehicleStatus::Active,
            registered_at: Utc::now(),
            wallet_address: input.wallet_address,
        };

        self.vins.entry(vehicle.vin.clone()).or_insert(id);
        self.plates.entry(vehicle.plates.clone()).or_insert(id);
        self.nft_ids.entry(vehicle.nft_id.clone()).or_insert(id);
        self.vehicles.insert(id, vehicle.clone());

        info!(
            vehicle_id = id,
            vin = %vehicle.vin,
            nft_id = %vehicle.nft_id,
            "Registered vehicle"
        );
        vehicle
    }

    fn insert_authority(&mut self, input: NewAuthority) -> Authority {
        let id = self.next_authority_id();
        let authority = Authority {
            id,
            authority_id: input.authority_id,
            name: input.name,
            department: input.department,
            access_level: input.access_level,
            wallet_address: input.wallet_address,
        };

        self.authority_codes
            .entry(authority.authority_id.clone())
            .or_insert(id);
        self.authorities.insert(id, authority.clone());

        info!(
            authority_id = id,
            code = %authority.authority_id,
            access_level = %authority.access_level,
            "Registered authority"
        );
        authority
    }
}

/// In-memory registry store
pub struct MemStorage {
    registry: Mutex<Registry>,
    token_ids: Box<dyn TokenIdSource>,
}

impl MemStorage {
    /// Create an empty store minting random token ids
    pub fn new() -> Self {
        Self::with_token_source(RandomTokenIds)
    }

    /// Create an empty store with a custom token id source
    pub fn with_token_source(token_ids: impl TokenIdSource + 'static) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            token_ids: Box::new(token_ids),
        }
    }

    /// Create a store holding the demo vehicle and authority
    pub fn with_sample_data() -> Self {
        let storage = Self::new();
        storage.seed_sample_data();
        storage
    }

    /// Insert the demo vehicle (NFT `1234`) and the demo authority `AUTH001`.
    pub fn seed_sample_data(&self) {
        let mut registry = self.registry();

        registry.insert_vehicle(
            NewVehicle {
                vin: "1HGBH41JXMN109186".into(),
                model: "Toyota Corolla 2023".into(),
                year: 2023,
                color: "Blanco".into(),
                plates: "ABC-123-XYZ".into(),
                owner: "Juan Pérez García".into(),
                wallet_address: Some("0x1234567890123456789012345678901234567890".into()),
            },
            "1234".into(),
        );

        registry.insert_authority(NewAuthority {
            authority_id: "AUTH001".into(),
            name: "María González".into(),
            department: "Tránsito Municipal".into(),
            access_level: AccessLevel::Officer,
            wallet_address: Some("0x0987654321098765432109876543210987654321".into()),
        });
    }

    // Every critical section leaves the registry consistent, so a panic in
    // another thread does not invalidate the data.
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Mint a token id not yet held by any vehicle.
    fn mint_token_id(&self, registry: &Registry) -> String {
        for attempt in 1..=MAX_TOKEN_DRAWS {
            let candidate = self.token_ids.next_token_id().to_string();
            if !registry.nft_ids.contains_key(&candidate) {
                return candidate;
            }
            debug!(attempt, candidate = %candidate, "Token id collision, redrawing");
        }

        let fallback = (TOKEN_ID_RANGE..)
            .map(|n| n.to_string())
            .find(|candidate| !registry.nft_ids.contains_key(candidate))
            .unwrap_or_else(|| u64::MAX.to_string());
        warn!(
            draws = MAX_TOKEN_DRAWS,
            token_id = %fallback,
            "Token id source kept colliding, using first free id past the range"
        );
        fallback
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryStorage for MemStorage {
    // =========================================================================
    // Vehicles
    // =========================================================================

    fn vehicle(&self, id: u64) -> Option<Vehicle> {
        self.registry().vehicles.get(&id).cloned()
    }

    fn vehicle_by_vin(&self, vin: &str) -> Option<Vehicle> {
        let registry = self.registry();
        Registry::lookup(&registry.vins, &registry.vehicles, vin).cloned()
    }

    fn vehicle_by_plates(&self, plates: &str) -> Option<Vehicle> {
        let registry = self.registry();
        Registry::lookup(&registry.plates, &registry.vehicles, plates).cloned()
    }

    fn vehicle_by_nft_id(&self, nft_id: &str) -> Option<Vehicle> {
        let registry = self.registry();
        Registry::lookup(&registry.nft_ids, &registry.vehicles, nft_id).cloned()
    }

    fn create_vehicle(&self, input: NewVehicle) -> Vehicle {
        let mut registry = self.registry();
        let nft_id = self.mint_token_id(&registry);
        registry.insert_vehicle(input, nft_id)
    }

    fn register_vehicle(&self, input: NewVehicle) -> Result<Vehicle> {
        let mut registry = self.registry();
        if registry.vins.contains_key(&input.vin) {
            return Err(RegistryError::DuplicateVin(input.vin));
        }
        let nft_id = self.mint_token_id(&registry);
        Ok(registry.insert_vehicle(input, nft_id))
    }

    fn update_vehicle_status(&self, id: u64, status: VehicleStatus) -> Option<Vehicle> {
        let mut registry = self.registry();
        let vehicle = registry.vehicles.get_mut(&id)?;
        let previous = vehicle.status;
        vehicle.status = status;

        info!(vehicle_id = id, from = %previous, to = %status, "Updated vehicle status");
        Some(vehicle.clone())
    }

    fn vehicles(&self) -> Vec<Vehicle> {
        self.registry().vehicles.values().cloned().collect()
    }

    fn vehicle_count(&self) -> u64 {
        self.registry().vehicles.len() as u64
    }

    // =========================================================================
    // Authorities
    // =========================================================================

    fn authority(&self, id: u64) -> Option<Authority> {
        self.registry().authorities.get(&id).cloned()
    }

    fn authority_by_code(&self, code: &str) -> Option<Authority> {
        let registry = self.registry();
        registry
            .authority_codes
            .get(code)
            .and_then(|id| registry.authorities.get(id))
            .cloned()
    }

    fn create_authority(&self, input: NewAuthority) -> Authority {
        self.registry().insert_authority(input)
    }

    fn register_authority(&self, input: NewAuthority) -> Result<Authority> {
        let mut registry = self.registry();
        if registry.authority_codes.contains_key(&input.authority_id) {
            return Err(RegistryError::DuplicateAuthority(input.authority_id));
        }
        Ok(registry.insert_authority(input))
    }

    // =========================================================================
    // Verifications
    // =========================================================================

    fn create_verification(&self, input: NewVerification) -> Verification {
        let mut registry = self.registry();
        let id = registry.next_verification_id();
        let verification = Verification {
            id,
            vehicle_id: input.vehicle_id,
            verifier_address: input.verifier_address,
            verification_at: Utc::now(),
            result: input.result,
        };

        registry
            .verifications_by_vehicle
            .entry(verification.vehicle_id)
            .or_default()
            .push(id);
        registry.verifications.insert(id, verification.clone());

        info!(
            verification_id = id,
            vehicle_id = verification.vehicle_id,
            result = %verification.result,
            "Recorded verification"
        );
        verification
    }

    fn verifications_for_vehicle(&self, vehicle_id: u64) -> Vec<Verification> {
        let registry = self.registry();
        registry
            .verifications_by_vehicle
            .get(&vehicle_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| registry.verifications.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    fn statistics(&self) -> Statistics {
        let registry = self.registry();
        Statistics::compute(registry.vehicles.values(), registry.verifications.len())
    }
}

impl std::fmt::Debug for MemStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry();
        f.debug_struct("MemStorage")
            .field("vehicles", &registry.vehicles.len())
            .field("authorities", &registry.authorities.len())
            .field("verifications", &registry.verifications.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::model::VerificationResult;
    use crate::token::SequentialTokenIds;

    fn new_vehicle(vin: &str, plates: &str) -> NewVehicle {
        NewVehicle {
            vin: vin.into(),
            model: "Nissan Versa".into(),
            year: 2021,
            color: "Rojo".into(),
            plates: plates.into(),
            owner: "Ana López".into(),
            wallet_address: None,
        }
    }

    fn new_authority(code: &str) -> NewAuthority {
        NewAuthority {
            authority_id: code.into(),
            name: "Carlos Ruiz".into(),
            department: "Policía Estatal".into(),
            access_level: AccessLevel::Verifier,
            wallet_address: None,
        }
    }

    fn verification(vehicle_id: u64, result: VerificationResult) -> NewVerification {
        NewVerification {
            vehicle_id,
            verifier_address: None,
            result,
        }
    }

    #[test]
    fn test_register_vehicle_assigns_derived_fields() {
        let storage = MemStorage::new();
        let before = Utc::now();
        let vehicle = storage.create_vehicle(new_vehicle("1HGBH41JXMN109186", "ABC-1"));

        assert_eq!(vehicle.id, 1);
        assert!(!vehicle.nft_id.is_empty());
        assert!(vehicle.nft_id.parse::<u64>().unwrap() < TOKEN_ID_RANGE);
        assert_eq!(vehicle.qr_code, "qr_1HGBH41JXMN109186");
        assert_eq!(vehicle.status, VehicleStatus::Active);
        assert!(vehicle.registered_at >= before);
        assert!(Utc::now() - vehicle.registered_at < Duration::seconds(5));
    }

    #[test]
    fn test_ids_increase_per_entity_kind() {
        let storage = MemStorage::new();
        let a = storage.create_vehicle(new_vehicle("VIN-A", "P-A"));
        let b = storage.create_vehicle(new_vehicle("VIN-B", "P-B"));
        let auth = storage.create_authority(new_authority("AUTH9"));
        let v = storage.create_verification(verification(a.id, VerificationResult::Verified));

        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(auth.id, 1);
        assert_eq!(v.id, 1);
    }

    #[test]
    fn test_lookup_by_secondary_keys() {
        let storage = MemStorage::with_token_source(SequentialTokenIds::new(500));
        let vehicle = storage.create_vehicle(new_vehicle("VIN-A", "P-A"));

        assert_eq!(storage.vehicle(vehicle.id), Some(vehicle.clone()));
        assert_eq!(storage.vehicle_by_vin("VIN-A"), Some(vehicle.clone()));
        assert_eq!(storage.vehicle_by_plates("P-A"), Some(vehicle.clone()));
        assert_eq!(storage.vehicle_by_nft_id("500"), Some(vehicle));

        assert_eq!(storage.vehicle(99), None);
        assert_eq!(storage.vehicle_by_vin("vin-a"), None);
        assert_eq!(storage.vehicle_by_plates("p-a"), None);
        assert_eq!(storage.vehicle_by_nft_id("501"), None);
    }

    #[test]
    fn test_create_vehicle_allows_duplicate_vin() {
        let storage = MemStorage::new();
        let first = storage.create_vehicle(new_vehicle("DUP", "P-1"));
        let second = storage.create_vehicle(new_vehicle("DUP", "P-2"));

        assert_ne!(first.id, second.id);
        assert_eq!(storage.vehicles().len(), 2);
        assert_eq!(storage.vehicle_by_vin("DUP").unwrap().id, first.id);
    }

    #[test]
    fn test_register_vehicle_rejects_duplicate_vin() {
        let storage = MemStorage::new();
        storage.register_vehicle(new_vehicle("DUP", "P-1")).unwrap();

        let err = storage
            .register_vehicle(new_vehicle("DUP", "P-2"))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateVin("DUP".into()));
        assert_eq!(storage.vehicles().len(), 1);
        assert_eq!(storage.vehicle_by_plates("P-2"), None);

        // The failed attempt does not consume an id
        let next = storage.register_vehicle(new_vehicle("NEW", "P-3")).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_update_status_changes_only_status() {
        let storage = MemStorage::new();
        let original = storage.create_vehicle(new_vehicle("VIN-A", "P-A"));

        let updated = storage
            .update_vehicle_status(original.id, VehicleStatus::Suspended)
            .unwrap();
        assert_eq!(updated.status, VehicleStatus::Suspended);
        assert_eq!(
            Vehicle {
                status: VehicleStatus::Active,
                ..updated.clone()
            },
            original
        );
        assert_eq!(storage.vehicle(original.id), Some(updated));
        assert_eq!(
            storage.vehicle_by_vin("VIN-A").unwrap().status,
            VehicleStatus::Suspended
        );
    }

    #[test]
    fn test_update_status_unknown_id() {
        let storage = MemStorage::new();
        let vehicle = storage.create_vehicle(new_vehicle("VIN-A", "P-A"));

        assert_eq!(storage.update_vehicle_status(42, VehicleStatus::Stolen), None);
        assert_eq!(storage.vehicles(), vec![vehicle]);
    }

    #[test]
    fn test_vehicles_in_insertion_order() {
        let storage = MemStorage::new();
        for n in 0..5 {
            storage.create_vehicle(new_vehicle(&format!("VIN-{n}"), &format!("P-{n}")));
        }
        let vins: Vec<_> = storage.vehicles().into_iter().map(|v| v.vin).collect();
        assert_eq!(vins, ["VIN-0", "VIN-1", "VIN-2", "VIN-3", "VIN-4"]);
    }

    #[test]
    fn test_vehicle_count() {
        let storage = MemStorage::with_sample_data();
        assert_eq!(storage.vehicle_count(), 1);

        storage.create_vehicle(new_vehicle("VIN-A", "P-A"));
        storage.create_verification(verification(1, VerificationResult::Verified));
        assert_eq!(storage.vehicle_count(), 2);
        assert_eq!(storage.vehicle_count(), storage.statistics().total_vehicles);
    }

    #[test]
    fn test_token_collisions_are_redrawn() {
        let storage = MemStorage::with_token_source(SequentialTokenIds::with_step(7, 0));
        let first = storage.create_vehicle(new_vehicle("VIN-A", "P-A"));
        let second = storage.create_vehicle(new_vehicle("VIN-B", "P-B"));
        let third = storage.create_vehicle(new_vehicle("VIN-C", "P-C"));

        assert_eq!(first.nft_id, "7");
        assert_eq!(second.nft_id, TOKEN_ID_RANGE.to_string());
        assert_eq!(third.nft_id, (TOKEN_ID_RANGE + 1).to_string());
        assert_eq!(storage.vehicle_by_nft_id("7").unwrap().id, first.id);
    }

    #[test]
    fn test_seed_token_is_not_reissued() {
        let storage = MemStorage::with_token_source(SequentialTokenIds::new(1234));
        storage.seed_sample_data();
        let vehicle = storage.create_vehicle(new_vehicle("VIN-A", "P-A"));
        assert_eq!(vehicle.nft_id, "1235");
    }

    #[test]
    fn test_authority_lookup_and_uniqueness() {
        let storage = MemStorage::new();
        let created = storage.register_authority(new_authority("AUTH9")).unwrap();

        assert_eq!(storage.authority(created.id), Some(created.clone()));
        assert_eq!(storage.authority_by_code("AUTH9"), Some(created));
        assert_eq!(storage.authority_by_code("auth9"), None);
        assert_eq!(
            storage.register_authority(new_authority("AUTH9")),
            Err(RegistryError::DuplicateAuthority("AUTH9".into()))
        );
    }

    #[test]
    fn test_verifications_for_vehicle() {
        let storage = MemStorage::new();
        let first = storage.create_verification(verification(1, VerificationResult::Verified));
        storage.create_verification(verification(2, VerificationResult::Suspicious));
        let third = storage.create_verification(verification(1, VerificationResult::Stolen));

        assert_eq!(storage.verifications_for_vehicle(1), vec![first, third]);
        assert_eq!(storage.verifications_for_vehicle(2).len(), 1);
        // Unknown and never-verified vehicles look the same
        assert!(storage.verifications_for_vehicle(3).is_empty());
    }

    #[test]
    fn test_sample_data() {
        let storage = MemStorage::with_sample_data();

        let vehicle = storage.vehicle_by_vin("1HGBH41JXMN109186").unwrap();
        assert_eq!(vehicle.id, 1);
        assert_eq!(vehicle.nft_id, "1234");
        assert_eq!(vehicle.plates, "ABC-123-XYZ");
        assert_eq!(vehicle.qr_code, "qr_1HGBH41JXMN109186");

        let authority = storage.authority_by_code("AUTH001").unwrap();
        assert_eq!(authority.id, 1);
        assert_eq!(authority.access_level, AccessLevel::Officer);

        let stats = storage.statistics();
        assert_eq!(stats.total_vehicles, 1);
        assert_eq!(stats.verified_vehicles, 1);
        assert_eq!(stats.total_scans, 0);
        assert_eq!(stats.active_users, 0);
    }

    #[test]
    fn test_statistics_example() {
        let storage = MemStorage::new();
        let a = storage.create_vehicle(new_vehicle("VIN-A", "P-A"));
        storage.create_vehicle(new_vehicle("VIN-B", "P-B"));
        let c = storage.create_vehicle(new_vehicle("VIN-C", "P-C"));
        storage.update_vehicle_status(c.id, VehicleStatus::Suspended);
        for _ in 0..4 {
            storage.create_verification(verification(a.id, VerificationResult::Verified));
        }

        let stats = storage.statistics();
        assert_eq!(stats.total_vehicles, 3);
        assert_eq!(stats.verified_vehicles, 2);
        assert_eq!(stats.total_scans, 20);
        assert_eq!(stats.active_users, 2);
    }

    #[test]
    fn test_concurrent_registrations_keep_vins_unique() {
        use std::sync::Arc;

        let storage = Arc::new(MemStorage::new());
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let storage = Arc::clone(&storage);
                std::thread::spawn(move || {
                    storage
                        .register_vehicle(new_vehicle("SAME-VIN", &format!("P-{n}")))
                        .is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(storage.vehicles().len(), 1);
    }

    #[test]
    fn test_debug_shows_counts() {
        let storage = MemStorage::with_sample_data();
        let debug = format!("{:?}", storage);
        assert!(debug.contains("vehicles: 1"));
        assert!(debug.contains("authorities: 1"));
    }
}
