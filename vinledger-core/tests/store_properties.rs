//! Property-based tests for the registry store.
//!
//! These tests check, for arbitrary sequences of registrations, that:
//! 1. IDS: vehicle ids are unique and strictly increasing
//! 2. LOOKUP: every vehicle is found by its VIN right after creation
//! 3. TOKENS: NFT token ids never repeat
//! 4. STATISTICS: counts follow the published formulas

use std::collections::HashSet;

use proptest::prelude::*;
use vinledger_core::{
    MemStorage, NewVehicle, NewVerification, RegistryStorage, SequentialTokenIds, VehicleStatus,
    VerificationResult,
};

fn new_vehicle(vin: &str, n: usize) -> NewVehicle {
    NewVehicle {
        vin: vin.to_string(),
        model: "Chevrolet Aveo".into(),
        year: 2019,
        color: "Azul".into(),
        plates: format!("PLT-{n}"),
        owner: "Luis Hernández".into(),
        wallet_address: None,
    }
}

fn status_strategy() -> impl Strategy<Value = VehicleStatus> {
    prop_oneof![
        Just(VehicleStatus::Active),
        Just(VehicleStatus::Suspended),
        Just(VehicleStatus::Stolen),
    ]
}

proptest! {
    /// Ids strictly increase and each vehicle is found by VIN right after creation
    #[test]
    fn prop_ids_increase_and_vin_lookup_hits(
        vins in prop::collection::hash_set("[A-HJ-NPR-Z0-9]{17}", 1..40),
    ) {
        let storage = MemStorage::new();
        let mut last_id = 0;

        for (n, vin) in vins.iter().enumerate() {
            let vehicle = storage.create_vehicle(new_vehicle(vin, n));
            prop_assert!(vehicle.id > last_id, "id {} not above {}", vehicle.id, last_id);
            last_id = vehicle.id;

            let found = storage.vehicle_by_vin(vin);
            prop_assert_eq!(found, Some(vehicle));
        }
    }

    /// Token ids stay unique even when the source keeps repeating itself
    #[test]
    fn prop_token_ids_unique(
        start in 0u64..1_000,
        step in 0u64..3,
        count in 1usize..60,
    ) {
        let storage = MemStorage::with_token_source(SequentialTokenIds::with_step(start, step));
        let mut seen = HashSet::new();

        for n in 0..count {
            let vehicle = storage.create_vehicle(new_vehicle(&format!("VIN{n:014}"), n));
            prop_assert!(seen.insert(vehicle.nft_id.clone()), "token {} reissued", vehicle.nft_id);
        }
    }

    /// Statistics match the formulas for any mix of statuses and verifications
    #[test]
    fn prop_statistics_formulas(
        statuses in prop::collection::vec(status_strategy(), 0..50),
        verifications in 0usize..30,
    ) {
        let storage = MemStorage::new();
        for (n, status) in statuses.iter().enumerate() {
            let vehicle = storage.create_vehicle(new_vehicle(&format!("VIN{n:014}"), n));
            storage.update_vehicle_status(vehicle.id, *status);
        }
        for n in 0..verifications {
            storage.create_verification(NewVerification {
                vehicle_id: (n % 3) as u64 + 1,
                verifier_address: None,
                result: VerificationResult::Verified,
            });
        }

        let stats = storage.statistics();
        let total = statuses.len() as u64;
        let active = statuses.iter().filter(|s| **s == VehicleStatus::Active).count() as u64;

        prop_assert_eq!(stats.total_vehicles, total);
        prop_assert_eq!(stats.verified_vehicles, active);
        prop_assert_eq!(stats.total_scans, verifications as u64 * 5);
        prop_assert_eq!(stats.active_users, (total as f64 * 0.7).floor() as u64);
    }

    /// Verifications come back per vehicle, in creation order
    #[test]
    fn prop_verifications_partitioned_by_vehicle(
        targets in prop::collection::vec(1u64..5, 0..40),
    ) {
        let storage = MemStorage::new();
        let created: Vec<_> = targets
            .iter()
            .map(|vehicle_id| {
                storage.create_verification(NewVerification {
                    vehicle_id: *vehicle_id,
                    verifier_address: Some("0xverifier".into()),
                    result: VerificationResult::Suspicious,
                })
            })
            .collect();

        for vehicle_id in 1u64..6 {
            let expected: Vec<_> = created
                .iter()
                .filter(|v| v.vehicle_id == vehicle_id)
                .cloned()
                .collect();
            prop_assert_eq!(storage.verifications_for_vehicle(vehicle_id), expected);
        }
    }
}
