//! Point-in-time registry statistics.
//!
//! `totalScans` and `activeUsers` are estimates derived from stored counts;
//! nothing tracks scans or users directly.

use serde::{Deserialize, Serialize};

use crate::model::{Vehicle, VehicleStatus};

/// Scans counted per recorded verification.
pub const SCANS_PER_VERIFICATION: u64 = 5;

/// Share of registered vehicles counted as active users.
pub const ACTIVE_USER_RATIO: f64 = 0.7;

/// Summary counts for the landing page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of registered vehicles
    #[cfg_attr(feature = "openapi", schema(example = 3))]
    pub total_vehicles: u64,
    /// Vehicles whose status is `active`
    #[cfg_attr(feature = "openapi", schema(example = 2))]
    pub verified_vehicles: u64,
    /// Verification count times five
    #[cfg_attr(feature = "openapi", schema(example = 20))]
    pub total_scans: u64,
    /// floor(total vehicles * 0.7)
    #[cfg_attr(feature = "openapi", schema(example = 2))]
    pub active_users: u64,
}

impl Statistics {
    /// Recompute every figure from the current vehicles and the number of
    /// stored verifications.
    pub fn compute<'a, I>(vehicles: I, verification_count: usize) -> Self
    where
        I: IntoIterator<Item = &'a Vehicle>,
    {
        let (total_vehicles, verified_vehicles) =
            vehicles
                .into_iter()
                .fold((0u64, 0u64), |(total, active), vehicle| {
                    let is_active = vehicle.status == VehicleStatus::Active;
                    (total + 1, active + u64::from(is_active))
                });

        Self {
            total_vehicles,
            verified_vehicles,
            total_scans: verification_count as u64 * SCANS_PER_VERIFICATION,
            active_users: estimate_active_users(total_vehicles),
        }
    }
}

/// `floor(total * 0.7)` evaluated in double precision. Some multiples of ten
/// land one below the exact product: 90 vehicles report 62, not 63.
pub fn estimate_active_users(total_vehicles: u64) -> u64 {
    (total_vehicles as f64 * ACTIVE_USER_RATIO).floor() as u64
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn vehicle(id: u64, status: VehicleStatus) -> Vehicle {
        Vehicle {
            id,
            vin: format!("VIN{id:014}"),
            model: "Test".into(),
            year: 2020,
            color: "Gris".into(),
            plates: format!("P-{id}"),
            owner: "Owner".into(),
            nft_id: id.to_string(),
            qr_code: format!("qr_VIN{id:014}"),
            status,
            registered_at: Utc::now(),
            wallet_address: None,
        }
    }

    #[test]
    fn test_empty_registry() {
        let vehicles: [Vehicle; 0] = [];
        let stats = Statistics::compute(&vehicles, 0);
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn test_three_vehicles_four_verifications() {
        let vehicles = [
            vehicle(1, VehicleStatus::Active),
            vehicle(2, VehicleStatus::Active),
            vehicle(3, VehicleStatus::Suspended),
        ];
        let stats = Statistics::compute(&vehicles, 4);
        assert_eq!(stats.total_vehicles, 3);
        assert_eq!(stats.verified_vehicles, 2);
        assert_eq!(stats.total_scans, 20);
        assert_eq!(stats.active_users, 2);
    }

    #[test]
    fn test_stolen_vehicles_are_not_verified() {
        let vehicles = [vehicle(1, VehicleStatus::Stolen)];
        let stats = Statistics::compute(&vehicles, 0);
        assert_eq!(stats.verified_vehicles, 0);
        assert_eq!(stats.active_users, 0);
    }

    #[test]
    fn test_active_user_estimate_rounds_down() {
        assert_eq!(estimate_active_users(0), 0);
        assert_eq!(estimate_active_users(1), 0);
        assert_eq!(estimate_active_users(2), 1);
        assert_eq!(estimate_active_users(10), 7);
        assert_eq!(estimate_active_users(99), 69);
        assert_eq!(estimate_active_users(90), 62);
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(Statistics {
            total_vehicles: 1,
            verified_vehicles: 1,
            total_scans: 0,
            active_users: 0,
        })
        .unwrap();
        assert_eq!(value["totalVehicles"], 1);
        assert_eq!(value["verifiedVehicles"], 1);
        assert_eq!(value["totalScans"], 0);
        assert_eq!(value["activeUsers"], 0);
    }
}
