//! VinLedger Core - vehicle registry with simulated NFT titles
//!
//! This crate holds the registry behind the VinLedger API: vehicles,
//! the authorities that police them, and the verification events recorded
//! when a vehicle is checked.
//!
//! # Features
//!
//! - Thread-safe in-memory store with monotonic per-kind identifiers
//! - Secondary-index lookups by VIN, plates, NFT token id and authority code
//! - Derived registry statistics
//! - Simulated NFT token ids with collision redraw
//! - QR payload and verification URL helpers
//!
//! # Example
//!
//! ```
//! use vinledger_core::{MemStorage, NewVehicle, RegistryStorage, VehicleStatus};
//!
//! let storage = MemStorage::new();
//! let vehicle = storage
//!     .register_vehicle(NewVehicle {
//!         vin: "1HGBH41JXMN109186".into(),
//!         model: "Toyota Corolla 2023".into(),
//!         year: 2023,
//!         color: "Blanco".into(),
//!         plates: "ABC-123-XYZ".into(),
//!         owner: "Juan Pérez García".into(),
//!         wallet_address: None,
//!     })
//!     .unwrap();
//!
//! assert_eq!(vehicle.qr_code, "qr_1HGBH41JXMN109186");
//! assert_eq!(vehicle.status, VehicleStatus::Active);
//! assert_eq!(storage.vehicle_by_vin("1HGBH41JXMN109186"), Some(vehicle));
//! ```

pub mod error;
pub mod model;
pub mod qr;
pub mod stats;
pub mod storage;
pub mod token;

// Re-export main types for convenience
pub use error::{RegistryError, Result};
pub use model::{
    AccessLevel, Authority, NewAuthority, NewVehicle, NewVerification, Vehicle, VehicleStatus,
    Verification, VerificationResult,
};
pub use qr::{
    is_valid_vin, parse_qr_data, qr_image_url, qr_reference, vehicle_id_from_url,
    verification_url, QrPayload, ScannedCode, DEFAULT_QR_SIZE,
};
pub use stats::Statistics;
pub use storage::{MemStorage, RegistryStorage};
pub use token::{RandomTokenIds, SequentialTokenIds, TokenIdSource, TOKEN_ID_RANGE};
