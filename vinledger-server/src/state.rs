//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use vinledger_core::{MemStorage, RegistryStorage};

use crate::config::Config;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Registry store shared by every handler
    pub storage: Arc<dyn RegistryStorage>,
    /// Base URL for QR verification links (falls back to the Host header)
    pub public_base_url: Option<String>,
}

impl AppState {
    /// Create state around an existing store
    pub fn new(storage: Arc<dyn RegistryStorage>) -> Self {
        Self {
            storage,
            public_base_url: None,
        }
    }

    /// Create state with a fresh in-memory store, seeded per configuration
    pub fn from_config(config: &Config) -> Self {
        let storage = if config.seed_sample_data {
            MemStorage::with_sample_data()
        } else {
            MemStorage::new()
        };

        Self {
            storage: Arc::new(storage),
            public_base_url: config.public_base_url.clone(),
        }
    }
}
