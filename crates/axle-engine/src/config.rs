//! # Engine Configuration
//!
//! Tunables for the retail engine.
//!
//! ## Configuration Sources
//! The engine takes a plain config value; loading it (file, environment,
//! per-store table) is the host layer's concern. Fields carry serde
//! defaults so a partial config deserializes cleanly:
//!
//! ```json
//! { "over_receipt_tolerance_bps": 500 }
//! ```

use serde::{Deserialize, Serialize};

use axle_core::DEFAULT_OVER_RECEIPT_TOLERANCE_BPS;

// =============================================================================
// Engine Config
// =============================================================================

/// Runtime configuration for the engine services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How far above the ordered quantity a receipt may go, in basis
    /// points. 1000 bps = 10%: ordered 100 allows up to 110 received.
    ///
    /// The business origin of the 10% default is unrecorded, so it is a
    /// configurable threshold rather than a hardcoded rule.
    #[serde(default = "default_over_receipt_tolerance_bps")]
    pub over_receipt_tolerance_bps: u32,
}

fn default_over_receipt_tolerance_bps() -> u32 {
    DEFAULT_OVER_RECEIPT_TOLERANCE_BPS
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            over_receipt_tolerance_bps: DEFAULT_OVER_RECEIPT_TOLERANCE_BPS,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
