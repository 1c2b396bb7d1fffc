//! Configuration for the Solana exact scheme facilitator.

use serde::{Deserialize, Serialize};

/// Configuration for the Solana exact facilitator.
///
/// Defaults match the production values; tests and operators can override
/// them through the scheme's JSON config block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaExactFacilitatorConfig {
    /// Maximum compute unit price in micro-lamports per compute unit.
    ///
    /// Bounds the priority fee a submitted transaction can make the
    /// facilitator pay. Default: 5,000,000 (5 lamports per compute unit).
    #[serde(default = "default_max_compute_unit_price")]
    pub max_compute_unit_price: u64,

    /// Clock-drift tolerance in seconds when checking payment deadlines.
    ///
    /// A deadline up to this many seconds in the past is still accepted.
    /// Default: 30.
    #[serde(default = "default_deadline_clock_drift_tolerance_secs")]
    pub deadline_clock_drift_tolerance_secs: u32,
}

const fn default_max_compute_unit_price() -> u64 {
    5_000_000
}

const fn default_deadline_clock_drift_tolerance_secs() -> u32 {
    30
}

impl Default for SolanaExactFacilitatorConfig {
    fn default() -> Self {
        Self {
            max_compute_unit_price: default_max_compute_unit_price(),
            deadline_clock_drift_tolerance_secs: default_deadline_clock_drift_tolerance_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_production_values() {
        let config = SolanaExactFacilitatorConfig::default();
        assert_eq!(config.max_compute_unit_price, 5_000_000);
        assert_eq!(config.deadline_clock_drift_tolerance_secs, 30);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: SolanaExactFacilitatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_compute_unit_price, 5_000_000);
    }

    #[test]
    fn test_partial_override() {
        let config: SolanaExactFacilitatorConfig =
            serde_json::from_str(r#"{"maxComputeUnitPrice": 1000}"#).unwrap();
        assert_eq!(config.max_compute_unit_price, 1000);
        assert_eq!(config.deadline_clock_drift_tolerance_secs, 30);
    }
}
