//! Engine thresholds.

use serde::{Deserialize, Serialize};

/// Divergence trigger magnitudes, in index points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Absolute divergence that counts as a breach. Default: 50.0.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Minimum movement since the last notified divergence before a breach
    /// is re-notified; also the trend-move magnitude. Default: 10.0.
    #[serde(default = "default_threshold_changed")]
    pub threshold_changed: f64,
}

fn default_threshold() -> f64 {
    50.0
}

fn default_threshold_changed() -> f64 {
    10.0
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            threshold_changed: default_threshold_changed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let limits = AlertThresholds::default();
        assert_eq!(limits.threshold, 50.0);
        assert_eq!(limits.threshold_changed, 10.0);
    }
}
