//! Verification threshold profiles
//!
//! One document carrying every gate bar and tunable the engine consults.

use ecoverify_core::VerifyError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationThresholds {
    /// Profile name (e.g. "strict@1.0")
    pub name: String,

    // === Classification ===
    /// Minimum classifier confidence the recycling rule accepts
    pub min_confidence: f64,

    // === Location ===
    /// Distance at which the location score is still a full 1.0
    pub max_distance_meters: f64,

    /// Gate bar for the location score
    pub min_location_score: f64,

    /// Claimed timestamps older than this are surfaced as stale
    pub stale_after_secs: i64,

    // === Fraud ===
    /// Gate bar for the fraud score
    pub max_fraud_score: f64,

    /// Score assigned to edited-but-not-duplicate submissions
    pub edited_fraud_score: f64,

    /// Edge-filter variance above which a photo counts as edited.
    /// Empirically chosen; tunable, not load-bearing.
    pub edge_variance_threshold: f64,

    // === Fusion weights ===
    pub classification_weight: f64,
    pub location_weight: f64,
    pub fraud_weight: f64,

    /// Multiplier applied to the location component when the claimed
    /// timestamp is stale
    pub stale_timestamp_damping: f64,
}

impl VerificationThresholds {
    pub fn strict() -> Self {
        Self {
            name: "strict@1.0".to_string(),
            min_confidence: 0.7,
            max_distance_meters: 100.0,
            min_location_score: 0.5,
            stale_after_secs: 86_400,
            max_fraud_score: 0.5,
            edited_fraud_score: 0.5,
            edge_variance_threshold: 500.0,
            classification_weight: 0.40,
            location_weight: 0.35,
            fraud_weight: 0.25,
            stale_timestamp_damping: 0.75,
        }
    }

    pub fn lenient() -> Self {
        Self {
            name: "lenient@1.0".to_string(),
            min_confidence: 0.6,
            max_distance_meters: 250.0,
            min_location_score: 0.3,
            max_fraud_score: 0.6,
            ..Self::strict()
        }
    }

    /// Load a profile from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, VerifyError> {
        serde_yaml::from_str(yaml).map_err(|e| VerifyError::Validation(e.to_string()))
    }

    /// Weighted mean of the three sub-scores with fraud inverted, normalized
    /// by the weight sum and clamped to [0,1]. Monotonic non-decreasing in
    /// confidence and location score, non-increasing in fraud score.
    pub fn composite(&self, confidence: f64, location_score: f64, fraud_score: f64) -> f64 {
        let total = self.classification_weight + self.location_weight + self.fraud_weight;
        if total <= 0.0 {
            return 0.0;
        }
        let weighted = self.classification_weight * confidence
            + self.location_weight * location_score
            + self.fraud_weight * (1.0 - fraud_score);
        (weighted / total).clamp(0.0, 1.0)
    }
}

impl Default for VerificationThresholds {
    fn default() -> Self {
        Self::strict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_values() {
        let profile = VerificationThresholds::strict();
        assert_eq!(profile.min_confidence, 0.7);
        assert_eq!(profile.max_distance_meters, 100.0);
        assert_eq!(profile.max_fraud_score, 0.5);
    }

    #[test]
    fn test_lenient_relaxes_gates() {
        let profile = VerificationThresholds::lenient();
        assert!(profile.min_confidence < VerificationThresholds::strict().min_confidence);
        assert!(profile.max_fraud_score > VerificationThresholds::strict().max_fraud_score);
    }

    #[test]
    fn test_composite_bounds() {
        let profile = VerificationThresholds::strict();
        assert_eq!(profile.composite(1.0, 1.0, 0.0), 1.0);
        assert_eq!(profile.composite(0.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_composite_monotonicity() {
        let profile = VerificationThresholds::strict();
        let base = profile.composite(0.5, 0.5, 0.5);
        assert!(profile.composite(0.6, 0.5, 0.5) >= base);
        assert!(profile.composite(0.5, 0.6, 0.5) >= base);
        assert!(profile.composite(0.5, 0.5, 0.4) >= base);
    }

    #[test]
    fn test_from_yaml_round_trip() {
        let profile = VerificationThresholds::strict();
        let yaml = serde_yaml::to_string(&profile).unwrap();
        let parsed = VerificationThresholds::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.name, profile.name);
        assert_eq!(parsed.fraud_weight, profile.fraud_weight);
    }
}
