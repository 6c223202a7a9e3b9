//! Data Model: coordinates, registry records, and the per-signal results
//! fused into a `VerificationResult`
use crate::error::VerifyError;
use crate::precision::{ser_round4, ser_round4_map};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// A WGS84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Degree-range check; NaN fails both range tests
    pub fn validate(&self) -> Result<(), VerifyError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(VerifyError::Validation(format!(
                "latitude {} outside -90..90",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(VerifyError::Validation(format!(
                "longitude {} outside -180..180",
                self.lon
            )));
        }
        Ok(())
    }
}

/// An entry in the known-location registry. Immutable reference data,
/// loaded once at process start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcoLocation {
    pub name: String,
    pub coordinates: GeoPoint,
    pub radius_meters: f64,
    pub challenge_types: BTreeSet<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl EcoLocation {
    pub fn supports_challenge(&self, challenge_type: &str) -> bool {
        self.challenge_types.contains(challenge_type)
    }
}

/// Output of the image classifier, later updated by the challenge rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub predicted_class: String,
    #[serde(serialize_with = "ser_round4")]
    pub confidence: f64,
    #[serde(serialize_with = "ser_round4_map")]
    pub per_class_scores: BTreeMap<String, f64>,
    pub is_valid: bool,
}

impl ClassificationResult {
    /// Least-trusting stand-in when the classification sub-check fails
    pub fn degraded() -> Self {
        Self {
            predicted_class: "unknown".to_string(),
            confidence: 0.0,
            per_class_scores: BTreeMap::new(),
            is_valid: false,
        }
    }
}

/// Which coordinate the location scorer trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationSource {
    FromImage,
    FromUser,
}

/// Output of the location scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResult {
    #[serde(serialize_with = "ser_round4")]
    pub score: f64,
    #[serde(serialize_with = "ser_round4")]
    pub distance_meters: f64,
    /// `None` only on the degraded path
    pub nearest_location: Option<EcoLocation>,
    pub source: LocationSource,
    pub timestamp_valid: bool,
}

impl LocationResult {
    /// Least-trusting stand-in when the location sub-check fails
    pub fn degraded() -> Self {
        Self {
            score: 0.0,
            distance_meters: 0.0,
            nearest_location: None,
            source: LocationSource::FromUser,
            timestamp_valid: false,
        }
    }
}

/// Manipulation heuristics recorded alongside the fraud score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManipulationFlags {
    /// Source carried an alpha channel
    pub has_transparency: bool,
    /// Transparency chunk present in the container metadata
    pub has_transparency_chunk: bool,
    pub has_thumbnail: bool,
    #[serde(default)]
    pub editing_software: Option<String>,
    #[serde(serialize_with = "ser_round4")]
    pub edge_variance: f64,
    pub is_edited: bool,
}

/// Output of the fraud scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudResult {
    #[serde(serialize_with = "ser_round4")]
    pub fraud_score: f64,
    pub image_hash: String,
    pub is_duplicate: bool,
    pub manipulation: ManipulationFlags,
}

impl FraudResult {
    /// Fail toward suspicion: medium risk when fraud analysis fails
    pub fn degraded() -> Self {
        Self {
            fraud_score: 0.5,
            image_hash: String::new(),
            is_duplicate: false,
            manipulation: ManipulationFlags::default(),
        }
    }
}

/// The fused, immutable outcome of one verification call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verification_id: Uuid,
    pub is_verified: bool,
    #[serde(serialize_with = "ser_round4")]
    pub overall_score: f64,
    pub classification: ClassificationResult,
    pub location: LocationResult,
    pub fraud: FraudResult,
    pub challenge_type: String,
    pub generated_at: DateTime<Utc>,
    /// blake3 digest of the photo pixel buffer
    pub content_digest: String,
    /// One-line explanation of the gate outcome
    pub summary: String,
    /// Sub-check failures, keyed by signal name
    #[serde(default)]
    pub signal_errors: BTreeMap<String, String>,
    /// Rule findings and other per-request annotations
    #[serde(default)]
    pub annotations: BTreeMap<String, Value>,
}
