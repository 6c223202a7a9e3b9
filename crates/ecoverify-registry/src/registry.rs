//! Known-location registry
//!
//! An ordered, immutable sequence of eco-locations loaded once at startup.
//! Nearest-neighbor lookup keeps registry order as the tie-breaker.

use crate::geo::great_circle_distance_m;
use ecoverify_core::{EcoLocation, GeoPoint, VerifyError};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct LocationRegistry {
    locations: Vec<EcoLocation>,
}

impl LocationRegistry {
    /// Validate and wrap an ordered location list
    pub fn new(locations: Vec<EcoLocation>) -> Result<Self, VerifyError> {
        for loc in &locations {
            loc.coordinates.validate()?;
            if loc.radius_meters <= 0.0 {
                return Err(VerifyError::Registry(format!(
                    "location '{}' has non-positive radius",
                    loc.name
                )));
            }
        }
        Ok(Self { locations })
    }

    /// Seed registry with the reference eco-locations
    pub fn builtin() -> Self {
        let challenge_set = |types: &[&str]| -> BTreeSet<String> {
            types.iter().map(|t| t.to_string()).collect()
        };
        Self {
            locations: vec![
                EcoLocation {
                    name: "Tokyo Central Park Recycling Center".to_string(),
                    coordinates: GeoPoint::new(35.682839, 139.759455),
                    radius_meters: 50.0,
                    challenge_types: challenge_set(&["recycling", "waste_management"]),
                    description: Some(
                        "Central recycling point with proper waste separation".to_string(),
                    ),
                },
                EcoLocation {
                    name: "Kyoto Cherry Blossom Conservation Area".to_string(),
                    coordinates: GeoPoint::new(35.0116, 135.7681),
                    radius_meters: 200.0,
                    challenge_types: challenge_set(&["cherry_blossom", "nature_conservation"]),
                    description: Some("Protected area for cherry blossom trees".to_string()),
                },
                EcoLocation {
                    name: "Osaka Eco Station".to_string(),
                    coordinates: GeoPoint::new(34.6937, 135.5023),
                    radius_meters: 30.0,
                    challenge_types: challenge_set(&["recycling", "eco_education"]),
                    description: Some(
                        "Environmental education and recycling center".to_string(),
                    ),
                },
            ],
        }
    }

    /// Load a registry document (a YAML sequence of locations)
    pub fn from_yaml(doc: &str) -> Result<Self, VerifyError> {
        let locations: Vec<EcoLocation> =
            serde_yaml::from_str(doc).map_err(|e| VerifyError::Registry(e.to_string()))?;
        Self::new(locations)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EcoLocation> {
        self.locations.iter()
    }

    /// Nearest location by great-circle distance. The comparison is strict
    /// `<`, so the first minimum in registry order wins ties.
    pub fn nearest(&self, point: GeoPoint) -> Option<(&EcoLocation, f64)> {
        let mut best: Option<(&EcoLocation, f64)> = None;
        for loc in &self.locations {
            let distance = great_circle_distance_m(point, loc.coordinates);
            if best.as_ref().map_or(true, |(_, d)| distance < *d) {
                best = Some((loc, distance));
            }
        }
        best
    }

    /// Locations supporting a given challenge type
    pub fn by_challenge(&self, challenge_type: &str) -> Vec<&EcoLocation> {
        self.locations
            .iter()
            .filter(|loc| loc.supports_challenge(challenge_type))
            .collect()
    }
}
