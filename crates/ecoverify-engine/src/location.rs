//! Location scoring against the known-location registry
use crate::profile::VerificationThresholds;
use ecoverify_core::{GeoPoint, LocationResult, LocationSource, VerificationContext, VerifyError};
use ecoverify_image::Photo;
use ecoverify_registry::LocationRegistry;
use std::sync::Arc;
use tracing::debug;

pub struct LocationScorer {
    registry: Arc<LocationRegistry>,
    max_distance_meters: f64,
    stale_after_secs: i64,
}

impl LocationScorer {
    pub fn new(registry: Arc<LocationRegistry>, thresholds: &VerificationThresholds) -> Self {
        Self {
            registry,
            max_distance_meters: thresholds.max_distance_meters,
            stale_after_secs: thresholds.stale_after_secs,
        }
    }

    /// Score the submission coordinate against the registry. An embedded
    /// photo coordinate wins over the claimed one.
    pub fn score(
        &self,
        claimed: Option<GeoPoint>,
        claimed_timestamp: Option<i64>,
        photo: &Photo,
        ctx: &VerificationContext,
    ) -> Result<LocationResult, VerifyError> {
        let (actual, source) = match (photo.gps, claimed) {
            (Some(point), _) => (point, LocationSource::FromImage),
            (None, Some(point)) => (point, LocationSource::FromUser),
            (None, None) => return Err(VerifyError::NoLocationData),
        };
        // an embedded coordinate may carry corrupt values; check it too
        actual.validate()?;

        let (nearest, distance) = self
            .registry
            .nearest(actual)
            .ok_or_else(|| VerifyError::Registry("no known locations loaded".to_string()))?;

        let score = if distance <= self.max_distance_meters {
            1.0
        } else {
            // linear decay reaching zero at 10x the threshold
            (1.0 - distance / (self.max_distance_meters * 10.0)).max(0.0)
        };
        debug!(
            nearest = %nearest.name,
            distance_m = distance,
            score,
            source = ?source,
            "location scored"
        );

        Ok(LocationResult {
            score,
            distance_meters: distance,
            nearest_location: Some(nearest.clone()),
            source,
            timestamp_valid: self.timestamp_fresh(claimed_timestamp, ctx),
        })
    }

    /// A timestamp is fresh when absent or no older than the staleness window
    fn timestamp_fresh(&self, timestamp: Option<i64>, ctx: &VerificationContext) -> bool {
        match timestamp {
            None => true,
            Some(t) => ctx.current_time().timestamp() - t <= self.stale_after_secs,
        }
    }
}
