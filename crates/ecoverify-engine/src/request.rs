//! Verification request and its structural validation
use ecoverify_core::{GeoPoint, VerifyError};
use ecoverify_image::Photo;
use serde_json::Value;
use std::collections::BTreeMap;

/// One submission to verify: a decoded photo, the claimed coordinate, and
/// the challenge it is claimed to document
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub photo: Photo,
    pub claimed_location: Option<GeoPoint>,
    pub challenge_type: String,
    pub user_id: Option<String>,
    /// Epoch seconds of the claimed capture time
    pub claimed_timestamp: Option<i64>,
    pub metadata: BTreeMap<String, Value>,
}

impl VerificationRequest {
    pub fn new(photo: Photo, challenge_type: impl Into<String>) -> Self {
        Self {
            photo,
            claimed_location: None,
            challenge_type: challenge_type.into(),
            user_id: None,
            claimed_timestamp: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_claimed_location(mut self, point: GeoPoint) -> Self {
        self.claimed_location = Some(point);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_claimed_timestamp(mut self, epoch_secs: i64) -> Self {
        self.claimed_timestamp = Some(epoch_secs);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Structural checks run before any collaborator is invoked. Failures
    /// here are hard errors to the caller, never degraded signals.
    pub fn validate(&self) -> Result<(), VerifyError> {
        if self.photo.pixels.is_empty() {
            return Err(VerifyError::Validation("photo has no pixel data".to_string()));
        }
        if self.challenge_type.trim().is_empty() {
            return Err(VerifyError::Validation("challenge type must not be empty".to_string()));
        }
        if let Some(point) = self.claimed_location {
            point.validate()?;
        }
        Ok(())
    }
}
