//! Fraud and duplicate detection
use crate::profile::VerificationThresholds;
use ecoverify_core::{FraudResult, ManipulationFlags, VerifyError};
use ecoverify_image::{edge_variance, perceptual_hash, Photo};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Fraud score when the submission duplicates a seen hash
pub const DUPLICATE_FRAUD_SCORE: f64 = 0.9;

/// Duplicate store seam. The membership check and the insert must be one
/// atomic step: two concurrent submissions of the same image must not both
/// report "not duplicate".
pub trait HashStore: Send + Sync {
    /// Returns true when the hash was already present; inserts it otherwise
    fn check_and_insert(&self, hash: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store backing the duplicate check. Grows monotonically for
/// the process lifetime; production deployments inject an externally backed
/// implementation instead.
#[derive(Debug, Default)]
pub struct InMemoryHashStore {
    seen: Mutex<HashSet<String>>,
}

impl InMemoryHashStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HashStore for InMemoryHashStore {
    fn check_and_insert(&self, hash: &str) -> bool {
        // a poisoned lock still holds a usable set
        let mut seen = match self.seen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if seen.contains(hash) {
            true
        } else {
            seen.insert(hash.to_string());
            false
        }
    }

    fn len(&self) -> usize {
        match self.seen.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

pub struct FraudScorer {
    store: Arc<dyn HashStore>,
    edited_fraud_score: f64,
    edge_variance_threshold: f64,
}

impl FraudScorer {
    pub fn new(store: Arc<dyn HashStore>, thresholds: &VerificationThresholds) -> Self {
        Self {
            store,
            edited_fraud_score: thresholds.edited_fraud_score,
            edge_variance_threshold: thresholds.edge_variance_threshold,
        }
    }

    /// Hash, duplicate-check, and run the manipulation heuristics. The
    /// caller degrades failures to `FraudResult::degraded()`.
    pub fn score(&self, photo: &Photo, user_id: Option<&str>) -> Result<FraudResult, VerifyError> {
        if photo.pixels.is_empty() {
            return Err(VerifyError::Analysis("empty pixel grid".to_string()));
        }
        let image_hash = perceptual_hash(&photo.pixels);
        let is_duplicate = self.store.check_and_insert(&image_hash);
        let edge_var = edge_variance(&photo.pixels)?;

        let manipulation = ManipulationFlags {
            has_transparency: photo.metadata.has_transparency,
            has_transparency_chunk: photo.metadata.has_transparency_chunk,
            has_thumbnail: photo.metadata.has_thumbnail,
            editing_software: photo.metadata.editing_software.clone(),
            edge_variance: edge_var,
            is_edited: edge_var > self.edge_variance_threshold,
        };

        // duplicate dominates; edited submissions get the configured score
        let fraud_score = if is_duplicate {
            DUPLICATE_FRAUD_SCORE
        } else if manipulation.is_edited {
            self.edited_fraud_score
        } else {
            0.0
        };
        debug!(
            user_id = user_id.unwrap_or("-"),
            hash = %image_hash,
            is_duplicate,
            fraud_score,
            "fraud scored"
        );

        Ok(FraudResult {
            fraud_score,
            image_hash,
            is_duplicate,
            manipulation,
        })
    }
}
