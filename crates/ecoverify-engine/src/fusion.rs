//! Verification Fusion Engine: combines the three signals into one gated,
//! explainable decision
use crate::classifier::ImageClassifier;
use crate::fraud::{FraudScorer, HashStore};
use crate::location::LocationScorer;
use crate::profile::VerificationThresholds;
use crate::request::VerificationRequest;
use crate::rules::RuleRegistry;
use ecoverify_core::{
    ClassificationResult, FraudResult, LocationResult, VerificationContext, VerificationResult,
    VerifyError,
};
use ecoverify_registry::LocationRegistry;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct VerificationEngine {
    classifier: ImageClassifier,
    rules: RuleRegistry,
    location: LocationScorer,
    fraud: FraudScorer,
    thresholds: VerificationThresholds,
}

impl VerificationEngine {
    pub fn new(
        classifier: ImageClassifier,
        registry: Arc<LocationRegistry>,
        store: Arc<dyn HashStore>,
        thresholds: VerificationThresholds,
    ) -> Self {
        info!(
            profile = %thresholds.name,
            locations = registry.len(),
            "verification engine initialized"
        );
        let rules = RuleRegistry::builtin(&thresholds);
        let location = LocationScorer::new(registry, &thresholds);
        let fraud = FraudScorer::new(store, &thresholds);
        Self {
            classifier,
            rules,
            location,
            fraud,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &VerificationThresholds {
        &self.thresholds
    }

    /// Run all sub-checks and fuse them. Structural validation failures are
    /// hard errors; sub-check failures degrade that signal and are recorded
    /// in the result instead of aborting.
    pub fn verify(
        &self,
        request: &VerificationRequest,
        ctx: &VerificationContext,
    ) -> Result<VerificationResult, VerifyError> {
        request.validate()?;

        let mut signal_errors: BTreeMap<String, String> = BTreeMap::new();
        let mut annotations: BTreeMap<String, Value> = BTreeMap::new();

        let classification = self.classification_signal(request, ctx, &mut signal_errors, &mut annotations);
        let location = self.location_signal(request, ctx, &mut signal_errors);
        let fraud = self.fraud_signal(request, &mut signal_errors);

        // stale timestamps are weighed into the composite, never gated on
        let location_component = if location.timestamp_valid {
            location.score
        } else {
            location.score * self.thresholds.stale_timestamp_damping
        };
        let overall_score =
            self.thresholds
                .composite(classification.confidence, location_component, fraud.fraud_score);

        let gates = [
            ("classification", classification.is_valid),
            ("location", location.score >= self.thresholds.min_location_score),
            ("fraud", fraud.fraud_score <= self.thresholds.max_fraud_score),
        ];
        let is_verified = gates.iter().all(|(_, passed)| *passed);
        let summary = if is_verified {
            "all checks passed".to_string()
        } else {
            let failed: Vec<&str> = gates
                .iter()
                .filter(|(_, passed)| !passed)
                .map(|(name, _)| *name)
                .collect();
            format!("rejected: {}", failed.join(", "))
        };
        debug!(
            trace_id = %ctx.trace_id,
            confidence = classification.confidence,
            location_score = location.score,
            fraud_score = fraud.fraud_score,
            overall_score,
            is_verified,
            "verification fused"
        );

        Ok(VerificationResult {
            verification_id: uuid::Uuid::new_v4(),
            is_verified,
            overall_score,
            classification,
            location,
            fraud,
            challenge_type: request.challenge_type.clone(),
            generated_at: ctx.current_time(),
            content_digest: format!("blake3:{}", blake3::hash(request.photo.pixels.raw())),
            summary,
            signal_errors,
            annotations,
        })
    }

    fn classification_signal(
        &self,
        request: &VerificationRequest,
        ctx: &VerificationContext,
        signal_errors: &mut BTreeMap<String, String>,
        annotations: &mut BTreeMap<String, Value>,
    ) -> ClassificationResult {
        match self.classifier.classify(&request.photo) {
            Ok(classified) => {
                let evaluation =
                    self.rules
                        .apply(&request.challenge_type, &classified, &request.photo, ctx);
                if let Some(reason) = evaluation.degraded {
                    signal_errors.insert("challenge_rule".to_string(), reason);
                }
                if let Some(findings) = evaluation.findings {
                    if let Ok(value) = serde_json::to_value(&findings) {
                        annotations.insert("rule_findings".to_string(), value);
                    }
                }
                evaluation.classification
            }
            Err(e) => {
                warn!(trace_id = %ctx.trace_id, error = %e, "classification degraded");
                signal_errors.insert("classification".to_string(), e.to_string());
                ClassificationResult::degraded()
            }
        }
    }

    fn location_signal(
        &self,
        request: &VerificationRequest,
        ctx: &VerificationContext,
        signal_errors: &mut BTreeMap<String, String>,
    ) -> LocationResult {
        match self.location.score(
            request.claimed_location,
            request.claimed_timestamp,
            &request.photo,
            ctx,
        ) {
            Ok(result) => result,
            Err(e) => {
                warn!(trace_id = %ctx.trace_id, error = %e, "location degraded");
                signal_errors.insert("location".to_string(), e.to_string());
                LocationResult::degraded()
            }
        }
    }

    fn fraud_signal(
        &self,
        request: &VerificationRequest,
        signal_errors: &mut BTreeMap<String, String>,
    ) -> FraudResult {
        match self.fraud.score(&request.photo, request.user_id.as_deref()) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "fraud analysis degraded, failing toward suspicion");
                signal_errors.insert("fraud".to_string(), e.to_string());
                FraudResult::degraded()
            }
        }
    }
}
