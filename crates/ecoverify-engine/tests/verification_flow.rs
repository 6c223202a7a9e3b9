//! End-to-end verification scenarios through the fusion engine.
//!
//! These tests drive the full pipeline with a scripted model runtime and
//! synthetic photos, asserting the gating and monotonicity contracts rather
//! than any specific composite constant.

use chrono::{TimeZone, Utc};
use ecoverify_core::{GeoPoint, LocationSource, VerificationContext, VerifyError};
use ecoverify_engine::{
    ImageClassifier, InMemoryHashStore, LabelMap, ScriptedModelRuntime, TensorShape,
    VerificationEngine, VerificationRequest, VerificationThresholds, DUPLICATE_FRAUD_SCORE,
};
use ecoverify_image::{Photo, PhotoFormat, PixelGrid};
use ecoverify_registry::LocationRegistry;
use std::sync::Arc;

const TOKYO_RECYCLING: GeoPoint = GeoPoint {
    lat: 35.682839,
    lon: 139.759455,
};
const KYOTO_BLOSSOM: GeoPoint = GeoPoint {
    lat: 35.0116,
    lon: 135.7681,
};

fn labels() -> LabelMap {
    LabelMap::new(vec![
        "invalid_action".to_string(),
        "valid_recycling".to_string(),
        "valid_composting".to_string(),
        "valid_conservation".to_string(),
        "cherry_blossom_activity".to_string(),
    ])
    .unwrap()
}

fn engine_with(output: Vec<f32>) -> VerificationEngine {
    let runtime = ScriptedModelRuntime::new(TensorShape { height: 32, width: 32 }, output);
    let classifier = ImageClassifier::new(Box::new(runtime), labels()).unwrap();
    VerificationEngine::new(
        classifier,
        Arc::new(LocationRegistry::builtin()),
        Arc::new(InMemoryHashStore::new()),
        VerificationThresholds::strict(),
    )
}

fn solid_photo(rgb: [u8; 3]) -> Photo {
    Photo::new(PixelGrid::filled(64, 64, rgb), PhotoFormat::Jpeg)
}

fn april_first() -> VerificationContext {
    VerificationContext::at(Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap())
}

// =============================================================================
// Recycling flow
// =============================================================================

#[test]
fn test_recycling_submission_verifies() {
    ecoverify_engine::init_tracing();
    let engine = engine_with(vec![0.05, 0.85, 0.04, 0.03, 0.03]);
    let request = VerificationRequest::new(solid_photo([90, 120, 140]), "recycling")
        .with_claimed_location(TOKYO_RECYCLING)
        .with_user_id("user-1");

    let result = engine.verify(&request, &VerificationContext::new()).unwrap();

    assert!(result.is_verified);
    assert!(result.classification.is_valid);
    assert_eq!(result.classification.predicted_class, "valid_recycling");
    assert_eq!(result.location.score, 1.0);
    assert_eq!(result.location.source, LocationSource::FromUser);
    assert_eq!(result.fraud.fraud_score, 0.0);
    assert!(result.overall_score > 0.5);
    assert_eq!(result.summary, "all checks passed");
    assert!(result.signal_errors.is_empty());
    assert!(result.content_digest.starts_with("blake3:"));
}

#[test]
fn test_low_confidence_recycling_rejected() {
    let engine = engine_with(vec![0.20, 0.45, 0.15, 0.10, 0.10]);
    let request = VerificationRequest::new(solid_photo([90, 120, 140]), "recycling")
        .with_claimed_location(TOKYO_RECYCLING);

    let result = engine.verify(&request, &VerificationContext::new()).unwrap();

    assert!(!result.is_verified);
    assert!(!result.classification.is_valid);
    assert!(result.summary.contains("classification"));
}

// =============================================================================
// Duplicate detection flow
// =============================================================================

#[test]
fn test_duplicate_submission_rejected_on_second_call() {
    let engine = engine_with(vec![0.05, 0.85, 0.04, 0.03, 0.03]);
    let request = VerificationRequest::new(solid_photo([90, 120, 140]), "recycling")
        .with_claimed_location(TOKYO_RECYCLING);

    let first = engine.verify(&request, &VerificationContext::new()).unwrap();
    assert!(!first.fraud.is_duplicate);
    assert!(first.is_verified);

    let second = engine.verify(&request, &VerificationContext::new()).unwrap();
    assert!(second.fraud.is_duplicate);
    assert_eq!(second.fraud.fraud_score, DUPLICATE_FRAUD_SCORE);
    assert_eq!(second.fraud.image_hash, first.fraud.image_hash);
    // classification and location are unchanged, fraud alone flips the gate
    assert!(second.classification.is_valid);
    assert_eq!(second.location.score, 1.0);
    assert!(!second.is_verified);
    assert!(second.summary.contains("fraud"));
    // the fused score drops when fraud rises, everything else fixed
    assert!(second.overall_score < first.overall_score);
}

// =============================================================================
// Cherry blossom flow
// =============================================================================

#[test]
fn test_cherry_blossom_in_season_verifies() {
    let engine = engine_with(vec![0.05, 0.05, 0.05, 0.05, 0.80]);
    let request = VerificationRequest::new(solid_photo([230, 100, 160]), "cherry_blossom")
        .with_claimed_location(KYOTO_BLOSSOM);

    let ctx = april_first();
    let result = engine.verify(&request, &ctx).unwrap();

    assert!(result.is_verified);
    assert!(result.classification.is_valid);
    // boosts never reduce the classifier confidence
    assert!(result.classification.confidence >= 0.80);
    assert_eq!(result.generated_at, ctx.current_time());

    let findings = result.annotations.get("rule_findings").unwrap();
    assert_eq!(findings["rule"], "cherry_blossom");
    assert_eq!(findings["seasonal_valid"], true);
}

#[test]
fn test_cherry_blossom_white_photo_off_season_rejected() {
    let engine = engine_with(vec![0.05, 0.05, 0.05, 0.05, 0.80]);
    let request = VerificationRequest::new(solid_photo([255, 255, 255]), "cherry_blossom")
        .with_claimed_location(KYOTO_BLOSSOM);

    let ctx = VerificationContext::at(Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap());
    let result = engine.verify(&request, &ctx).unwrap();

    assert!(!result.is_verified);
    assert!(!result.classification.is_valid);
    assert!(result.summary.contains("classification"));
}

// =============================================================================
// Degradation and hard failures
// =============================================================================

#[test]
fn test_missing_location_degrades_instead_of_crashing() {
    let engine = engine_with(vec![0.05, 0.85, 0.04, 0.03, 0.03]);
    let request = VerificationRequest::new(solid_photo([90, 120, 140]), "recycling");

    let result = engine.verify(&request, &VerificationContext::new()).unwrap();

    assert!(!result.is_verified);
    assert_eq!(result.location.score, 0.0);
    assert!(result.location.nearest_location.is_none());
    assert!(result.signal_errors.contains_key("location"));
    assert!(result.signal_errors["location"].contains("NO_DATA"));
    // the other signals still ran
    assert!(result.classification.is_valid);
    assert_eq!(result.fraud.fraud_score, 0.0);
}

#[test]
fn test_invalid_coordinates_are_a_hard_failure() {
    let engine = engine_with(vec![0.05, 0.85, 0.04, 0.03, 0.03]);
    let request = VerificationRequest::new(solid_photo([90, 120, 140]), "recycling")
        .with_claimed_location(GeoPoint::new(123.0, 500.0));

    assert!(matches!(
        engine.verify(&request, &VerificationContext::new()),
        Err(VerifyError::Validation(_))
    ));
}

#[test]
fn test_embedded_gps_coordinate_preferred() {
    let engine = engine_with(vec![0.05, 0.85, 0.04, 0.03, 0.03]);
    let photo = solid_photo([90, 120, 140]).with_gps(GeoPoint::new(34.6937, 135.5023));
    let request = VerificationRequest::new(photo, "recycling")
        .with_claimed_location(TOKYO_RECYCLING);

    let result = engine.verify(&request, &VerificationContext::new()).unwrap();
    assert_eq!(result.location.source, LocationSource::FromImage);
    assert_eq!(
        result.location.nearest_location.unwrap().name,
        "Osaka Eco Station"
    );
}

// =============================================================================
// Composite score properties
// =============================================================================

#[test]
fn test_overall_score_monotonic_in_confidence() {
    let request = VerificationRequest::new(solid_photo([90, 120, 140]), "recycling")
        .with_claimed_location(TOKYO_RECYCLING);

    let low = engine_with(vec![0.10, 0.75, 0.05, 0.05, 0.05])
        .verify(&request, &VerificationContext::new())
        .unwrap();
    let high = engine_with(vec![0.02, 0.95, 0.01, 0.01, 0.01])
        .verify(&request, &VerificationContext::new())
        .unwrap();

    assert!(high.overall_score >= low.overall_score);
}

#[test]
fn test_stale_timestamp_weighed_not_gated() {
    let now = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();
    let ctx = VerificationContext::at(now);

    let fresh_request = VerificationRequest::new(solid_photo([90, 120, 140]), "recycling")
        .with_claimed_location(TOKYO_RECYCLING)
        .with_claimed_timestamp(now.timestamp() - 3_600);
    let stale_request = VerificationRequest::new(solid_photo([90, 120, 140]), "recycling")
        .with_claimed_location(TOKYO_RECYCLING)
        .with_claimed_timestamp(now.timestamp() - 200_000);

    let fresh = engine_with(vec![0.05, 0.85, 0.04, 0.03, 0.03])
        .verify(&fresh_request, &ctx)
        .unwrap();
    let stale = engine_with(vec![0.05, 0.85, 0.04, 0.03, 0.03])
        .verify(&stale_request, &ctx)
        .unwrap();

    assert!(fresh.location.timestamp_valid);
    assert!(!stale.location.timestamp_valid);
    // staleness is weighed into the composite but does not flip the gate
    assert!(stale.is_verified);
    assert!(stale.overall_score < fresh.overall_score);
}

// =============================================================================
// Serialization contract
// =============================================================================

#[test]
fn test_result_serializes_with_four_decimal_floats() {
    let engine = engine_with(vec![0.05, 0.85111119, 0.04, 0.03, 0.02888881]);
    let request = VerificationRequest::new(solid_photo([90, 120, 140]), "recycling")
        .with_claimed_location(TOKYO_RECYCLING);

    let result = engine.verify(&request, &VerificationContext::new()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    let confidence = json["classification"]["confidence"].as_f64().unwrap();
    assert_eq!(confidence, (confidence * 10_000.0).round() / 10_000.0);
    assert_eq!(json["location"]["source"], "FROM_USER");
    assert!(json["verification_id"].is_string());
    assert!(json["generated_at"].is_string());
}
