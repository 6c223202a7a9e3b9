//! EcoVerify Engine: multi-signal verification fusion
//!
//! Combines an on-device image classifier, challenge-specific visual rules,
//! geodesic location scoring, and perceptual-hash fraud detection into one
//! gated, explainable decision.
//!
//! # Architecture
//!
//! ```text
//! VerificationRequest
//!        │ validate (hard failure)
//!        ├── ImageClassifier ──► ChallengeRule ──► ClassificationResult
//!        ├── LocationScorer  ─────────────────► LocationResult
//!        ├── FraudScorer     ─────────────────► FraudResult
//!        ▼
//!  VerificationEngine: gate (all three bars) + weighted composite
//!        ▼
//!  VerificationResult (explanation trail, 4-decimal serialization)
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ecoverify_core::{GeoPoint, VerificationContext};
//! use ecoverify_image::{Photo, PhotoFormat, PixelGrid};
//! use ecoverify_registry::LocationRegistry;
//! use ecoverify_engine::{
//!     ImageClassifier, InMemoryHashStore, LabelMap, ScriptedModelRuntime, TensorShape,
//!     VerificationEngine, VerificationRequest, VerificationThresholds,
//! };
//!
//! let labels = LabelMap::new(vec![
//!     "invalid_action".to_string(),
//!     "valid_recycling".to_string(),
//!     "valid_composting".to_string(),
//!     "valid_conservation".to_string(),
//!     "cherry_blossom_activity".to_string(),
//! ]).unwrap();
//! let runtime = ScriptedModelRuntime::new(
//!     TensorShape { height: 224, width: 224 },
//!     vec![0.05, 0.85, 0.04, 0.03, 0.03],
//! );
//! let classifier = ImageClassifier::new(Box::new(runtime), labels).unwrap();
//!
//! let engine = VerificationEngine::new(
//!     classifier,
//!     Arc::new(LocationRegistry::builtin()),
//!     Arc::new(InMemoryHashStore::new()),
//!     VerificationThresholds::strict(),
//! );
//!
//! let photo = Photo::new(PixelGrid::filled(64, 64, [90, 120, 140]), PhotoFormat::Jpeg);
//! let request = VerificationRequest::new(photo, "recycling")
//!     .with_claimed_location(GeoPoint::new(35.682839, 139.759455));
//!
//! let result = engine.verify(&request, &VerificationContext::new()).unwrap();
//! assert!(result.is_verified);
//! ```

pub mod classifier;
pub mod fraud;
pub mod fusion;
pub mod location;
pub mod model;
pub mod profile;
pub mod request;
pub mod rules;
pub mod telemetry;

pub use classifier::ImageClassifier;
pub use fraud::{FraudScorer, HashStore, InMemoryHashStore, DUPLICATE_FRAUD_SCORE};
pub use fusion::VerificationEngine;
pub use location::LocationScorer;
pub use model::{LabelMap, ModelRuntime, ScriptedModelRuntime, TensorShape, CLASS_COUNT};
pub use profile::VerificationThresholds;
pub use request::VerificationRequest;
pub use rules::{ChallengeKind, ChallengeRule, RuleEvaluation, RuleFindings, RuleRegistry};
pub use telemetry::init_tracing;
