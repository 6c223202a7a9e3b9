//! Challenge-specific rule evaluation
//!
//! Rules are a closed registry keyed by challenge kind. Each rule returns an
//! updated copy of the classification; pixel-analysis failures surface as a
//! degradation reason instead of being swallowed.

use crate::profile::VerificationThresholds;
use chrono::{Datelike, NaiveDate};
use ecoverify_core::precision::ser_round4;
use ecoverify_core::{ClassificationResult, VerificationContext};
use ecoverify_image::{pink_ratio, Photo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Minimum blossom-pink fraction the cherry rule accepts
const MIN_PINK_RATIO: f64 = 0.08;
/// Confidence boost when the submission falls inside the seasonal window
const SEASONAL_BOOST: f64 = 0.15;
/// Weight applied to the pink ratio when boosting confidence
const PINK_BOOST_WEIGHT: f64 = 0.5;

/// Challenge categories with a total dispatch order.
///
/// Parsing checks the more specific token first: a label mentioning both
/// cherry blossoms and recycling resolves to `CherryBlossom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    CherryBlossom,
    Recycling,
    Unknown,
}

impl ChallengeKind {
    pub fn parse(label: &str) -> Self {
        let normalized = label.to_ascii_lowercase();
        if normalized.contains("cherry_blossom") {
            ChallengeKind::CherryBlossom
        } else if normalized.contains("recycling") {
            ChallengeKind::Recycling
        } else {
            ChallengeKind::Unknown
        }
    }
}

/// Findings a rule surfaces alongside the updated classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleFindings {
    CherryBlossom {
        #[serde(serialize_with = "ser_round4")]
        pink_pixel_ratio: f64,
        seasonal_valid: bool,
    },
    Recycling {
        min_confidence: f64,
    },
}

/// Outcome of applying a challenge rule: an updated copy of the
/// classification, optional findings, and the degradation reason when pixel
/// analysis failed
#[derive(Debug, Clone)]
pub struct RuleEvaluation {
    pub classification: ClassificationResult,
    pub findings: Option<RuleFindings>,
    pub degraded: Option<String>,
}

impl RuleEvaluation {
    fn passthrough(classification: ClassificationResult) -> Self {
        Self {
            classification,
            findings: None,
            degraded: None,
        }
    }
}

/// A challenge-specific visual test
pub trait ChallengeRule: Send + Sync {
    /// Stable rule id (e.g. "challenge.recycling.v1")
    fn id(&self) -> &'static str;

    fn evaluate(
        &self,
        classification: &ClassificationResult,
        photo: &Photo,
        ctx: &VerificationContext,
    ) -> RuleEvaluation;
}

/// Cherry-blossom challenge: pink-pixel ratio plus the seasonal window
pub struct CherryBlossomRule;

impl CherryBlossomRule {
    /// March 20 through April 15, inclusive; month/day only
    fn in_season(date: NaiveDate) -> bool {
        let (month, day) = (date.month(), date.day());
        (month == 3 && day >= 20) || (month == 4 && day <= 15)
    }
}

impl ChallengeRule for CherryBlossomRule {
    fn id(&self) -> &'static str {
        "challenge.cherry_blossom.v1"
    }

    fn evaluate(
        &self,
        classification: &ClassificationResult,
        photo: &Photo,
        ctx: &VerificationContext,
    ) -> RuleEvaluation {
        let ratio = match pink_ratio(&photo.pixels) {
            Ok(ratio) => ratio,
            Err(e) => {
                warn!(rule = self.id(), error = %e, "pixel analysis failed, passing classification through");
                return RuleEvaluation {
                    classification: classification.clone(),
                    findings: None,
                    degraded: Some(e.to_string()),
                };
            }
        };
        let seasonal = Self::in_season(ctx.current_time().date_naive());

        let mut updated = classification.clone();
        updated.is_valid = seasonal && ratio > MIN_PINK_RATIO;
        // boosts are additive, independently capped, and never reduce confidence
        if seasonal {
            updated.confidence = (updated.confidence + SEASONAL_BOOST).min(1.0);
        }
        if ratio > MIN_PINK_RATIO {
            updated.confidence = (updated.confidence + ratio * PINK_BOOST_WEIGHT).min(1.0);
        }

        RuleEvaluation {
            classification: updated,
            findings: Some(RuleFindings::CherryBlossom {
                pink_pixel_ratio: ratio,
                seasonal_valid: seasonal,
            }),
            degraded: None,
        }
    }
}

/// Recycling challenge: the classifier must name the recycling class with
/// enough confidence
pub struct RecyclingRule {
    pub min_confidence: f64,
}

impl ChallengeRule for RecyclingRule {
    fn id(&self) -> &'static str {
        "challenge.recycling.v1"
    }

    fn evaluate(
        &self,
        classification: &ClassificationResult,
        _photo: &Photo,
        _ctx: &VerificationContext,
    ) -> RuleEvaluation {
        let mut updated = classification.clone();
        updated.is_valid = classification.predicted_class == "valid_recycling"
            && classification.confidence > self.min_confidence;
        RuleEvaluation {
            classification: updated,
            findings: Some(RuleFindings::Recycling {
                min_confidence: self.min_confidence,
            }),
            degraded: None,
        }
    }
}

/// Unknown challenge types pass the classification through unchanged
struct NoOpRule;

impl ChallengeRule for NoOpRule {
    fn id(&self) -> &'static str {
        "challenge.noop.v1"
    }

    fn evaluate(
        &self,
        classification: &ClassificationResult,
        _photo: &Photo,
        _ctx: &VerificationContext,
    ) -> RuleEvaluation {
        RuleEvaluation::passthrough(classification.clone())
    }
}

/// Closed rule registry keyed by challenge kind, with an explicit no-op
/// fallback for unrecognized types
pub struct RuleRegistry {
    rules: BTreeMap<ChallengeKind, Box<dyn ChallengeRule>>,
    fallback: Box<dyn ChallengeRule>,
}

impl RuleRegistry {
    pub fn builtin(thresholds: &VerificationThresholds) -> Self {
        let mut rules: BTreeMap<ChallengeKind, Box<dyn ChallengeRule>> = BTreeMap::new();
        rules.insert(ChallengeKind::CherryBlossom, Box::new(CherryBlossomRule));
        rules.insert(
            ChallengeKind::Recycling,
            Box::new(RecyclingRule {
                min_confidence: thresholds.min_confidence,
            }),
        );
        Self {
            rules,
            fallback: Box::new(NoOpRule),
        }
    }

    pub fn apply(
        &self,
        challenge_type: &str,
        classification: &ClassificationResult,
        photo: &Photo,
        ctx: &VerificationContext,
    ) -> RuleEvaluation {
        let kind = ChallengeKind::parse(challenge_type);
        let rule = self.rules.get(&kind).unwrap_or(&self.fallback);
        debug!(rule = rule.id(), challenge = challenge_type, "applying challenge rule");
        rule.evaluate(classification, photo, ctx)
    }
}
