//! Verification Context: per-request state shared by the sub-checks
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct VerificationContext {
    pub trace_id: String,
    /// Pinned clock for reproducible runs; `None` means wall clock
    pub now: Option<DateTime<Utc>>,
    pub metadata: HashMap<String, Value>,
}

impl VerificationContext {
    pub fn new() -> Self {
        Self {
            trace_id: uuid::Uuid::new_v4().to_string(),
            now: None,
            metadata: HashMap::new(),
        }
    }

    /// Context with a pinned clock, used by seasonal and freshness checks
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Some(now),
            ..Self::new()
        }
    }

    pub fn current_time(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

impl Default for VerificationContext {
    fn default() -> Self {
        Self::new()
    }
}
