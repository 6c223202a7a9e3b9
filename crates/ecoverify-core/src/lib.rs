//! EcoVerify Core: data model, error taxonomy, and execution context
//!
//! Shared record types for the multi-signal verification pipeline. The
//! sub-check implementations live in `ecoverify-engine`; this crate only
//! carries the vocabulary they exchange.

pub mod context;
pub mod data_model;
pub mod error;
pub mod precision;

pub use context::VerificationContext;
pub use data_model::{
    ClassificationResult, EcoLocation, FraudResult, GeoPoint, LocationResult, LocationSource,
    ManipulationFlags, VerificationResult,
};
pub use error::VerifyError;
pub use precision::round4;

/// Version of the verification engine
pub const ECOVERIFY_VERSION: &str = "0.3.0";
