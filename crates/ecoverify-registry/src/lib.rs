//! EcoVerify Registry: known eco-locations and geodesic distance
//!
//! Reference data for the location scorer. Loaded once, immutable for the
//! process lifetime.

pub mod geo;
pub mod registry;

pub use geo::great_circle_distance_m;
pub use registry::LocationRegistry;
