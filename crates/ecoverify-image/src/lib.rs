//! EcoVerify Image: decoded-photo model and pixel heuristics
//!
//! The decode collaborator hands the pipeline an owned RGB grid; everything
//! here works on that grid: perceptual hashing, pink-ratio and edge
//! analysis, and the aspect-fit resample feeding the classifier.

pub mod analysis;
pub mod gps;
pub mod phash;
pub mod photo;
pub mod pixel;

pub use analysis::{edge_variance, pink_ratio};
pub use gps::{dms_to_decimal, point_from_dms, signed_degrees};
pub use phash::{perceptual_hash, perceptual_hash_sized, DEFAULT_HASH_SIZE};
pub use photo::{Photo, PhotoDecoder, PhotoFormat, PhotoMetadata};
pub use pixel::{GrayGrid, PixelGrid};
