//! Perceptual hashing for duplicate detection
//!
//! Grayscale, downsample to a small square, threshold each pixel against the
//! mean, pack the bits into hex nibbles. Robust to minor re-encoding, not to
//! geometric transforms.

use crate::pixel::PixelGrid;
use std::fmt::Write;

/// Side length of the downsampled square; 16x16 gives a 64-hex-char hash
pub const DEFAULT_HASH_SIZE: u32 = 16;

pub fn perceptual_hash(pixels: &PixelGrid) -> String {
    perceptual_hash_sized(pixels, DEFAULT_HASH_SIZE)
}

pub fn perceptual_hash_sized(pixels: &PixelGrid, hash_size: u32) -> String {
    if pixels.is_empty() {
        return String::new();
    }
    let small = pixels.to_gray().downsample_mean(hash_size, hash_size);
    let mean = small.mean();

    let mut out = String::with_capacity(small.data().len() / 4 + 1);
    let mut nibble = 0u8;
    let mut filled = 0u8;
    for &p in small.data() {
        nibble = (nibble << 1) | u8::from(f64::from(p) > mean);
        filled += 1;
        if filled == 4 {
            let _ = write!(out, "{nibble:x}");
            nibble = 0;
            filled = 0;
        }
    }
    if filled > 0 {
        let _ = write!(out, "{nibble:x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelGrid {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 255 / (width + height - 2)) as u8;
                data.extend_from_slice(&[v, v, v]);
            }
        }
        PixelGrid::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn test_hash_is_deterministic() {
        let img = gradient(64, 64);
        assert_eq!(perceptual_hash(&img), perceptual_hash(&img));
    }

    #[test]
    fn test_hash_length() {
        let img = gradient(64, 64);
        // 16 * 16 bits packed four at a time
        assert_eq!(perceptual_hash(&img).len(), 64);
    }

    #[test]
    fn test_different_content_differs() {
        let a = gradient(64, 64);
        let b = PixelGrid::filled(64, 64, [200, 10, 10]);
        assert_ne!(perceptual_hash(&a), perceptual_hash(&b));
    }

    #[test]
    fn test_uniform_image_hashes_to_zeros() {
        // no pixel is strictly above the mean
        let flat = PixelGrid::filled(32, 32, [120, 120, 120]);
        let hash = perceptual_hash(&flat);
        assert!(hash.chars().all(|c| c == '0'));
    }
}
