//! Pixel heuristics: blossom-pink ratio and edge-variance analysis
use crate::pixel::PixelGrid;
use ecoverify_core::VerifyError;

/// Fraction of pixels inside the blossom-pink band, tuned for JPEG output:
/// bright red, moderate green and blue, red clearly dominating green.
pub fn pink_ratio(pixels: &PixelGrid) -> Result<f64, VerifyError> {
    if pixels.is_empty() {
        return Err(VerifyError::Analysis("empty pixel grid".to_string()));
    }
    let hits = pixels
        .pixels()
        .filter(|&[r, g, b]| r > 180 && g > 80 && b > 120 && f32::from(r) > 1.3 * f32::from(g))
        .count();
    Ok(hits as f64 / pixels.pixel_count() as f64)
}

/// Variance of a 3x3 edge-filter response over the grayscale image.
///
/// The kernel is the classic FIND_EDGES stencil (8x center minus the eight
/// neighbors), applied to interior pixels only; images smaller than 3x3
/// have no interior and report zero variance.
pub fn edge_variance(pixels: &PixelGrid) -> Result<f64, VerifyError> {
    if pixels.is_empty() {
        return Err(VerifyError::Analysis("empty pixel grid".to_string()));
    }
    let gray = pixels.to_gray();
    let (w, h) = (gray.width(), gray.height());
    if w < 3 || h < 3 {
        return Ok(0.0);
    }

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0usize;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut acc = 8 * i32::from(gray.get(x, y));
            for dy in [-1i32, 0, 1] {
                for dx in [-1i32, 0, 1] {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    acc -= i32::from(gray.get((x as i32 + dx) as u32, (y as i32 + dy) as u32));
                }
            }
            let response = f64::from(acc.clamp(0, 255));
            sum += response;
            sum_sq += response * response;
            count += 1;
        }
    }

    let mean = sum / count as f64;
    Ok(sum_sq / count as f64 - mean * mean)
}
