//! Color measures used by the detectors.
//!
//! These are the approximations the heuristic has always used, not
//! colorimetrically correct conversions: the luma weights are swapped between
//! red and blue and no gamma is applied.

use image::Rgba;

/// Approximate luma in `[0, 255]`.
pub fn cie(pixel: &Rgba<u8>) -> f64 {
    let [r, g, b, _] = pixel.0;
    0.5126 * b as f64 + 0.7152 * g as f64 + 0.0722 * r as f64
}

/// HSL saturation in `[0, 1]`.
pub fn saturation(pixel: &Rgba<u8>) -> f64 {
    let [r, g, b, _] = pixel.0;
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);

    let maximum = r.max(g).max(b);
    let minimum = r.min(g).min(b);
    if maximum == minimum {
        return 0.0;
    }

    let l = (maximum + minimum) / 2.0;
    let d = maximum - minimum;
    if l > 0.5 {
        d / (2.0 - maximum - minimum)
    } else {
        d / (maximum + minimum)
    }
}

/// Similarity of the pixel's color direction to `skin`, as one minus the
/// Euclidean distance between the normalized vectors. Black has no direction
/// and scores 0.
pub fn skin_similarity(pixel: &Rgba<u8>, skin: &[f64; 3]) -> f64 {
    let [r, g, b, _] = pixel.0;
    let (r, g, b) = (r as f64, g as f64, b as f64);

    let mag = (r * r + g * g + b * b).sqrt();
    if mag == 0.0 {
        return 0.0;
    }

    let rd = r / mag - skin[0];
    let gd = g / mag - skin[1];
    let bd = b / mag - skin[2];
    1.0 - (rd * rd + gd * gd + bd * bd).sqrt()
}
