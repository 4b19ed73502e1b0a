use crate::crop::Crop;

/// Absorbs float drift from stepping the scale ladder.
const SCALE_EPSILON: f64 = 1e-9;

/// Lazy enumeration of candidate rectangles over a canvas.
///
/// Candidates come out scale-descending, then row by row (`y` ascending), then
/// left to right (`x` ascending). The order is part of the contract: the
/// analyzer keeps the first of equally scored candidates. Clone the iterator,
/// or build a new one, to restart the enumeration.
#[derive(Debug, Clone)]
pub struct Candidates {
    width: u32,
    height: u32,
    crop_width: f64,
    crop_height: f64,
    step: u32,
    scale_step: f64,
    min_scale: f64,
    max_scale: f64,
    scale_index: u32,
    x: u32,
    y: u32,
}

impl Candidates {
    /// Candidates for a `width` × `height` canvas.
    ///
    /// A `crop_width` or `crop_height` of 0 falls back to the smaller canvas
    /// dimension.
    pub fn new(width: u32, height: u32, crop_width: f64, crop_height: f64) -> Self {
        let min_dimension = width.min(height) as f64;
        let or_min = |v: f64| if v > 0.0 { v } else { min_dimension };

        Self {
            width,
            height,
            crop_width: or_min(crop_width),
            crop_height: or_min(crop_height),
            step: 8,
            scale_step: 0.1,
            min_scale: 0.9,
            max_scale: 1.0,
            scale_index: 0,
            x: 0,
            y: 0,
        }
    }

    /// Sets the position grid stride. Must be non-zero.
    pub fn step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    /// Sets the scale ladder. `scale_step` must be positive.
    pub fn scales(mut self, min_scale: f64, max_scale: f64, scale_step: f64) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self.scale_step = scale_step;
        self
    }

    fn scale(&self) -> Option<f64> {
        let scale = self.max_scale - self.scale_index as f64 * self.scale_step;
        (scale + SCALE_EPSILON >= self.min_scale).then_some(scale)
    }
}

impl Iterator for Candidates {
    type Item = Crop;

    fn next(&mut self) -> Option<Crop> {
        loop {
            let scale = self.scale()?;
            let w = (self.crop_width * scale + SCALE_EPSILON) as u32;
            let h = (self.crop_height * scale + SCALE_EPSILON) as u32;

            if self.y as u64 + h as u64 > self.height as u64 {
                self.scale_index += 1;
                self.x = 0;
                self.y = 0;
                continue;
            }

            if self.x as u64 + w as u64 > self.width as u64 {
                self.x = 0;
                self.y += self.step;
                continue;
            }

            let crop = Crop::new(self.x, self.y, w, h);
            self.x += self.step;
            if w > 0 && h > 0 {
                return Some(crop);
            }
        }
    }
}
