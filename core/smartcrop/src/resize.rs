use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Image resampling used when prescaling the source before analysis.
///
/// The default analyzer uses [`FilterResizer`]; supply another implementation
/// through [`crate::Analyzer::resizer`] to plug in a faster or GPU-backed
/// scaler.
pub trait Resizer: Send + Sync {
    /// Resample `image` to exactly `width` × `height`.
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage;
}

/// [`Resizer`] backed by `image::imageops::resize`.
#[derive(Debug, Clone, Copy)]
pub struct FilterResizer {
    pub filter: FilterType,
}

impl FilterResizer {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for FilterResizer {
    fn default() -> Self {
        Self::new(FilterType::CatmullRom)
    }
}

impl Resizer for FilterResizer {
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        if image.dimensions() == (width, height) {
            return image.clone();
        }
        imageops::resize(image, width, height, self.filter)
    }
}
