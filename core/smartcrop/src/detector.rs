use std::sync::Arc;

use image::RgbaImage;

use crate::color::{cie, saturation, skin_similarity};
use crate::config::CropConfig;
use crate::error::{Result, SmartCropError};
use crate::face_detector::{paint_faces, FaceDetector};
use crate::heat::{bounds, Channel, HeatCanvas};

/// One pass that turns the source image into heat on a single channel.
///
/// Detectors run one after another against the same canvas and must only
/// write their own [`Channel`]. `weight` and `bias` feed the scorer for that
/// channel.
pub trait Detector {
    fn name(&self) -> &str;

    /// Canvas channel this detector paints.
    fn channel(&self) -> Channel;

    fn weight(&self) -> f64;

    fn bias(&self) -> f64;

    /// Paint heat for `image` into `canvas`, which has the same dimensions.
    fn detect(&self, image: &RgbaImage, canvas: &mut HeatCanvas) -> Result<()>;
}

fn check_input(name: &str, image: &RgbaImage, canvas: &HeatCanvas) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(SmartCropError::DetectorInputInvalid(format!(
            "{name} detector received an empty image"
        )));
    }
    if image.dimensions() != (canvas.width(), canvas.height()) {
        return Err(SmartCropError::DetectorInputInvalid(format!(
            "{name} detector: image is {}x{} but canvas is {}x{}",
            image.width(),
            image.height(),
            canvas.width(),
            canvas.height()
        )));
    }
    Ok(())
}

/// Linear ramp from `threshold` (0) to 1.0 (255).
fn ramp(value: f64, threshold: f64) -> u8 {
    bounds((value - threshold) * (255.0 / (1.0 - threshold)))
}

/// Discrete Laplacian of the luma approximation; busy regions run hot.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    weight: f64,
}

impl EdgeDetector {
    pub fn new(config: &CropConfig) -> Self {
        Self {
            weight: config.detail_weight,
        }
    }
}

impl Detector for EdgeDetector {
    fn name(&self) -> &str {
        "edge"
    }

    fn channel(&self) -> Channel {
        Channel::Detail
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn bias(&self) -> f64 {
        0.0
    }

    fn detect(&self, image: &RgbaImage, canvas: &mut HeatCanvas) -> Result<()> {
        check_input(self.name(), image, canvas)?;

        let (w, h) = image.dimensions();
        let cies: Vec<f64> = image.pixels().map(cie).collect();
        let at = |x: u32, y: u32| cies[(y * w + x) as usize];

        for y in 0..h {
            for x in 0..w {
                let lightness = if x == 0 || x >= w - 1 || y == 0 || y >= h - 1 {
                    0.0
                } else {
                    at(x, y) * 4.0 - at(x, y - 1) - at(x - 1, y) - at(x + 1, y) - at(x, y + 1)
                };
                canvas.set(x, y, Channel::Detail, bounds(lightness));
            }
        }
        Ok(())
    }
}

/// Pixels whose color direction is close to a reference skin tone.
#[derive(Debug, Clone)]
pub struct SkinDetector {
    color: [f64; 3],
    threshold: f64,
    brightness_min: f64,
    brightness_max: f64,
    weight: f64,
    bias: f64,
}

impl SkinDetector {
    pub fn new(config: &CropConfig) -> Self {
        Self {
            color: config.skin_color,
            threshold: config.skin_threshold,
            brightness_min: config.skin_brightness_min,
            brightness_max: config.skin_brightness_max,
            weight: config.skin_weight,
            bias: config.skin_bias,
        }
    }
}

impl Detector for SkinDetector {
    fn name(&self) -> &str {
        "skin"
    }

    fn channel(&self) -> Channel {
        Channel::Skin
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn bias(&self) -> f64 {
        self.bias
    }

    fn detect(&self, image: &RgbaImage, canvas: &mut HeatCanvas) -> Result<()> {
        check_input(self.name(), image, canvas)?;

        for (x, y, pixel) in image.enumerate_pixels() {
            let lightness = cie(pixel) / 255.0;
            let skin = skin_similarity(pixel, &self.color);

            let heat = if skin > self.threshold
                && lightness >= self.brightness_min
                && lightness <= self.brightness_max
            {
                ramp(skin, self.threshold)
            } else {
                0
            };
            canvas.set(x, y, Channel::Skin, heat);
        }
        Ok(())
    }
}

/// Strongly saturated pixels within a lightness band.
#[derive(Debug, Clone)]
pub struct SaturationDetector {
    threshold: f64,
    brightness_min: f64,
    brightness_max: f64,
    weight: f64,
    bias: f64,
}

impl SaturationDetector {
    pub fn new(config: &CropConfig) -> Self {
        Self {
            threshold: config.saturation_threshold,
            brightness_min: config.saturation_brightness_min,
            brightness_max: config.saturation_brightness_max,
            weight: config.saturation_weight,
            bias: config.saturation_bias,
        }
    }
}

impl Detector for SaturationDetector {
    fn name(&self) -> &str {
        "saturation"
    }

    fn channel(&self) -> Channel {
        Channel::Saturation
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn bias(&self) -> f64 {
        self.bias
    }

    fn detect(&self, image: &RgbaImage, canvas: &mut HeatCanvas) -> Result<()> {
        check_input(self.name(), image, canvas)?;

        for (x, y, pixel) in image.enumerate_pixels() {
            let lightness = cie(pixel) / 255.0;
            let sat = saturation(pixel);

            let heat = if sat > self.threshold
                && lightness >= self.brightness_min
                && lightness <= self.brightness_max
            {
                ramp(sat, self.threshold)
            } else {
                0
            };
            canvas.set(x, y, Channel::Saturation, heat);
        }
        Ok(())
    }
}

/// Paints a solid disc over every face a [`FaceDetector`] backend reports.
/// Takes the red channel in place of [`SkinDetector`].
pub struct FaceHeatDetector {
    backend: Arc<dyn FaceDetector>,
    weight: f64,
    bias: f64,
}

impl FaceHeatDetector {
    pub fn new(backend: Arc<dyn FaceDetector>, config: &CropConfig) -> Self {
        Self {
            backend,
            weight: config.face_weight,
            bias: config.face_bias,
        }
    }
}

impl Detector for FaceHeatDetector {
    fn name(&self) -> &str {
        "face"
    }

    fn channel(&self) -> Channel {
        Channel::Skin
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn bias(&self) -> f64 {
        self.bias
    }

    fn detect(&self, image: &RgbaImage, canvas: &mut HeatCanvas) -> Result<()> {
        check_input(self.name(), image, canvas)?;

        let gray = image::imageops::grayscale(image);
        let faces = self
            .backend
            .detect(gray.as_raw(), gray.width(), gray.height())?;

        log::info!("faces detected: {}", faces.len());
        for face in &faces {
            log::debug!(
                "face: x: {:.0} y: {:.0} w: {:.0} h: {:.0} score: {:.2}",
                face.x,
                face.y,
                face.width,
                face.height,
                face.confidence
            );
        }

        canvas.clear(Channel::Skin);
        paint_faces(canvas, &faces);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face_detector::FaceBounds;
    use image::Rgba;

    fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([color[0], color[1], color[2], 255]))
    }

    fn run(detector: &dyn Detector, image: &RgbaImage) -> HeatCanvas {
        let mut canvas = HeatCanvas::new(image.width(), image.height());
        detector.detect(image, &mut canvas).unwrap();
        canvas
    }

    #[test]
    fn edge_flat_image_is_cold() {
        let config = CropConfig::default();
        let canvas = run(&EdgeDetector::new(&config), &solid(8, 8, [90, 90, 90]));
        assert_eq!(canvas.coverage(Channel::Detail), 0.0);
    }

    #[test]
    fn edge_bright_dot_is_hot_and_border_is_zero() {
        let config = CropConfig::default();
        let mut image = solid(5, 5, [0, 0, 0]);
        image.put_pixel(2, 2, Rgba([255, 255, 255, 255]));
        image.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        let canvas = run(&EdgeDetector::new(&config), &image);

        assert_eq!(canvas.get(2, 2, Channel::Detail), 255);
        // Neighbours of a bright dot have a negative Laplacian, clamped to 0.
        assert_eq!(canvas.get(1, 2, Channel::Detail), 0);
        assert_eq!(canvas.get(0, 0, Channel::Detail), 0);
    }

    #[test]
    fn skin_detector_marks_skin_tones_only() {
        let config = CropConfig::default();
        let detector = SkinDetector::new(&config);

        let skin = run(&detector, &solid(2, 2, [199, 145, 112]));
        assert!(skin.get(0, 0, Channel::Skin) > 0);

        let grass = run(&detector, &solid(2, 2, [40, 160, 40]));
        assert_eq!(grass.get(0, 0, Channel::Skin), 0);
    }

    #[test]
    fn skin_detector_respects_brightness_band() {
        let config = CropConfig::default();
        // Skin-coloured but too dark for the band.
        let dark = run(&SkinDetector::new(&config), &solid(2, 2, [20, 14, 11]));
        assert_eq!(dark.get(0, 0, Channel::Skin), 0);
    }

    #[test]
    fn saturation_detector_marks_vivid_colors() {
        let config = CropConfig::default();
        let detector = SaturationDetector::new(&config);

        let red = run(&detector, &solid(2, 2, [255, 0, 0]));
        assert_eq!(red.get(1, 1, Channel::Saturation), 255);

        let gray = run(&detector, &solid(2, 2, [128, 128, 128]));
        assert_eq!(gray.get(1, 1, Channel::Saturation), 0);
    }

    #[test]
    fn detectors_only_touch_their_channel() {
        let config = CropConfig::default();
        let image = solid(3, 3, [220, 20, 20]);
        let mut canvas = HeatCanvas::new(3, 3);
        canvas.set(1, 1, Channel::Skin, 77);
        canvas.set(1, 1, Channel::Detail, 66);
        SaturationDetector::new(&config)
            .detect(&image, &mut canvas)
            .unwrap();
        assert_eq!(canvas.get(1, 1, Channel::Skin), 77);
        assert_eq!(canvas.get(1, 1, Channel::Detail), 66);
    }

    #[test]
    fn empty_image_is_rejected() {
        let config = CropConfig::default();
        let image = RgbaImage::new(0, 0);
        let mut canvas = HeatCanvas::new(0, 0);
        let err = EdgeDetector::new(&config)
            .detect(&image, &mut canvas)
            .unwrap_err();
        assert!(matches!(err, SmartCropError::DetectorInputInvalid(_)));
    }

    #[test]
    fn mismatched_canvas_is_rejected() {
        let config = CropConfig::default();
        let image = solid(4, 4, [1, 2, 3]);
        let mut canvas = HeatCanvas::new(3, 4);
        assert!(SkinDetector::new(&config)
            .detect(&image, &mut canvas)
            .is_err());
    }

    struct FixedFaces(Vec<FaceBounds>);

    impl FaceDetector for FixedFaces {
        fn detect(&self, _gray: &[u8], _width: u32, _height: u32) -> Result<Vec<FaceBounds>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl FaceDetector for Broken {
        fn detect(&self, _gray: &[u8], _width: u32, _height: u32) -> Result<Vec<FaceBounds>> {
            Err(SmartCropError::DetectorUnavailable("no model".into()))
        }
    }

    #[test]
    fn face_detector_replaces_red_channel_with_discs() {
        let config = CropConfig::default();
        let backend = Arc::new(FixedFaces(vec![FaceBounds {
            x: 4.0,
            y: 4.0,
            width: 8.0,
            height: 8.0,
            confidence: 5.0,
        }]));
        let detector = FaceHeatDetector::new(backend, &config);
        assert_eq!(detector.name(), "face");
        assert_eq!(detector.weight(), 1.8);

        let image = solid(20, 20, [10, 10, 10]);
        let mut canvas = HeatCanvas::new(20, 20);
        canvas.set(0, 0, Channel::Skin, 99);
        detector.detect(&image, &mut canvas).unwrap();

        assert_eq!(canvas.get(8, 8, Channel::Skin), 255);
        assert_eq!(canvas.get(0, 0, Channel::Skin), 0);
    }

    #[test]
    fn face_backend_errors_propagate() {
        let config = CropConfig::default();
        let detector = FaceHeatDetector::new(Arc::new(Broken), &config);
        let image = solid(4, 4, [10, 10, 10]);
        let mut canvas = HeatCanvas::new(4, 4);
        let err = detector.detect(&image, &mut canvas).unwrap_err();
        assert!(matches!(err, SmartCropError::DetectorUnavailable(_)));
    }
}
