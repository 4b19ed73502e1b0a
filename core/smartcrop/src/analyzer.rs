use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use crate::candidates::Candidates;
use crate::config::{CropConfig, CropSettings};
use crate::crop::{BestCrop, Crop, Score};
use crate::detector::{Detector, EdgeDetector, FaceHeatDetector, SaturationDetector, SkinDetector};
use crate::error::{Result, SmartCropError};
use crate::face_detector::FaceDetector;
use crate::heat::HeatCanvas;
use crate::resize::{FilterResizer, Resizer};
use crate::score::{score, ChannelWeights};

/// Finds the most interesting crop of an image for a target aspect ratio.
///
/// An analyzer holds one immutable configuration and a set of collaborators.
/// Every call to [`Analyzer::find_best_crop`] allocates its own heat canvas, so
/// a single analyzer can be shared across threads.
///
/// ```no_run
/// use smartcrop::Analyzer;
///
/// let img = image::open("photo.jpg").unwrap();
/// let best = Analyzer::new()
///     .debug_mode(true)
///     .find_best_crop(&img, 250, 250)
///     .unwrap();
/// println!("{:?} scored {:.4}", best.crop, best.score.total);
/// ```
pub struct Analyzer {
    settings: CropSettings,
    config: CropConfig,
    /// Prescaling backend. When `None`, an image-crate filter matching
    /// `settings.interpolation` is used.
    resizer: Option<Box<dyn Resizer>>,
    /// User-provided face detector. When `None` and face detection is on, the
    /// built-in rustface backend is loaded from `settings.face_model_path`.
    face_detector: Option<Arc<dyn FaceDetector>>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Create an analyzer with default settings: skin detection, Catmull-Rom
    /// prescaling, default constants.
    pub fn new() -> Self {
        Self {
            settings: CropSettings::default(),
            config: CropConfig::default(),
            resizer: None,
            face_detector: None,
        }
    }

    /// Replace all collaborator settings at once.
    pub fn settings(mut self, settings: CropSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the scoring and search constants.
    pub fn config(mut self, config: CropConfig) -> Self {
        self.config = config;
        self
    }

    /// Use face detection instead of skin-tone detection for the red channel.
    pub fn face_detection(mut self, enable: bool) -> Self {
        self.settings.face_detection = enable;
        self
    }

    /// Set the model file read by the built-in face detector.
    pub fn face_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.face_model_path = path.into();
        self
    }

    /// Set the filter used by the default prescaler.
    pub fn interpolation(mut self, filter: FilterType) -> Self {
        self.settings.interpolation = filter;
        self
    }

    /// Keep the final heat canvas in the result and log per-detector coverage.
    pub fn debug_mode(mut self, enable: bool) -> Self {
        self.settings.debug_mode = enable;
        self
    }

    /// Provide a custom prescaler.
    pub fn resizer(mut self, resizer: Box<dyn Resizer>) -> Self {
        self.resizer = Some(resizer);
        self
    }

    /// Provide a custom face detector implementation.
    ///
    /// Only consulted when face detection is enabled. Setting one does not
    /// enable face detection on its own.
    pub fn face_detector(mut self, detector: Arc<dyn FaceDetector>) -> Self {
        self.face_detector = Some(detector);
        self
    }

    pub fn crop_settings(&self) -> &CropSettings {
        &self.settings
    }

    pub fn crop_config(&self) -> &CropConfig {
        &self.config
    }

    /// Find the best crop of `image` with the aspect ratio `width:height`.
    ///
    /// One of `width` or `height` may be 0; that side of the crop then falls
    /// back to the smaller image side. The returned rectangle is in source
    /// coordinates and never requires upscaling to reach the target size.
    pub fn find_best_crop(&self, image: &DynamicImage, width: u32, height: u32) -> Result<BestCrop> {
        if width == 0 && height == 0 {
            return Err(SmartCropError::InvalidTarget);
        }
        self.config.validate()?;

        let (image_width, image_height) = (image.width(), image.height());
        if image_width == 0 || image_height == 0 {
            return Err(SmartCropError::DetectorInputInvalid(format!(
                "cannot analyze a {image_width}x{image_height} image"
            )));
        }

        let detectors = self.detectors()?;

        let scale = (image_width as f64 / width as f64).min(image_height as f64 / height as f64);

        let mut prescale = 1.0;
        let canvas_image = if self.config.prescale {
            let f = self.config.prescale_min / image_width.min(image_height) as f64;
            if f < 1.0 {
                prescale = f;
            }
            let canvas_width = ((image_width as f64 * prescale) as u32).max(1);
            let canvas_height = ((image_height as f64 * prescale) as u32).max(1);
            log::debug!(
                "prescale factor {prescale:.4}: {image_width}x{image_height} -> {canvas_width}x{canvas_height}"
            );
            self.prescale(&image.to_rgba8(), canvas_width, canvas_height)
        } else {
            image.to_rgba8()
        };

        let crop_width = (width as f64 * scale * prescale).trunc();
        let crop_height = (height as f64 * scale * prescale).trunc();
        let min_scale = self
            .config
            .max_scale
            .min((1.0 / scale).max(self.config.min_scale));

        log::debug!(
            "source resolution: {image_width}x{image_height}, scale: {scale:.4}, crop: {crop_width}x{crop_height}, min scale: {min_scale:.4}"
        );

        let (best, heat) = self.analyse(&canvas_image, &detectors, crop_width, crop_height, min_scale)?;

        let crop = if prescale < 1.0 {
            best.0.unscale(prescale)
        } else {
            best.0
        };
        log::debug!("best crop {crop:?} total {:.6}", best.1.total);

        Ok(BestCrop {
            crop,
            score: best.1,
            heat,
        })
    }

    /// Detector registry for one call, in execution order.
    fn detectors(&self) -> Result<Vec<Box<dyn Detector>>> {
        let red: Box<dyn Detector> = if self.settings.face_detection {
            Box::new(FaceHeatDetector::new(self.face_backend()?, &self.config))
        } else {
            Box::new(SkinDetector::new(&self.config))
        };

        let detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(EdgeDetector::new(&self.config)),
            red,
            Box::new(SaturationDetector::new(&self.config)),
        ];
        Ok(detectors)
    }

    fn face_backend(&self) -> Result<Arc<dyn FaceDetector>> {
        match &self.face_detector {
            Some(detector) => Ok(Arc::clone(detector)),
            None => builtin_face_detector(&self.settings.face_model_path),
        }
    }

    fn prescale(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        match &self.resizer {
            Some(resizer) => resizer.resize(image, width, height),
            None => FilterResizer::new(self.settings.interpolation).resize(image, width, height),
        }
    }

    fn analyse(
        &self,
        image: &RgbaImage,
        detectors: &[Box<dyn Detector>],
        crop_width: f64,
        crop_height: f64,
        min_scale: f64,
    ) -> Result<((Crop, Score), Option<RgbaImage>)> {
        let mut canvas = HeatCanvas::new(image.width(), image.height());

        for detector in detectors {
            detector.detect(image, &mut canvas)?;
            if self.settings.debug_mode {
                log::info!(
                    "{} heat covers {:.1}% of the canvas",
                    detector.name(),
                    canvas.coverage(detector.channel()) * 100.0
                );
            }
        }

        let weights = ChannelWeights::from_detectors(detectors);
        let field = self.config.importance();
        let candidates = Candidates::new(canvas.width(), canvas.height(), crop_width, crop_height)
            .step(self.config.step)
            .scales(min_scale, self.config.max_scale, self.config.scale_step);

        let mut best: Option<(Crop, Score)> = None;
        let mut evaluated = 0usize;
        for crop in candidates {
            evaluated += 1;
            let s = score(&crop, &canvas, &field, &weights, self.config.score_down_sample);
            if best.map_or(true, |(_, top)| s.total > top.total) {
                best = Some((crop, s));
            }
        }
        log::debug!("scored {evaluated} candidates");

        let best = best.ok_or(SmartCropError::NoCandidates {
            width: canvas.width(),
            height: canvas.height(),
        })?;
        let heat = self.settings.debug_mode.then(|| canvas.into_image());
        Ok((best, heat))
    }
}

#[cfg(feature = "rustface")]
fn builtin_face_detector(model_path: &Path) -> Result<Arc<dyn FaceDetector>> {
    let detector = crate::rustface_backend::RustfaceDetector::from_path(model_path)?;
    Ok(Arc::new(detector))
}

#[cfg(not(feature = "rustface"))]
fn builtin_face_detector(model_path: &Path) -> Result<Arc<dyn FaceDetector>> {
    Err(SmartCropError::DetectorUnavailable(format!(
        "built without the rustface feature; cannot load {}",
        model_path.display()
    )))
}

/// Find the best crop with a default [`Analyzer`].
pub fn smart_crop(image: &DynamicImage, width: u32, height: u32) -> Result<BestCrop> {
    Analyzer::new().find_best_crop(image, width, height)
}
