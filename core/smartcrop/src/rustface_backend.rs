use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Result, SmartCropError};
use crate::face_detector::{FaceBounds, FaceDetector};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model is read once on construction; every call to
/// [`FaceDetector::detect`] builds a fresh detector from it, so one instance can
/// serve concurrent analyses.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load a SeetaFace model from disk.
    ///
    /// Fails with [`SmartCropError::DetectorUnavailable`] when the file is
    /// missing or is not a readable model.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SmartCropError::DetectorUnavailable(format!(
                "face model not found at {}",
                path.display()
            )));
        }

        let file = File::open(path).map_err(|e| {
            SmartCropError::DetectorUnavailable(format!(
                "failed to open face model {}: {e}",
                path.display()
            ))
        })?;
        let model = rustface::read_model(BufReader::new(file)).map_err(|e| {
            SmartCropError::DetectorUnavailable(format!(
                "failed to load face model {}: {e}",
                path.display()
            ))
        })?;

        Ok(Self { model })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Result<Vec<FaceBounds>> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBounds {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    confidence: face.score(),
                }
            })
            .collect())
    }
}
