//! Content-aware cropping: find the most interesting region of an image for a
//! target aspect ratio.
//!
//! Detectors paint a heat canvas (edges, skin tones or faces, saturated
//! color), a grid of candidate rectangles is scored against it with a
//! positional importance model, and the best candidate is mapped back to
//! source coordinates.
//!
//! # Example
//!
//! ```no_run
//! use smartcrop::Analyzer;
//!
//! let img = image::open("photo.jpg").unwrap();
//! let best = Analyzer::new().find_best_crop(&img, 100, 100).unwrap();
//! let c = best.crop;
//! let cropped = img.crop_imm(c.x, c.y, c.width, c.height);
//! cropped.save("thumb.png").unwrap();
//! ```

mod analyzer;
mod candidates;
/// Color measures shared by the detectors.
pub mod color;
mod config;
mod crop;
/// Heat detectors and the trait they implement.
pub mod detector;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
mod heat;
mod resize;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
mod score;

/// Analyzer entry points.
pub use analyzer::{smart_crop, Analyzer};
/// Candidate enumeration.
pub use candidates::Candidates;
/// Tunables and collaborator settings.
pub use config::{CropConfig, CropSettings};
/// Rectangles, scores and the positional importance model.
pub use crop::{BestCrop, Crop, ImportanceField, Score};
pub use detector::{
    Detector, EdgeDetector, FaceHeatDetector, SaturationDetector, SkinDetector,
};
/// Error type returned by smartcrop operations.
pub use error::{Result, SmartCropError};
/// Face detection trait and face bounding-box type.
pub use face_detector::{FaceBounds, FaceDetector};
pub use heat::{Channel, HeatCanvas};
pub use resize::{FilterResizer, Resizer};
#[cfg(feature = "rustface")]
/// Built-in detector that loads a SeetaFace model from disk.
pub use rustface_backend::RustfaceDetector;
pub use score::{score, ChannelWeights};
