use std::path::PathBuf;

use image::imageops::FilterType;

use crate::crop::ImportanceField;
use crate::error::{Result, SmartCropError};

/// Scoring and search tunables.
///
/// Every constant the heuristic depends on lives here so a single analyzer
/// carries one immutable set of weights for all of its calls. The defaults are
/// the long-standing smartcrop values.
#[derive(Clone, Debug, PartialEq)]
pub struct CropConfig {
    /// Weight of the edge/detail channel in the total score.
    pub detail_weight: f64,

    /// Reference skin tone as a normalized RGB direction.
    pub skin_color: [f64; 3],
    /// Added to the detail value before it multiplies the skin channel.
    pub skin_bias: f64,
    /// Lower bound of the lightness band in which skin is considered.
    pub skin_brightness_min: f64,
    /// Upper bound of the lightness band in which skin is considered.
    pub skin_brightness_max: f64,
    /// Minimum skin similarity (0-1) before a pixel produces heat.
    pub skin_threshold: f64,
    /// Weight of the skin channel in the total score.
    pub skin_weight: f64,

    /// Bias used for the red channel when it is painted by a face detector.
    pub face_bias: f64,
    /// Weight used for the red channel when it is painted by a face detector.
    pub face_weight: f64,

    /// Lower bound of the lightness band in which saturation is considered.
    pub saturation_brightness_min: f64,
    /// Upper bound of the lightness band in which saturation is considered.
    pub saturation_brightness_max: f64,
    /// Minimum HSL saturation (0-1) before a pixel produces heat.
    pub saturation_threshold: f64,
    /// Added to the detail value before it multiplies the saturation channel.
    pub saturation_bias: f64,
    /// Weight of the saturation channel in the total score.
    pub saturation_weight: f64,

    /// Stride (pixels) at which the heat canvas is sampled while scoring.
    pub score_down_sample: u32,
    /// Stride (pixels) of the candidate position grid.
    pub step: u32,
    /// Decrement between successive candidate scales.
    pub scale_step: f64,
    /// Smallest candidate scale, before the upscaling guard is applied.
    pub min_scale: f64,
    /// Largest candidate scale.
    pub max_scale: f64,

    /// Fraction of the half-extent near the border that is penalized.
    pub edge_radius: f64,
    /// Strength of the border penalty; negative values subtract.
    pub edge_weight: f64,
    /// Importance of any pixel outside the candidate.
    pub outside_importance: f64,
    /// Reward subjects placed near the thirds lines.
    pub rule_of_thirds: bool,

    /// Downscale large images before running the detectors.
    pub prescale: bool,
    /// Target length of the smaller image side after prescaling.
    pub prescale_min: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            detail_weight: 0.2,
            skin_color: [0.78, 0.57, 0.44],
            skin_bias: 0.9,
            skin_brightness_min: 0.2,
            skin_brightness_max: 1.0,
            skin_threshold: 0.8,
            skin_weight: 1.8,
            face_bias: 0.9,
            face_weight: 1.8,
            saturation_brightness_min: 0.05,
            saturation_brightness_max: 0.9,
            saturation_threshold: 0.4,
            saturation_bias: 0.2,
            saturation_weight: 0.3,
            score_down_sample: 8,
            // step * min_scale rounded down to the next power of two
            step: 8,
            scale_step: 0.1,
            min_scale: 0.9,
            max_scale: 1.0,
            edge_radius: 0.4,
            edge_weight: -20.0,
            outside_importance: -0.5,
            rule_of_thirds: true,
            prescale: true,
            prescale_min: 400.0,
        }
    }
}

impl CropConfig {
    /// Creates a configuration holding the default constant set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the edge penalty weight.
    pub fn set_edge_weight(mut self, edge_weight: f64) -> Self {
        self.edge_weight = edge_weight;
        self
    }

    /// Sets the fraction of the border that is penalized.
    pub fn set_edge_radius(mut self, edge_radius: f64) -> Self {
        self.edge_radius = edge_radius;
        self
    }

    /// Enables or disables the rule-of-thirds bonus.
    pub fn set_rule_of_thirds(mut self, enabled: bool) -> Self {
        self.rule_of_thirds = enabled;
        self
    }

    /// Sets the candidate grid stride.
    pub fn set_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    /// Sets the scoring sample stride.
    pub fn set_score_down_sample(mut self, stride: u32) -> Self {
        self.score_down_sample = stride;
        self
    }

    /// Sets the scale ladder: candidates shrink from `max` to `min` by `step`.
    pub fn set_scale_range(mut self, min: f64, max: f64, step: f64) -> Self {
        self.min_scale = min;
        self.max_scale = max;
        self.scale_step = step;
        self
    }

    /// Enables or disables prescaling and sets its target side length.
    pub fn set_prescale(mut self, enabled: bool, prescale_min: f64) -> Self {
        self.prescale = enabled;
        self.prescale_min = prescale_min;
        self
    }

    /// The positional weighting derived from this configuration.
    pub fn importance(&self) -> ImportanceField {
        ImportanceField {
            edge_radius: self.edge_radius,
            edge_weight: self.edge_weight,
            outside_importance: self.outside_importance,
            rule_of_thirds: self.rule_of_thirds,
        }
    }

    /// Rejects values that would make the search non-terminating or meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(SmartCropError::InvalidConfig("step must be > 0".into()));
        }
        if self.score_down_sample == 0 {
            return Err(SmartCropError::InvalidConfig(
                "score_down_sample must be > 0".into(),
            ));
        }
        if !(self.scale_step > 0.0) {
            return Err(SmartCropError::InvalidConfig(format!(
                "scale_step must be > 0, got {}",
                self.scale_step
            )));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(SmartCropError::InvalidConfig(format!(
                "scale range must satisfy 0 < min <= max, got {}..{}",
                self.min_scale, self.max_scale
            )));
        }
        if !(0.0..1.0).contains(&self.skin_threshold) {
            return Err(SmartCropError::InvalidConfig(format!(
                "skin_threshold must be in [0, 1), got {}",
                self.skin_threshold
            )));
        }
        if !(0.0..1.0).contains(&self.saturation_threshold) {
            return Err(SmartCropError::InvalidConfig(format!(
                "saturation_threshold must be in [0, 1), got {}",
                self.saturation_threshold
            )));
        }
        if self.prescale && !(self.prescale_min > 0.0) {
            return Err(SmartCropError::InvalidConfig(format!(
                "prescale_min must be > 0, got {}",
                self.prescale_min
            )));
        }
        Ok(())
    }
}

/// Per-analyzer options that select collaborators rather than tune the score.
#[derive(Clone, Debug)]
pub struct CropSettings {
    /// Replace the skin detector with face detection for the red channel.
    pub face_detection: bool,

    /// Path to the face classifier model used by the built-in backend.
    ///
    /// Ignored when a custom detector is supplied through
    /// [`crate::Analyzer::face_detector`].
    pub face_model_path: PathBuf,

    /// Filter used when prescaling the source image.
    pub interpolation: FilterType,

    /// Keep the final heat canvas in the result and log per-detector coverage.
    pub debug_mode: bool,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            face_detection: false,
            face_model_path: PathBuf::from("./model/seeta_fd_frontal_v1.0.bin"),
            interpolation: FilterType::CatmullRom,
            debug_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(CropConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_step_is_rejected() {
        let config = CropConfig::new().set_step(0);
        assert!(matches!(
            config.validate(),
            Err(SmartCropError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_sample_stride_is_rejected() {
        let config = CropConfig::new().set_score_down_sample(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_scale_range_is_rejected() {
        let config = CropConfig::new().set_scale_range(1.0, 0.5, 0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_scale_step_is_rejected() {
        let config = CropConfig::new().set_scale_range(0.5, 1.0, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn threshold_of_one_is_rejected() {
        let config = CropConfig {
            skin_threshold: 1.0,
            ..CropConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn importance_mirrors_config() {
        let config = CropConfig::new()
            .set_edge_weight(-5.0)
            .set_rule_of_thirds(false);
        let field = config.importance();
        assert_eq!(field.edge_weight, -5.0);
        assert!(!field.rule_of_thirds);
        assert_eq!(field.edge_radius, 0.4);
    }

    #[test]
    fn face_detection_is_off_by_default() {
        let settings = CropSettings::default();
        assert!(!settings.face_detection);
        assert!(!settings.debug_mode);
    }
}
