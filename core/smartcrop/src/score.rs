use crate::crop::{Crop, ImportanceField, Score};
use crate::detector::Detector;
use crate::heat::{Channel, HeatCanvas};

/// Weight and bias of every canvas channel, taken from the detectors that
/// painted it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelWeights {
    pub detail_weight: f64,
    pub skin_weight: f64,
    pub skin_bias: f64,
    pub saturation_weight: f64,
    pub saturation_bias: f64,
}

impl ChannelWeights {
    /// Collects weights from a detector registry. A channel no detector paints
    /// keeps zero weight; when two detectors share a channel the later one wins.
    pub fn from_detectors(detectors: &[Box<dyn Detector>]) -> Self {
        let mut weights = Self::default();
        for detector in detectors {
            match detector.channel() {
                Channel::Detail => weights.detail_weight = detector.weight(),
                Channel::Skin => {
                    weights.skin_weight = detector.weight();
                    weights.skin_bias = detector.bias();
                }
                Channel::Saturation => {
                    weights.saturation_weight = detector.weight();
                    weights.saturation_bias = detector.bias();
                }
            }
        }
        weights
    }
}

/// Scores one candidate against the heat canvas.
///
/// The canvas is sampled every `down_sample` pixels in both directions,
/// starting at the origin and stopping before a stride would run past the
/// edge. Each sample is weighted by its positional importance relative to
/// `crop`; the total is normalized by the crop area so that candidates of
/// different scales compare fairly.
pub fn score(
    crop: &Crop,
    canvas: &HeatCanvas,
    field: &ImportanceField,
    weights: &ChannelWeights,
    down_sample: u32,
) -> Score {
    let mut score = Score::default();
    let stride = down_sample.max(1);
    let (width, height) = (canvas.width(), canvas.height());

    for y in sample_positions(height, stride) {
        for x in sample_positions(width, stride) {
            let [r, g, b] = canvas.heat(x, y);
            let imp = field.importance(crop, x, y);
            let det = g as f64 / 255.0;

            score.skin += r as f64 / 255.0 * (det + weights.skin_bias) * imp;
            score.detail += det * imp;
            score.saturation += b as f64 / 255.0 * (det + weights.saturation_bias) * imp;
        }
    }

    score.total = (score.detail * weights.detail_weight
        + score.skin * weights.skin_weight
        + score.saturation * weights.saturation_weight)
        / crop.width as f64
        / crop.height as f64;

    score
}

fn sample_positions(extent: u32, stride: u32) -> impl Iterator<Item = u32> {
    (0..extent)
        .step_by(stride as usize)
        .take_while(move |&p| p as u64 + stride as u64 <= extent as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropConfig;
    use crate::detector::{EdgeDetector, SaturationDetector, SkinDetector};

    fn default_weights() -> ChannelWeights {
        let config = CropConfig::default();
        let detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(EdgeDetector::new(&config)),
            Box::new(SkinDetector::new(&config)),
            Box::new(SaturationDetector::new(&config)),
        ];
        ChannelWeights::from_detectors(&detectors)
    }

    fn field() -> ImportanceField {
        CropConfig::default().importance()
    }

    #[test]
    fn weights_come_from_detectors() {
        let weights = default_weights();
        assert_eq!(weights.detail_weight, 0.2);
        assert_eq!(weights.skin_weight, 1.8);
        assert_eq!(weights.skin_bias, 0.9);
        assert_eq!(weights.saturation_weight, 0.3);
        assert_eq!(weights.saturation_bias, 0.2);
    }

    #[test]
    fn cold_canvas_scores_zero() {
        let canvas = HeatCanvas::new(64, 64);
        let s = score(
            &Crop::new(0, 0, 64, 64),
            &canvas,
            &field(),
            &default_weights(),
            8,
        );
        assert_eq!(s, Score::default());
    }

    #[test]
    fn sampling_stops_before_the_edge() {
        assert_eq!(sample_positions(20, 8).collect::<Vec<_>>(), vec![0, 8]);
        assert_eq!(sample_positions(16, 8).collect::<Vec<_>>(), vec![0, 8]);
        assert_eq!(sample_positions(7, 8).count(), 0);
        assert_eq!(sample_positions(3, 1).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn hot_spot_inside_scores_higher_than_outside() {
        let mut canvas = HeatCanvas::new(64, 64);
        for y in 24..40 {
            for x in 24..40 {
                canvas.set(x, y, Channel::Detail, 255);
                canvas.set(x, y, Channel::Saturation, 255);
            }
        }
        let weights = default_weights();
        let over = score(&Crop::new(16, 16, 32, 32), &canvas, &field(), &weights, 4);
        let away = score(&Crop::new(32, 32, 32, 32), &canvas, &field(), &weights, 4);
        assert!(over.total > away.total, "{over:?} vs {away:?}");
        assert!(over.detail > 0.0);
    }

    #[test]
    fn total_is_area_normalized() {
        // Heat outside both candidates contributes -0.5 per sample regardless
        // of size, so the larger candidate's total is proportionally smaller.
        let mut canvas = HeatCanvas::new(32, 32);
        canvas.set(31, 31, Channel::Detail, 255);
        let weights = default_weights();
        let small = score(&Crop::new(0, 0, 10, 10), &canvas, &field(), &weights, 1);
        let large = score(&Crop::new(0, 0, 20, 20), &canvas, &field(), &weights, 1);
        assert_eq!(small.detail, large.detail);
        assert!((small.total - large.total * 4.0).abs() < 1e-12);
    }

    #[test]
    fn skin_needs_weight_to_count() {
        let mut canvas = HeatCanvas::new(16, 16);
        for y in 4..12 {
            for x in 4..12 {
                canvas.set(x, y, Channel::Skin, 255);
            }
        }
        let crop = Crop::new(0, 0, 16, 16);
        let weighted = score(&crop, &canvas, &field(), &default_weights(), 1);
        let unweighted = score(
            &crop,
            &canvas,
            &field(),
            &ChannelWeights {
                skin_weight: 0.0,
                ..default_weights()
            },
            1,
        );
        assert!(weighted.skin > 0.0);
        assert_eq!(weighted.skin, unweighted.skin);
        assert!(weighted.total > unweighted.total);
    }
}
