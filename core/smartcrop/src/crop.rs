use image::RgbaImage;

/// Crop rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Crop {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the pixel `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Maps the rectangle from a canvas scaled by `factor` back to source
    /// coordinates, truncating so the result never grows past the source.
    pub(crate) fn unscale(&self, factor: f64) -> Crop {
        let chop = |v: u32| (v as f64 / factor).trunc() as u32;
        Crop {
            x: chop(self.x),
            y: chop(self.y),
            width: chop(self.width),
            height: chop(self.height),
        }
    }
}

/// Score breakdown of a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Score {
    pub detail: f64,
    pub saturation: f64,
    pub skin: f64,
    /// Weighted, area-normalized combination of the other three fields.
    pub total: f64,
}

/// Result of a successful analysis.
#[derive(Debug, Clone)]
pub struct BestCrop {
    /// Winning rectangle in source image coordinates.
    pub crop: Crop,
    /// Score of the winning rectangle, measured on the prescaled canvas.
    pub score: Score,
    /// Final heat canvas (R = skin/face, G = detail, B = saturation), only
    /// retained when debug mode is enabled.
    pub heat: Option<RgbaImage>,
}

/// Positional attention model: how much a pixel at a given position should
/// count toward a candidate.
///
/// Pixels outside the candidate always weigh `outside_importance`. Inside,
/// the weight falls off radially from the center, drops sharply within
/// `edge_radius` of the border, and optionally peaks along the thirds lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportanceField {
    pub edge_radius: f64,
    pub edge_weight: f64,
    pub outside_importance: f64,
    pub rule_of_thirds: bool,
}

impl ImportanceField {
    pub fn importance(&self, crop: &Crop, x: u32, y: u32) -> f64 {
        if !crop.contains(x, y) {
            return self.outside_importance;
        }

        let xf = (x - crop.x) as f64 / crop.width as f64;
        let yf = (y - crop.y) as f64 / crop.height as f64;

        let px = (0.5 - xf).abs() * 2.0;
        let py = (0.5 - yf).abs() * 2.0;

        let dx = (px - 1.0 + self.edge_radius).max(0.0);
        let dy = (py - 1.0 + self.edge_radius).max(0.0);
        let d = (dx * dx + dy * dy) * self.edge_weight;

        let mut s = 1.41 - (px * px + py * py).sqrt();
        if self.rule_of_thirds {
            s += (s + d + 0.5).max(0.0) * 1.2 * (thirds(px) + thirds(py));
        }

        s + d
    }
}

/// Triangular bump peaking where `x` sits on a thirds line of the mirrored
/// `[0, 1]` coordinate.
pub(crate) fn thirds(x: f64) -> f64 {
    let x = (((x - 1.0 / 3.0 + 1.0) % 2.0) * 0.5 - 0.5) * 16.0;
    (1.0 - x * x).max(0.0)
}
