use image::{Rgba, RgbaImage};

/// Heat channel reserved for one detector role on the shared canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red: skin tone or face presence.
    Skin,
    /// Green: edges and fine detail.
    Detail,
    /// Blue: saturated color.
    Saturation,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Channel::Skin => 0,
            Channel::Detail => 1,
            Channel::Saturation => 2,
        }
    }
}

/// Working buffer the detectors paint into.
///
/// Each detector owns one channel, so passes are independent and the canvas is
/// handed to them one at a time by exclusive reference. Alpha stays opaque so
/// the buffer can be inspected as an ordinary image.
#[derive(Debug, Clone)]
pub struct HeatCanvas {
    pixels: RgbaImage,
}

impl HeatCanvas {
    /// Creates a zeroed canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Heat of one channel at `(x, y)`.
    pub fn get(&self, x: u32, y: u32, channel: Channel) -> u8 {
        self.pixels.get_pixel(x, y).0[channel.index()]
    }

    /// `[skin, detail, saturation]` heat at `(x, y)`.
    pub fn heat(&self, x: u32, y: u32) -> [u8; 3] {
        let [r, g, b, _] = self.pixels.get_pixel(x, y).0;
        [r, g, b]
    }

    pub fn set(&mut self, x: u32, y: u32, channel: Channel, value: u8) {
        self.pixels.get_pixel_mut(x, y).0[channel.index()] = value;
    }

    /// Resets one channel to zero, leaving the others untouched.
    pub fn clear(&mut self, channel: Channel) {
        let index = channel.index();
        for pixel in self.pixels.pixels_mut() {
            pixel.0[index] = 0;
        }
    }

    /// Fraction of pixels with non-zero heat in `channel`.
    pub fn coverage(&self, channel: Channel) -> f64 {
        let total = self.pixels.width() as u64 * self.pixels.height() as u64;
        if total == 0 {
            return 0.0;
        }
        let index = channel.index();
        let hot = self.pixels.pixels().filter(|p| p.0[index] > 0).count();
        hot as f64 / total as f64
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

/// Clamps a heat value into the channel range.
pub(crate) fn bounds(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
