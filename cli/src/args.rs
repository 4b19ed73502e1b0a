use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "smartcrop: content-aware image cropping",
    long_about = "Finds the most interesting region of an image for a target size, \
                  crops to it and optionally resizes the result."
)]
pub struct Cli {
    /// Image to analyze (PNG, JPEG or WebP)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the cropped image; `-` writes PNG to stdout
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Target width in pixels
    #[arg(long, default_value_t = 0)]
    pub width: u32,

    /// Target height in pixels
    #[arg(long, default_value_t = 0)]
    pub height: u32,

    /// Keep the crop at source resolution instead of resizing to the target
    #[arg(long)]
    pub no_resize: bool,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Enable face detection with the SeetaFace model at PATH
    #[arg(long, value_name = "PATH")]
    pub face_model: Option<PathBuf>,

    /// Log per-detector heat coverage
    #[arg(long)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Target size for the analyzer. With neither side given, the smaller
    /// image side is used for both.
    pub fn target(&self, image_width: u32, image_height: u32) -> (u32, u32) {
        if self.width == 0 && self.height == 0 {
            let side = image_width.min(image_height);
            (side, side)
        } else {
            (self.width, self.height)
        }
    }

    pub fn writes_to_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}

/// Final output size for a crop of `crop_width` × `crop_height`. A zero side
/// follows the crop's aspect ratio.
pub fn output_size(target: (u32, u32), crop_width: u32, crop_height: u32) -> (u32, u32) {
    let (w, h) = target;
    match (w, h) {
        (0, 0) => (crop_width, crop_height),
        (0, h) => (
            ((crop_width as u64 * h as u64) / crop_height.max(1) as u64).max(1) as u32,
            h,
        ),
        (w, 0) => (
            w,
            ((crop_height as u64 * w as u64) / crop_width.max(1) as u64).max(1) as u32,
        ),
        (w, h) => (w, h),
    }
}
