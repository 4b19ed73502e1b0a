use crate::error::Result;
use crate::heat::{Channel, HeatCanvas};

/// Bounding box of a detected face within an image.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score.
    pub confidence: f64,
}

/// Pluggable face detection backend.
///
/// Implement this trait to feed faces from any engine (ONNX, dlib, a remote
/// service) into the analyzer via [`crate::Analyzer::face_detector`]. The
/// analyzer only needs the boxes; it paints them into the heat canvas itself.
///
/// A backend that cannot run (missing model, failed load) should return
/// [`crate::SmartCropError::DetectorUnavailable`]. The analyzer treats any error
/// as fatal for the call.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Result<Vec<FaceBounds>>;
}

/// Paints a solid disc of full heat for each face, centered on the box with a
/// radius of half the box width.
pub(crate) fn paint_faces(canvas: &mut HeatCanvas, faces: &[FaceBounds]) {
    for face in faces {
        let width = face.width as i64;
        let height = face.height as i64;
        let cx = face.x as i64 + width / 2;
        let cy = face.y as i64 + height / 2;
        fill_circle(canvas, cx, cy, width / 2);
    }
}

/// Midpoint circle fill, clipped to the canvas.
fn fill_circle(canvas: &mut HeatCanvas, x0: i64, y0: i64, r: i64) {
    let mut x = r - 1;
    let mut y = 0;
    let mut dx = 1;
    let mut dy = 1;
    let mut err = dx - (r << 1);

    while x >= y {
        for i in -x..=x {
            put(canvas, x0 + i, y0 + y);
            put(canvas, x0 + i, y0 - y);
            put(canvas, x0 + y, y0 + i);
            put(canvas, x0 - y, y0 + i);
        }

        if err <= 0 {
            y += 1;
            err += dy;
            dy += 2;
        } else {
            x -= 1;
            dx += 2;
            err += dx - (r << 1);
        }
    }
}

fn put(canvas: &mut HeatCanvas, x: i64, y: i64) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    canvas.set(x as u32, y as u32, Channel::Skin, 255);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(x: f64, y: f64, width: f64, height: f64) -> FaceBounds {
        FaceBounds {
            x,
            y,
            width,
            height,
            confidence: 1.0,
        }
    }

    #[test]
    fn disc_is_solid_around_center() {
        let mut canvas = HeatCanvas::new(40, 40);
        paint_faces(&mut canvas, &[face(10.0, 10.0, 20.0, 20.0)]);

        assert_eq!(canvas.get(20, 20, Channel::Skin), 255);
        for (x, y) in [(15, 20), (25, 20), (20, 15), (20, 25), (17, 17), (23, 23)] {
            assert_eq!(canvas.get(x, y, Channel::Skin), 255, "({x}, {y})");
        }
        // Corners of the box lie outside the disc.
        assert_eq!(canvas.get(10, 10, Channel::Skin), 0);
        assert_eq!(canvas.get(29, 29, Channel::Skin), 0);
        // Other channels stay cold.
        assert_eq!(canvas.get(20, 20, Channel::Detail), 0);
    }

    #[test]
    fn disc_is_clipped_at_canvas_edges() {
        let mut canvas = HeatCanvas::new(10, 10);
        paint_faces(&mut canvas, &[face(-6.0, -6.0, 12.0, 12.0)]);
        assert_eq!(canvas.get(0, 0, Channel::Skin), 255);
        assert_eq!(canvas.get(9, 9, Channel::Skin), 0);
    }

    #[test]
    fn zero_sized_face_paints_nothing() {
        let mut canvas = HeatCanvas::new(10, 10);
        paint_faces(&mut canvas, &[face(5.0, 5.0, 0.0, 0.0)]);
        assert_eq!(canvas.coverage(Channel::Skin), 0.0);
    }
}
