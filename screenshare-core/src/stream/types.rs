//! Frame and monitor types exchanged with the capture collaborator.

use image::RgbImage;

use crate::error::ShareError;
use crate::state::Point;

// ── MonitorDescriptor ────────────────────────────────────────────

/// One entry of the capture collaborator's monitor table.
///
/// Index 0 is the virtual rectangle spanning every monitor, 1..N are the
/// physical monitors. `left`/`top` are in virtual-screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorDescriptor {
    pub index: usize,
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl MonitorDescriptor {
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// `point` in monitor-local coordinates when it lies on this monitor.
    pub fn to_local(&self, point: Point) -> Option<Point> {
        let local = point.relative_to(self.origin());
        let inside = local.x >= 0
            && local.y >= 0
            && (local.x as i64) < self.width as i64
            && (local.y as i64) < self.height as i64;
        inside.then_some(local)
    }
}

// ── PixelFormat ──────────────────────────────────────────────────

/// Pixel layout of a [`RawFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Blue, Green, Red, Alpha.
    Bgra8,
    /// Red, Green, Blue, Alpha.
    Rgba8,
    /// Red, Green, Blue.
    Rgb8,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra8 | PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }
}

// ── RawFrame ─────────────────────────────────────────────────────

/// A captured frame as the OS handed it over.
///
/// `data` holds `height` rows of `stride` bytes; `stride` may exceed
/// `width * bytes_per_pixel` when the capture backend pads rows.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl RawFrame {
    /// A tightly packed frame (`stride = width * bpp`).
    pub fn packed(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width * format.bytes_per_pixel() as u32,
            format,
            data,
        }
    }

    /// Convert to a 3-channel row-major RGB image, dropping alpha and
    /// row padding.
    pub fn to_rgb_image(&self) -> Result<RgbImage, ShareError> {
        let bpp = self.format.bytes_per_pixel();
        let stride = self.stride as usize;
        let row_len = self.width as usize * bpp;
        let needed = stride * self.height as usize;

        if self.width == 0 || self.height == 0 || stride == 0 {
            return Err(ShareError::Capture(format!(
                "empty frame: {}x{} (stride {})",
                self.width, self.height, self.stride
            )));
        }
        if stride < row_len || self.data.len() < needed {
            return Err(ShareError::Capture(format!(
                "frame buffer too small: {} bytes for {}x{} (stride {})",
                self.data.len(),
                self.width,
                self.height,
                self.stride
            )));
        }

        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for row in self.data.chunks_exact(stride).take(self.height as usize) {
            for px in row[..row_len].chunks_exact(bpp) {
                match self.format {
                    PixelFormat::Bgra8 => rgb.extend_from_slice(&[px[2], px[1], px[0]]),
                    PixelFormat::Rgba8 | PixelFormat::Rgb8 => rgb.extend_from_slice(&px[..3]),
                }
            }
        }

        RgbImage::from_raw(self.width, self.height, rgb)
            .ok_or_else(|| ShareError::Capture("frame conversion size mismatch".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(left: i32, top: i32, width: u32, height: u32) -> MonitorDescriptor {
        MonitorDescriptor {
            index: 1,
            left,
            top,
            width,
            height,
        }
    }

    #[test]
    fn to_local_inside_and_outside() {
        let m = monitor(1920, 0, 1280, 1024);
        assert_eq!(m.to_local(Point::new(2000, 10)), Some(Point::new(80, 10)));
        assert_eq!(m.to_local(Point::new(100, 10)), None);
        assert_eq!(m.to_local(Point::new(1920 + 1280, 10)), None);
    }

    #[test]
    fn bgra_is_swizzled_and_alpha_dropped() {
        let frame = RawFrame::packed(2, 1, PixelFormat::Bgra8, vec![1, 2, 3, 255, 4, 5, 6, 255]);
        let img = frame.to_rgb_image().unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [3, 2, 1]);
        assert_eq!(img.get_pixel(1, 0).0, [6, 5, 4]);
    }

    #[test]
    fn row_padding_is_skipped() {
        // 1x2 RGBA with 8-byte stride.
        let data = vec![10, 20, 30, 255, 0, 0, 0, 0, 40, 50, 60, 255, 0, 0, 0, 0];
        let frame = RawFrame {
            width: 1,
            height: 2,
            stride: 8,
            format: PixelFormat::Rgba8,
            data,
        };
        let img = frame.to_rgb_image().unwrap();
        assert_eq!(img.dimensions(), (1, 2));
        assert_eq!(img.get_pixel(0, 1).0, [40, 50, 60]);
    }

    #[test]
    fn short_buffer_is_capture_error() {
        let frame = RawFrame::packed(4, 4, PixelFormat::Rgb8, vec![0; 10]);
        assert!(matches!(frame.to_rgb_image(), Err(ShareError::Capture(_))));
    }

    #[test]
    fn empty_frame_is_capture_error() {
        let zero_width = RawFrame::packed(0, 10, PixelFormat::Rgba8, vec![]);
        assert!(matches!(zero_width.to_rgb_image(), Err(ShareError::Capture(_))));

        let zero_height = RawFrame::packed(10, 0, PixelFormat::Bgra8, vec![]);
        assert!(matches!(zero_height.to_rgb_image(), Err(ShareError::Capture(_))));

        let zero_stride = RawFrame {
            width: 0,
            height: 2,
            stride: 0,
            format: PixelFormat::Rgb8,
            data: vec![1, 2, 3],
        };
        assert!(matches!(zero_stride.to_rgb_image(), Err(ShareError::Capture(_))));
    }
}
