//! Cursor indicator and region outline drawn onto captured frames.

use image::{Rgb, RgbImage};

use crate::state::{Bounds, Point};

/// Arrow outline at 1080 lines, tip at the origin.
const ARROW: [(f32, f32); 7] = [
    (0.0, 0.0),
    (0.0, 16.0),
    (4.0, 12.0),
    (7.0, 19.0),
    (9.0, 18.0),
    (6.0, 11.0),
    (11.0, 11.0),
];

const LIGHT: Rgb<u8> = Rgb([255, 255, 255]);
const DARK: Rgb<u8> = Rgb([0, 0, 0]);
const OUTLINE: Rgb<u8> = Rgb([0, 220, 0]);
const OUTLINE_THICKNESS: i32 = 2;

/// Relative luminance of a pixel in `[0, 1]`.
pub fn luminance(px: Rgb<u8>) -> f32 {
    let [r, g, b] = px.0;
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

/// Fill and outline colours contrasting with the pixel under the cursor.
pub fn cursor_colors(under: Rgb<u8>) -> (Rgb<u8>, Rgb<u8>) {
    if luminance(under) < 0.5 {
        (LIGHT, DARK)
    } else {
        (DARK, LIGHT)
    }
}

/// Draw the arrow with its tip at `tip` (monitor-local pixels).
///
/// The arrow scales with the frame height so it stays the same apparent
/// size on high-resolution monitors. Nothing is drawn when `tip` lies
/// outside the image.
pub fn draw_cursor(img: &mut RgbImage, tip: Point) {
    let (w, h) = img.dimensions();
    if tip.x < 0 || tip.y < 0 || tip.x as u32 >= w || tip.y as u32 >= h {
        return;
    }

    let (fill, edge) = cursor_colors(*img.get_pixel(tip.x as u32, tip.y as u32));
    let scale = (h as f32 / 1080.0).max(1.0);
    let poly: Vec<(f32, f32)> = ARROW
        .iter()
        .map(|&(x, y)| (tip.x as f32 + x * scale, tip.y as f32 + y * scale))
        .collect();

    fill_polygon(img, &poly, fill);
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        draw_line(img, a, b, edge);
    }
}

/// Draw a rectangle outline just inside `bounds`, clipped to the image.
pub fn draw_region_outline(img: &mut RgbImage, bounds: Bounds) {
    let (w, h) = img.dimensions();
    let Some(b) = bounds.clamp_to(w, h) else {
        return;
    };

    for y in b.ymin..b.ymax {
        for x in b.xmin..b.xmax {
            let near_edge = x - b.xmin < OUTLINE_THICKNESS
                || b.xmax - 1 - x < OUTLINE_THICKNESS
                || y - b.ymin < OUTLINE_THICKNESS
                || b.ymax - 1 - y < OUTLINE_THICKNESS;
            if near_edge {
                img.put_pixel(x as u32, y as u32, OUTLINE);
            }
        }
    }
}

fn put_clipped(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Even-odd fill sampled at pixel centres over the clamped bounding box.
fn fill_polygon(img: &mut RgbImage, poly: &[(f32, f32)], color: Rgb<u8>) {
    let (min_x, max_x, min_y, max_y) = poly.iter().fold(
        (f32::MAX, f32::MIN, f32::MAX, f32::MIN),
        |(x0, x1, y0, y1), &(x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
    );
    let last_x = img.width() as i32 - 1;
    let last_y = img.height() as i32 - 1;

    for py in (min_y.floor() as i32).max(0)..=(max_y.ceil() as i32).min(last_y) {
        for px in (min_x.floor() as i32).max(0)..=(max_x.ceil() as i32).min(last_x) {
            if contains(poly, px as f32 + 0.5, py as f32 + 0.5) {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

fn contains(poly: &[(f32, f32)], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn draw_line(img: &mut RgbImage, a: (f32, f32), b: (f32, f32), color: Rgb<u8>) {
    let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).ceil().max(1.0) as i32;
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let x = a.0 + (b.0 - a.0) * t;
        let y = a.1 + (b.1 - a.1) * t;
        put_clipped(img, x.round() as i32, y.round() as i32, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luminance_threshold() {
        assert!(luminance(Rgb([0, 0, 0])) < 0.5);
        assert!(luminance(Rgb([255, 255, 255])) > 0.99);
        // Pure green is bright, pure blue is dark.
        assert!(luminance(Rgb([0, 255, 0])) > 0.5);
        assert!(luminance(Rgb([0, 0, 255])) < 0.5);
    }

    #[test]
    fn cursor_contrasts_with_background() {
        let mut dark = RgbImage::new(100, 100);
        draw_cursor(&mut dark, Point::new(10, 10));
        // The tip is an outline pixel; the body is filled.
        assert_eq!(*dark.get_pixel(10, 10), DARK);
        assert_eq!(*dark.get_pixel(12, 18), LIGHT);

        let mut light = RgbImage::from_pixel(100, 100, Rgb([240, 240, 240]));
        draw_cursor(&mut light, Point::new(10, 10));
        assert_eq!(*light.get_pixel(12, 18), DARK);
    }

    #[test]
    fn cursor_outside_frame_draws_nothing() {
        let mut img = RgbImage::new(50, 50);
        draw_cursor(&mut img, Point::new(-1, 10));
        draw_cursor(&mut img, Point::new(50, 10));
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn cursor_near_edge_is_clipped() {
        let mut img = RgbImage::from_pixel(20, 20, Rgb([200, 200, 200]));
        draw_cursor(&mut img, Point::new(18, 18));
        assert_eq!(*img.get_pixel(18, 19), LIGHT);
    }

    #[test]
    fn outline_marks_border_only() {
        let mut img = RgbImage::new(400, 400);
        let bounds = Bounds {
            xmin: 100,
            ymin: 100,
            xmax: 300,
            ymax: 300,
        };
        draw_region_outline(&mut img, bounds);
        assert_eq!(*img.get_pixel(100, 100), OUTLINE);
        assert_eq!(*img.get_pixel(299, 200), OUTLINE);
        assert_eq!(*img.get_pixel(200, 200), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(99, 99), Rgb([0, 0, 0]));
    }
}
