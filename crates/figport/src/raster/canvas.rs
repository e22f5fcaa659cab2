//! Pixel canvas implementing [`Renderer`].
//!
//! Every shape is first accumulated into a coverage [`Mask`] in pixel space
//! and then composited once, so overlapping segments of one polyline do not
//! darken their joints.

use super::font::BitmapFont;
use crate::figure::{Color, Point, Rect, Stroke, TextRotation, TextShape, POINTS_PER_INCH};
use crate::render::Renderer;
use crate::result::FigportResult;
use image::{Rgba, RgbaImage};

/// Dot size of the bitmap font as a fraction of the font size.
const DOT_FRACTION: f64 = 0.1;

/// Thinnest line drawn, in pixels.
const MIN_LINE_PX: f64 = 1.0;

pub(crate) struct Canvas {
    image: RgbaImage,
    /// Pixels per point
    scale: f64,
}

impl Canvas {
    pub(crate) fn new(width: u32, height: u32, dpi: f64) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            scale: dpi / POINTS_PER_INCH,
        }
    }

    pub(crate) fn into_image(self) -> RgbaImage {
        self.image
    }

    fn px(&self, p: Point) -> Point {
        Point::new(p.x * self.scale, p.y * self.scale)
    }

    fn mask(&self, bounds: Rect) -> Option<Mask> {
        Mask::covering(
            bounds.x * self.scale - 1.0,
            bounds.y * self.scale - 1.0,
            bounds.max_x() * self.scale + 1.0,
            bounds.max_y() * self.scale + 1.0,
            self.image.width(),
            self.image.height(),
        )
    }

    fn composite(&mut self, mask: &Mask, color: Color) {
        for (i, coverage) in mask.data.iter().enumerate() {
            if *coverage <= 0.0 {
                continue;
            }
            let x = mask.x0 + (i as u32 % mask.w);
            let y = mask.y0 + (i as u32 / mask.w);
            let alpha = f64::from(color.a) / 255.0 * f64::from(coverage.min(1.0));
            let dst = *self.image.get_pixel(x, y);
            self.image.put_pixel(x, y, source_over(dst, color, alpha));
        }
    }

    fn stroke_path(&mut self, points: &[Point], stroke: &Stroke) {
        let Some(bounds) = Rect::bounding(points) else {
            return;
        };
        let Some(mut mask) = self.mask(bounds.inflate(stroke.width)) else {
            return;
        };
        let half = (stroke.width * self.scale).max(MIN_LINE_PX) / 2.0;
        for pair in points.windows(2) {
            mask.max_segment(self.px(pair[0]), self.px(pair[1]), half);
        }
        self.composite(&mask, stroke.color);
    }
}

impl Renderer for Canvas {
    fn begin(&mut self, _width: f64, _height: f64, background: Color) -> FigportResult<()> {
        let fill = Rgba([background.r, background.g, background.b, background.a]);
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
        Ok(())
    }

    fn rect(
        &mut self,
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<&Stroke>,
    ) -> FigportResult<()> {
        if let Some(color) = fill {
            if let Some(mut mask) = self.mask(rect) {
                mask.add_box(
                    rect.x * self.scale,
                    rect.y * self.scale,
                    rect.max_x() * self.scale,
                    rect.max_y() * self.scale,
                );
                self.composite(&mask, color);
            }
        }
        if let Some(stroke) = stroke {
            let corners = [
                Point::new(rect.x, rect.y),
                Point::new(rect.max_x(), rect.y),
                Point::new(rect.max_x(), rect.max_y()),
                Point::new(rect.x, rect.max_y()),
                Point::new(rect.x, rect.y),
            ];
            self.stroke_path(&corners, stroke);
        }
        Ok(())
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) -> FigportResult<()> {
        self.stroke_path(points, stroke);
        Ok(())
    }

    fn text(&mut self, text: &TextShape) -> FigportResult<()> {
        let Some(mut mask) = self.mask(text.bounds()) else {
            return Ok(());
        };
        let dot = text.size * DOT_FRACTION;
        let start = text.anchor_offset();
        let s = self.scale;

        for (i, c) in text.content.chars().enumerate() {
            let glyph = BitmapFont::glyph(c);
            for row in 0..BitmapFont::GLYPH_HEIGHT {
                for col in 0..BitmapFont::GLYPH_WIDTH {
                    if !BitmapFont::is_set(&glyph, row, col) {
                        continue;
                    }
                    // u runs along the reading direction, v up from the baseline
                    let u = start + (i * BitmapFont::ADVANCE + col) as f64 * dot;
                    let v = (BitmapFont::GLYPH_HEIGHT - 1 - row) as f64 * dot;
                    let (x0, y0) = match text.rotation {
                        TextRotation::Horizontal => (text.pos.x + u, text.pos.y - v - dot),
                        TextRotation::Vertical => (text.pos.x - v - dot, text.pos.y - u - dot),
                    };
                    mask.add_box(x0 * s, y0 * s, (x0 + dot) * s, (y0 + dot) * s);
                }
            }
        }
        self.composite(&mask, text.color);
        Ok(())
    }

    fn end(&mut self) -> FigportResult<()> {
        Ok(())
    }
}

/// Per-pixel coverage over a clipped region of the canvas.
struct Mask {
    x0: u32,
    y0: u32,
    w: u32,
    h: u32,
    data: Vec<f32>,
}

impl Mask {
    /// Region covering the pixel-space box, clipped to the canvas.
    fn covering(
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        width: u32,
        height: u32,
    ) -> Option<Self> {
        let x0 = min_x.floor().max(0.0);
        let y0 = min_y.floor().max(0.0);
        let x1 = max_x.ceil().min(f64::from(width));
        let y1 = max_y.ceil().min(f64::from(height));
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        let (x0, y0, x1, y1) = (x0 as u32, y0 as u32, x1 as u32, y1 as u32);
        let (w, h) = (x1 - x0, y1 - y0);
        Some(Self {
            x0,
            y0,
            w,
            h,
            data: vec![0.0; w as usize * h as usize],
        })
    }

    /// Pixel index range overlapping `[lo, hi)` on one axis.
    fn span(lo: f64, hi: f64, origin: u32, len: u32) -> std::ops::Range<u32> {
        let start = lo.floor().max(f64::from(origin));
        let end = hi.ceil().min(f64::from(origin + len));
        if end <= start {
            return 0..0;
        }
        start as u32..end as u32
    }

    /// Add the exact area coverage of an axis-aligned box.
    fn add_box(&mut self, bx0: f64, by0: f64, bx1: f64, by1: f64) {
        for py in Self::span(by0, by1, self.y0, self.h) {
            let fy = f64::from(py);
            let oy = (by1.min(fy + 1.0) - by0.max(fy)).max(0.0);
            for px in Self::span(bx0, bx1, self.x0, self.w) {
                let fx = f64::from(px);
                let ox = (bx1.min(fx + 1.0) - bx0.max(fx)).max(0.0);
                let idx = ((py - self.y0) * self.w + (px - self.x0)) as usize;
                self.data[idx] += (ox * oy) as f32;
            }
        }
    }

    /// Coverage of a round-capped segment of half width `half`, kept as max.
    fn max_segment(&mut self, a: Point, b: Point, half: f64) {
        let reach = half + 1.0;
        let ys = Self::span(a.y.min(b.y) - reach, a.y.max(b.y) + reach, self.y0, self.h);
        let xs = Self::span(a.x.min(b.x) - reach, a.x.max(b.x) + reach, self.x0, self.w);
        for py in ys {
            for px in xs.clone() {
                let center = Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
                let coverage = (half + 0.5 - distance_to_segment(center, a, b)).clamp(0.0, 1.0);
                let idx = ((py - self.y0) * self.w + (px - self.x0)) as usize;
                let slot = &mut self.data[idx];
                *slot = slot.max(coverage as f32);
            }
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx.mul_add(dx, dy * dy);
    let t = if len_sq > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (t.mul_add(dx, a.x), t.mul_add(dy, a.y));
    (p.x - cx).hypot(p.y - cy)
}

/// Porter-Duff "over" of `color` at `alpha` onto `dst`.
fn source_over(dst: Rgba<u8>, color: Color, alpha: f64) -> Rgba<u8> {
    let dst_a = f64::from(dst[3]) / 255.0;
    let out_a = alpha + dst_a * (1.0 - alpha);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |src: u8, dst: u8| -> u8 {
        let v = (f64::from(src) * alpha + f64::from(dst) * dst_a * (1.0 - alpha)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(color.r, dst[0]),
        channel(color.g, dst[1]),
        channel(color.b, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((distance_to_segment(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((distance_to_segment(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((distance_to_segment(Point::new(1.0, 1.0), a, a) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_source_over_opaque_replaces() {
        let out = source_over(Rgba([255, 255, 255, 255]), Color::BLACK, 1.0);
        assert_eq!(out, Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_source_over_half_blends() {
        let out = source_over(Rgba([255, 255, 255, 255]), Color::BLACK, 0.5);
        assert_eq!(out[0], 128);
        assert_eq!(out[3], 255);
    }

    #[test]
    fn test_box_coverage_is_area() {
        let mut mask = Mask::covering(0.0, 0.0, 4.0, 4.0, 4, 4).unwrap();
        mask.add_box(0.5, 0.5, 1.5, 1.0);
        assert!((mask.data[0] - 0.25).abs() < 1e-6);
        assert!((mask.data[1] - 0.25).abs() < 1e-6);
        assert_eq!(mask.data[4], 0.0);
    }

    #[test]
    fn test_mask_clipped_to_canvas() {
        assert!(Mask::covering(-10.0, -10.0, -1.0, -1.0, 4, 4).is_none());
        let mask = Mask::covering(-2.0, 1.0, 2.5, 9.0, 4, 4).unwrap();
        assert_eq!((mask.x0, mask.y0, mask.w, mask.h), (0, 1, 3, 3));
    }
}
