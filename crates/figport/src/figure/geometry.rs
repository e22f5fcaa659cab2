//! Core geometric and colour types shared by the scene, the writers and the rasterizer.

use serde::{Deserialize, Serialize};

/// A point in scene space (points, origin top-left).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rect from min/max coordinates.
    #[inline]
    pub fn from_bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            x: min_x,
            y: min_y,
            w: max_x - min_x,
            h: max_y - min_y,
        }
    }

    #[inline]
    pub fn max_x(self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn max_y(self) -> f64 {
        self.y + self.h
    }

    #[inline]
    pub fn center(self) -> Point {
        Point::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Union of two rects.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        Rect::from_bounds(
            self.x.min(other.x),
            self.y.min(other.y),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }

    /// Grow the rect by `amount` on every side.
    #[inline]
    pub fn inflate(self, amount: f64) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.w + 2.0 * amount,
            self.h + 2.0 * amount,
        )
    }

    /// Bounding rect of a set of points, `None` when empty.
    pub fn bounding(points: &[Point]) -> Option<Rect> {
        let first = points.first()?;
        let mut rect = Rect::new(first.x, first.y, 0.0, 0.0);
        for p in &points[1..] {
            rect = rect.union(Rect::new(p.x, p.y, 0.0, 0.0));
        }
        Some(rect)
    }
}

/// RGBA colour, 8 bits per channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// First colour of the default line cycle (`#1f77b4`).
    pub const C0: Color = Color::from_hex(0x1f77b4);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from `0xRRGGBB`.
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// `#rrggbb`, alpha is carried separately as an opacity attribute.
    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to 0.0..=1.0, as PDF/PostScript/PGF expect.
    pub fn unit_rgb(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }
}

/// Line style for strokes.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    /// Width in points
    pub width: f64,
}

impl Stroke {
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0x1f77b4);
        assert_eq!((c.r, c.g, c.b, c.a), (0x1f, 0x77, 0xb4, 255));
        assert_eq!(c.to_hex_string(), "#1f77b4");
    }

    #[test]
    fn test_unit_rgb() {
        let (r, g, b) = Color::WHITE.unit_rgb();
        assert_eq!((r, g, b), (1.0, 1.0, 1.0));
        assert_eq!(Color::BLACK.unit_rgb(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_rect_union_and_inflate() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 10.0, 10.0);
        let u = a.union(b);
        assert_eq!(u, Rect::from_bounds(0.0, -5.0, 15.0, 10.0));
        assert_eq!(u.inflate(1.0), Rect::from_bounds(-1.0, -6.0, 16.0, 11.0));
    }

    #[test]
    fn test_bounding_points() {
        assert!(Rect::bounding(&[]).is_none());
        let r = Rect::bounding(&[Point::new(3.0, 1.0), Point::new(-1.0, 4.0)]).unwrap();
        assert_eq!(r, Rect::from_bounds(-1.0, 1.0, 3.0, 4.0));
    }
}
