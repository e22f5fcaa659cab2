//! Vector form of a figure: resolution independent drawing instructions.
//!
//! Coordinates are in points (1/72 inch) with the origin at the top-left
//! corner. Writers for bottom-up formats (PDF, PostScript, PGF) flip the y
//! axis themselves.

use super::geometry::{Color, Point, Rect, Stroke};
use serde::{Deserialize, Serialize};

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f64 = 0.6;

/// Horizontal anchoring of a text run relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// Text rotation; only the two orientations a plot needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextRotation {
    #[default]
    Horizontal,
    /// Rotated 90° counter-clockwise, reading bottom to top
    Vertical,
}

/// A single run of text. `pos` is the anchor point on the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub pos: Point,
    pub content: String,
    /// Font size in points
    pub size: f64,
    pub color: Color,
    pub anchor: TextAnchor,
    pub rotation: TextRotation,
}

impl TextShape {
    pub fn new(pos: Point, content: impl Into<String>, size: f64) -> Self {
        Self {
            pos,
            content: content.into(),
            size,
            color: Color::BLACK,
            anchor: TextAnchor::Start,
            rotation: TextRotation::Horizontal,
        }
    }

    #[must_use]
    pub const fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    #[must_use]
    pub const fn rotated(mut self, rotation: TextRotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Estimated advance width of the run. No font metrics are loaded, so
    /// every writer and the rasterizer share this estimate.
    pub fn estimated_width(&self) -> f64 {
        self.content.chars().count() as f64 * self.size * GLYPH_ADVANCE
    }

    /// Offset from `pos` to the start of the run along the reading direction.
    pub fn anchor_offset(&self) -> f64 {
        match self.anchor {
            TextAnchor::Start => 0.0,
            TextAnchor::Middle => -self.estimated_width() / 2.0,
            TextAnchor::End => -self.estimated_width(),
        }
    }

    /// Approximate ink bounds in scene space.
    pub fn bounds(&self) -> Rect {
        let start = self.anchor_offset();
        let width = self.estimated_width();
        let ascent = self.size * 0.75;
        let descent = self.size * 0.25;
        match self.rotation {
            TextRotation::Horizontal => Rect::from_bounds(
                self.pos.x + start,
                self.pos.y - ascent,
                self.pos.x + start + width,
                self.pos.y + descent,
            ),
            // Reading upwards: the run extends towards smaller y and the
            // glyph tops face left.
            TextRotation::Vertical => Rect::from_bounds(
                self.pos.x - ascent,
                self.pos.y - start - width,
                self.pos.x + descent,
                self.pos.y - start,
            ),
        }
    }
}

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect {
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
    Text(TextShape),
}

impl Shape {
    /// Convenience for a stroked line segment.
    pub fn line(from: Point, to: Point, stroke: Stroke) -> Self {
        Self::Polyline {
            points: vec![from, to],
            stroke,
        }
    }

    /// Bounds including half the stroke width.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect { rect, stroke, .. } => {
                let half = stroke.map_or(0.0, |s| s.width / 2.0);
                Some(rect.inflate(half))
            }
            Self::Polyline { points, stroke } => {
                Rect::bounding(points).map(|r| r.inflate(stroke.width / 2.0))
            }
            Self::Text(text) => {
                if text.content.is_empty() {
                    None
                } else {
                    Some(text.bounds())
                }
            }
        }
    }

    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        match self {
            Self::Rect { rect, fill, stroke } => Self::Rect {
                rect: Rect::new(rect.x + dx, rect.y + dy, rect.w, rect.h),
                fill: *fill,
                stroke: *stroke,
            },
            Self::Polyline { points, stroke } => Self::Polyline {
                points: points.iter().map(|p| p.translated(dx, dy)).collect(),
                stroke: *stroke,
            },
            Self::Text(text) => Self::Text(TextShape {
                pos: text.pos.translated(dx, dy),
                ..text.clone()
            }),
        }
    }
}

/// The vector form of a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Width in points
    pub width: f64,
    /// Height in points
    pub height: f64,
    pub background: Color,
    pub shapes: Vec<Shape>,
}

impl Scene {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: Color::WHITE,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn width_inches(&self) -> f64 {
        self.width / POINTS_PER_INCH
    }

    pub fn height_inches(&self) -> f64 {
        self.height / POINTS_PER_INCH
    }

    /// Pixel size of this scene rasterized at `dpi`.
    pub fn pixel_size(&self, dpi: f64) -> (u32, u32) {
        let w = (self.width_inches() * dpi).round().max(1.0);
        let h = (self.height_inches() * dpi).round().max(1.0);
        (w as u32, h as u32)
    }

    /// Union of the bounds of every shape; the background is not content.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.shapes
            .iter()
            .filter_map(Shape::bounds)
            .reduce(Rect::union)
    }

    /// Crop the canvas to the content bounds plus `pad` points on each side.
    /// A scene without content is returned unchanged.
    #[must_use]
    pub fn tightened(&self, pad: f64) -> Self {
        let Some(bounds) = self.content_bounds() else {
            return self.clone();
        };
        let bounds = bounds.inflate(pad);
        Self {
            width: bounds.w,
            height: bounds.h,
            background: self.background,
            shapes: self
                .shapes
                .iter()
                .map(|s| s.translated(-bounds.x, -bounds.y))
                .collect(),
        }
    }
}
