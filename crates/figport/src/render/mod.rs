//! Vector form writers.
//!
//! Every writer implements [`Renderer`]; [`render`] walks a [`Scene`] and
//! issues one call per shape, in order. Writers only build bytes in memory,
//! file I/O belongs to the backends.

pub mod pdf;
pub mod pgf;
pub mod postscript;
pub mod svg;

use crate::figure::{Color, Point, Rect, Scene, Shape, Stroke, TextShape};
use crate::result::FigportResult;

pub use pdf::PdfWriter;
pub use pgf::PgfWriter;
pub use postscript::{PostScriptFlavor, PostScriptWriter};
pub use svg::{SvgCompression, SvgWriter};

/// Trait for drawing a scene into some target representation.
pub trait Renderer {
    /// Start a page of `width` × `height` points filled with `background`.
    fn begin(&mut self, width: f64, height: f64, background: Color) -> FigportResult<()>;

    /// Rectangle, filled and/or stroked.
    fn rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<&Stroke>)
        -> FigportResult<()>;

    /// Open polyline.
    fn polyline(&mut self, points: &[Point], stroke: &Stroke) -> FigportResult<()>;

    /// Single run of text.
    fn text(&mut self, text: &TextShape) -> FigportResult<()>;

    /// Finish the page.
    fn end(&mut self) -> FigportResult<()>;
}

/// Render a scene using the given renderer.
pub fn render<R: Renderer>(scene: &Scene, renderer: &mut R) -> FigportResult<()> {
    renderer.begin(scene.width, scene.height, scene.background)?;
    for shape in &scene.shapes {
        match shape {
            Shape::Rect { rect, fill, stroke } => renderer.rect(*rect, *fill, stroke.as_ref())?,
            Shape::Polyline { points, stroke } => {
                if points.len() >= 2 {
                    renderer.polyline(points, stroke)?;
                }
            }
            Shape::Text(text) => {
                if !text.content.is_empty() {
                    renderer.text(text)?;
                }
            }
        }
    }
    renderer.end()
}

/// Format a coordinate compactly: at most three decimals, no trailing zeros.
pub(crate) fn fmt_num(value: f64) -> String {
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock renderer that records all calls.
    #[derive(Default)]
    struct MockRenderer {
        calls: Vec<String>,
    }

    impl Renderer for MockRenderer {
        fn begin(&mut self, width: f64, height: f64, _background: Color) -> FigportResult<()> {
            self.calls.push(format!("begin({width}, {height})"));
            Ok(())
        }

        fn rect(
            &mut self,
            _rect: Rect,
            fill: Option<Color>,
            stroke: Option<&Stroke>,
        ) -> FigportResult<()> {
            self.calls
                .push(format!("rect(fill={}, stroke={})", fill.is_some(), stroke.is_some()));
            Ok(())
        }

        fn polyline(&mut self, points: &[Point], _stroke: &Stroke) -> FigportResult<()> {
            self.calls.push(format!("polyline({})", points.len()));
            Ok(())
        }

        fn text(&mut self, text: &TextShape) -> FigportResult<()> {
            self.calls.push(format!("text(\"{}\")", text.content));
            Ok(())
        }

        fn end(&mut self) -> FigportResult<()> {
            self.calls.push("end".to_string());
            Ok(())
        }
    }

    #[test]
    fn test_render_empty_scene() {
        let mut renderer = MockRenderer::default();
        render(&Scene::new(10.0, 20.0), &mut renderer).unwrap_or_default();
        assert_eq!(renderer.calls, vec!["begin(10, 20)", "end"]);
    }

    #[test]
    fn test_render_skips_degenerate_shapes() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(Shape::Polyline {
            points: vec![Point::ZERO],
            stroke: Stroke::new(Color::BLACK, 1.0),
        });
        scene.push(Shape::Text(TextShape::new(Point::ZERO, "", 10.0)));
        scene.push(Shape::Text(TextShape::new(Point::ZERO, "Hello", 10.0)));

        let mut renderer = MockRenderer::default();
        render(&scene, &mut renderer).unwrap_or_default();
        assert_eq!(renderer.calls.len(), 3);
        assert!(renderer.calls.iter().any(|c| c.contains("Hello")));
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(1.25), "1.25");
        assert_eq!(fmt_num(0.33333), "0.333");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(-2.5), "-2.5");
    }
}
