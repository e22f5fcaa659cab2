//! SVG writer (and gzip-compressed SVGZ).
//!
//! Sizes are emitted in points so the document keeps the figure's physical
//! size; the `viewBox` uses the same units, one scene unit per user unit.

use super::{fmt_num, Renderer};
use crate::figure::{Color, Point, Rect, Scene, Stroke, TextAnchor, TextRotation, TextShape};
use crate::result::FigportResult;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;
use std::io::Write;

/// SVG whitespace options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SvgCompression {
    /// Human-readable output
    #[default]
    None,
    /// Minified output (no whitespace)
    Minified,
}

/// Writes a scene as an SVG document
#[derive(Debug, Clone, Default)]
pub struct SvgWriter {
    compression: SvgCompression,
    title: Option<String>,
    svg: String,
}

impl SvgWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whitespace handling
    #[must_use]
    pub const fn with_compression(mut self, compression: SvgCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the accessibility title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Render `scene` and return the document
    pub fn write(mut self, scene: &Scene) -> FigportResult<String> {
        super::render(scene, &mut self)?;
        Ok(self.svg)
    }

    /// Render `scene` and gzip the document
    pub fn write_compressed(self, scene: &Scene) -> FigportResult<Vec<u8>> {
        let svg = self.write(scene)?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(svg.as_bytes())?;
        Ok(encoder.finish()?)
    }

    fn newline(&self) -> &'static str {
        match self.compression {
            SvgCompression::None => "\n",
            SvgCompression::Minified => "",
        }
    }

    fn indent(&self) -> &'static str {
        match self.compression {
            SvgCompression::None => "  ",
            SvgCompression::Minified => "",
        }
    }

    fn write_paint(&mut self, attr: &str, color: Color) -> FigportResult<()> {
        write!(self.svg, " {attr}=\"{}\"", color.to_hex_string())?;
        if !color.is_opaque() {
            write!(self.svg, " {attr}-opacity=\"{}\"", fmt_num(color.opacity()))?;
        }
        Ok(())
    }

    fn write_stroke(&mut self, stroke: &Stroke) -> FigportResult<()> {
        self.write_paint("stroke", stroke.color)?;
        write!(self.svg, " stroke-width=\"{}\"", fmt_num(stroke.width))?;
        Ok(())
    }
}

impl Renderer for SvgWriter {
    fn begin(&mut self, width: f64, height: f64, background: Color) -> FigportResult<()> {
        let newline = self.newline();
        let indent = self.indent();
        let (w, h) = (fmt_num(width), fmt_num(height));

        self.svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        self.svg.push_str(newline);
        write!(
            self.svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
             width=\"{w}pt\" height=\"{h}pt\" viewBox=\"0 0 {w} {h}\">"
        )?;
        self.svg.push_str(newline);

        if let Some(title) = self.title.clone() {
            write!(self.svg, "{indent}<title>{}</title>", escape_xml(&title))?;
            self.svg.push_str(newline);
        }

        write!(self.svg, "{indent}<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\"")?;
        self.write_paint("fill", background)?;
        self.svg.push_str("/>");
        self.svg.push_str(newline);
        Ok(())
    }

    fn rect(
        &mut self,
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<&Stroke>,
    ) -> FigportResult<()> {
        let indent = self.indent();
        write!(
            self.svg,
            "{indent}<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
            fmt_num(rect.x),
            fmt_num(rect.y),
            fmt_num(rect.w),
            fmt_num(rect.h)
        )?;
        match fill {
            Some(color) => self.write_paint("fill", color)?,
            None => self.svg.push_str(" fill=\"none\""),
        }
        if let Some(stroke) = stroke {
            self.write_stroke(stroke)?;
        }
        self.svg.push_str("/>");
        self.svg.push_str(self.newline());
        Ok(())
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) -> FigportResult<()> {
        let indent = self.indent();
        let points_str = points
            .iter()
            .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
            .collect::<Vec<_>>()
            .join(" ");
        write!(self.svg, "{indent}<polyline points=\"{points_str}\" fill=\"none\"")?;
        self.write_stroke(stroke)?;
        self.svg
            .push_str(" stroke-linejoin=\"round\" stroke-linecap=\"square\"/>");
        self.svg.push_str(self.newline());
        Ok(())
    }

    fn text(&mut self, text: &TextShape) -> FigportResult<()> {
        let indent = self.indent();
        let anchor = match text.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let (x, y) = (fmt_num(text.pos.x), fmt_num(text.pos.y));
        write!(
            self.svg,
            "{indent}<text x=\"{x}\" y=\"{y}\" font-family=\"DejaVu Sans, Arial, sans-serif\" \
             font-size=\"{}\" text-anchor=\"{anchor}\"",
            fmt_num(text.size)
        )?;
        self.write_paint("fill", text.color)?;
        if text.rotation == TextRotation::Vertical {
            write!(self.svg, " transform=\"rotate(-90 {x} {y})\"")?;
        }
        write!(self.svg, ">{}</text>", escape_xml(&text.content))?;
        self.svg.push_str(self.newline());
        Ok(())
    }

    fn end(&mut self) -> FigportResult<()> {
        self.svg.push_str("</svg>");
        self.svg.push_str(self.newline());
        Ok(())
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
