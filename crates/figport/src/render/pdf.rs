//! Single-page PDF 1.4 writer.
//!
//! The page content stream is left uncompressed and text uses the standard
//! Helvetica font, so no font program is embedded. Colour opacity is not
//! carried into the document.

use super::postscript::escape_ps;
use super::{fmt_num, Renderer};
use crate::figure::{Color, Point, Rect, Scene, Stroke, TextRotation, TextShape};
use crate::result::FigportResult;
use std::fmt::Write as FmtWrite;

/// Writes a scene as a one page PDF document
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    title: Option<String>,
    width: f64,
    height: f64,
    content: String,
}

impl PdfWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title stored in the info dictionary
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Render `scene` and return the document bytes
    pub fn write(mut self, scene: &Scene) -> FigportResult<Vec<u8>> {
        super::render(scene, &mut self)?;
        self.assemble()
    }

    fn flip(&self, y: f64) -> f64 {
        self.height - y
    }

    fn fill_color(&mut self, color: Color) -> FigportResult<()> {
        let (r, g, b) = color.unit_rgb();
        writeln!(self.content, "{} {} {} rg", fmt_num(r), fmt_num(g), fmt_num(b))?;
        Ok(())
    }

    fn stroke_style(&mut self, stroke: &Stroke) -> FigportResult<()> {
        let (r, g, b) = stroke.color.unit_rgb();
        writeln!(
            self.content,
            "{} {} {} RG {} w",
            fmt_num(r),
            fmt_num(g),
            fmt_num(b),
            fmt_num(stroke.width)
        )?;
        Ok(())
    }

    /// Lay out the objects and the cross-reference table.
    fn assemble(&self) -> FigportResult<Vec<u8>> {
        let mut objects: Vec<String> = Vec::with_capacity(6);
        objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
        objects.push("<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string());
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>",
            fmt_num(self.width),
            fmt_num(self.height)
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            self.content.len(),
            self.content
        ));
        objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());
        let mut info = String::from("<< /Producer (figport)");
        if let Some(title) = &self.title {
            write!(info, " /Title ({})", escape_ps(title))?;
        }
        info.push_str(" >>");
        objects.push(info);

        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            writeln!(xref, "{offset:010} 00000 n ")?;
        }
        write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1,
            objects.len()
        )?;
        out.extend_from_slice(xref.as_bytes());
        Ok(out)
    }
}

impl Renderer for PdfWriter {
    fn begin(&mut self, width: f64, height: f64, background: Color) -> FigportResult<()> {
        self.width = width;
        self.height = height;
        self.content.push_str("1 j 2 J\n");
        self.fill_color(background)?;
        writeln!(
            self.content,
            "0 0 {} {} re f",
            fmt_num(width),
            fmt_num(height)
        )?;
        Ok(())
    }

    fn rect(
        &mut self,
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<&Stroke>,
    ) -> FigportResult<()> {
        let path = format!(
            "{} {} {} {} re",
            fmt_num(rect.x),
            fmt_num(self.flip(rect.max_y())),
            fmt_num(rect.w),
            fmt_num(rect.h)
        );
        if let Some(color) = fill {
            self.fill_color(color)?;
            writeln!(self.content, "{path} f")?;
        }
        if let Some(stroke) = stroke {
            self.stroke_style(stroke)?;
            writeln!(self.content, "{path} S")?;
        }
        Ok(())
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) -> FigportResult<()> {
        self.stroke_style(stroke)?;
        for (i, p) in points.iter().enumerate() {
            let op = if i == 0 { 'm' } else { 'l' };
            writeln!(self.content, "{} {} {op}", fmt_num(p.x), fmt_num(self.flip(p.y)))?;
        }
        self.content.push_str("S\n");
        Ok(())
    }

    fn text(&mut self, text: &TextShape) -> FigportResult<()> {
        let offset = text.anchor_offset();
        let (matrix, x, y) = match text.rotation {
            TextRotation::Horizontal => ("1 0 0 1", text.pos.x + offset, self.flip(text.pos.y)),
            TextRotation::Vertical => ("0 1 -1 0", text.pos.x, self.flip(text.pos.y) + offset),
        };
        self.content.push_str("BT\n");
        writeln!(self.content, "/F1 {} Tf", fmt_num(text.size))?;
        self.fill_color(text.color)?;
        writeln!(self.content, "{matrix} {} {} Tm", fmt_num(x), fmt_num(y))?;
        writeln!(self.content, "({}) Tj", escape_ps(&text.content))?;
        self.content.push_str("ET\n");
        Ok(())
    }

    fn end(&mut self) -> FigportResult<()> {
        Ok(())
    }
}
