//! PostScript writer for `ps` (one letter page) and `eps` (bounding box only).

use super::{fmt_num, Renderer};
use crate::figure::{Color, Point, Rect, Scene, Stroke, TextAnchor, TextRotation, TextShape};
use crate::result::FigportResult;
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;

/// US letter in points.
pub const LETTER_SIZE: (f64, f64) = (612.0, 792.0);

/// Which PostScript document to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostScriptFlavor {
    /// Full page, figure centred on letter paper
    Page,
    /// Encapsulated, page equals the figure
    Encapsulated,
}

/// Writes a scene as PostScript level 2
#[derive(Debug, Clone)]
pub struct PostScriptWriter {
    flavor: PostScriptFlavor,
    height: f64,
    ps: String,
}

impl PostScriptWriter {
    #[must_use]
    pub fn new(flavor: PostScriptFlavor) -> Self {
        Self {
            flavor,
            height: 0.0,
            ps: String::new(),
        }
    }

    /// Render `scene` and return the document
    pub fn write(mut self, scene: &Scene) -> FigportResult<String> {
        super::render(scene, &mut self)?;
        Ok(self.ps)
    }

    /// Flip a scene y coordinate into PostScript's bottom-up space.
    fn flip(&self, y: f64) -> f64 {
        self.height - y
    }

    fn set_color(&mut self, color: Color) -> FigportResult<()> {
        let (r, g, b) = color.unit_rgb();
        writeln!(
            self.ps,
            "{} {} {} setrgbcolor",
            fmt_num(r),
            fmt_num(g),
            fmt_num(b)
        )?;
        Ok(())
    }

    fn set_stroke(&mut self, stroke: &Stroke) -> FigportResult<()> {
        self.set_color(stroke.color)?;
        writeln!(self.ps, "{} setlinewidth", fmt_num(stroke.width))?;
        Ok(())
    }
}

impl Renderer for PostScriptWriter {
    fn begin(&mut self, width: f64, height: f64, background: Color) -> FigportResult<()> {
        self.height = height;
        let (ox, oy) = match self.flavor {
            PostScriptFlavor::Page => (
                (LETTER_SIZE.0 - width) / 2.0,
                (LETTER_SIZE.1 - height) / 2.0,
            ),
            PostScriptFlavor::Encapsulated => (0.0, 0.0),
        };

        match self.flavor {
            PostScriptFlavor::Page => self.ps.push_str("%!PS-Adobe-3.0\n"),
            PostScriptFlavor::Encapsulated => self.ps.push_str("%!PS-Adobe-3.0 EPSF-3.0\n"),
        }
        self.ps.push_str("%%Creator: figport\n");
        writeln!(
            self.ps,
            "%%BoundingBox: {} {} {} {}",
            ox.floor() as i64,
            oy.floor() as i64,
            (ox + width).ceil() as i64,
            (oy + height).ceil() as i64
        )?;
        writeln!(
            self.ps,
            "%%HiResBoundingBox: {} {} {} {}",
            fmt_num(ox),
            fmt_num(oy),
            fmt_num(ox + width),
            fmt_num(oy + height)
        )?;
        self.ps.push_str("%%LanguageLevel: 2\n");
        self.ps.push_str("%%Pages: 1\n");
        if self.flavor == PostScriptFlavor::Page {
            self.ps.push_str("%%DocumentPaperSizes: letter\n");
        }
        self.ps.push_str("%%EndComments\n");
        if self.flavor == PostScriptFlavor::Page {
            self.ps.push_str("%%Page: 1 1\n");
        }
        self.ps.push_str("gsave\n");
        if ox != 0.0 || oy != 0.0 {
            writeln!(self.ps, "{} {} translate", fmt_num(ox), fmt_num(oy))?;
        }
        self.ps.push_str("1 setlinejoin 2 setlinecap\n");

        self.set_color(background)?;
        writeln!(
            self.ps,
            "0 0 {} {} rectfill",
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
        let x = fmt_num(rect.x);
        let y = fmt_num(self.flip(rect.max_y()));
        let (w, h) = (fmt_num(rect.w), fmt_num(rect.h));
        if let Some(color) = fill {
            self.set_color(color)?;
            writeln!(self.ps, "{x} {y} {w} {h} rectfill")?;
        }
        if let Some(stroke) = stroke {
            self.set_stroke(stroke)?;
            writeln!(self.ps, "{x} {y} {w} {h} rectstroke")?;
        }
        Ok(())
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) -> FigportResult<()> {
        self.set_stroke(stroke)?;
        self.ps.push_str("newpath\n");
        for (i, p) in points.iter().enumerate() {
            let op = if i == 0 { "moveto" } else { "lineto" };
            writeln!(self.ps, "{} {} {op}", fmt_num(p.x), fmt_num(self.flip(p.y)))?;
        }
        self.ps.push_str("stroke\n");
        Ok(())
    }

    fn text(&mut self, text: &TextShape) -> FigportResult<()> {
        self.set_color(text.color)?;
        writeln!(
            self.ps,
            "/Helvetica findfont {} scalefont setfont",
            fmt_num(text.size)
        )?;
        let x = fmt_num(text.pos.x);
        let y = fmt_num(self.flip(text.pos.y));
        let shift = match text.anchor {
            TextAnchor::Start => "",
            TextAnchor::Middle => " dup stringwidth pop 2 div neg 0 rmoveto",
            TextAnchor::End => " dup stringwidth pop neg 0 rmoveto",
        };
        let content = escape_ps(&text.content);
        match text.rotation {
            TextRotation::Horizontal => {
                writeln!(self.ps, "{x} {y} moveto ({content}){shift} show")?;
            }
            TextRotation::Vertical => {
                writeln!(
                    self.ps,
                    "gsave {x} {y} translate 90 rotate 0 0 moveto ({content}){shift} show grestore"
                )?;
            }
        }
        Ok(())
    }

    fn end(&mut self) -> FigportResult<()> {
        self.ps.push_str("grestore\n");
        self.ps.push_str("showpage\n");
        self.ps.push_str("%%EOF\n");
        Ok(())
    }
}

/// Escape a PostScript string literal; characters outside ASCII become `?`.
pub(super) fn escape_ps(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::figure::{Figure, Shape};

    fn scene() -> Scene {
        let mut scene = Scene::new(576.0, 432.0);
        scene.push(Shape::line(
            Point::new(0.0, 0.0),
            Point::new(10.0, 32.0),
            Stroke::new(Color::BLACK, 1.0),
        ));
        scene
    }

    #[test]
    fn test_eps_header_and_bbox() {
        let eps = PostScriptWriter::new(PostScriptFlavor::Encapsulated)
            .write(&scene())
            .unwrap();
        assert!(eps.starts_with("%!PS-Adobe-3.0 EPSF-3.0\n"));
        assert!(eps.contains("%%BoundingBox: 0 0 576 432\n"));
        assert!(!eps.contains("translate"));
        assert!(eps.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_page_is_centred_on_letter() {
        let ps = PostScriptWriter::new(PostScriptFlavor::Page)
            .write(&scene())
            .unwrap();
        assert!(ps.starts_with("%!PS-Adobe-3.0\n"));
        assert!(ps.contains("%%BoundingBox: 18 180 594 612\n"));
        assert!(ps.contains("18 180 translate"));
        assert!(ps.contains("%%DocumentPaperSizes: letter"));
    }

    #[test]
    fn test_y_axis_flipped() {
        let eps = PostScriptWriter::new(PostScriptFlavor::Encapsulated)
            .write(&scene())
            .unwrap();
        assert!(eps.contains("0 432 moveto"));
        assert!(eps.contains("10 400 lineto"));
    }

    #[test]
    fn test_text_centering_and_rotation() {
        let fig = Figure::default().with_title("T").with_y_label("Y");
        let eps = PostScriptWriter::new(PostScriptFlavor::Encapsulated)
            .write(&fig.scene())
            .unwrap();
        assert!(eps.contains("(T) dup stringwidth pop 2 div neg 0 rmoveto show"));
        assert!(eps.contains("90 rotate"));
    }

    #[test]
    fn test_escape_ps() {
        assert_eq!(escape_ps("f(x) \\ y"), "f\\(x\\) \\\\ y");
        assert_eq!(escape_ps("π"), "?");
    }
}
