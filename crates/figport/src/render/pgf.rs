//! PGF picture writer, for `\input{figure.pgf}` in a LaTeX document.

use super::{fmt_num, Renderer};
use crate::figure::{
    Color, Point, Rect, Scene, Stroke, TextAnchor, TextRotation, TextShape, POINTS_PER_INCH,
};
use crate::result::FigportResult;
use std::fmt::Write as FmtWrite;

/// Writes a scene as PGF drawing commands; coordinates are in inches
#[derive(Debug, Clone, Default)]
pub struct PgfWriter {
    height: f64,
    pgf: String,
}

impl PgfWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `scene` and return the picture source
    pub fn write(mut self, scene: &Scene) -> FigportResult<String> {
        super::render(scene, &mut self)?;
        Ok(self.pgf)
    }

    /// Scene point as a `\pgfqpoint` in inches, y flipped.
    fn qpoint(&self, x: f64, y: f64) -> String {
        format!(
            "\\pgfqpoint{{{}in}}{{{}in}}",
            inches(x),
            inches(self.height - y)
        )
    }

    fn define_color(&mut self, name: &str, color: Color) -> FigportResult<()> {
        let (r, g, b) = color.unit_rgb();
        writeln!(
            self.pgf,
            "\\definecolor{{{name}}}{{rgb}}{{{},{},{}}}%",
            fmt_num(r),
            fmt_num(g),
            fmt_num(b)
        )?;
        Ok(())
    }

    fn set_stroke(&mut self, stroke: &Stroke) -> FigportResult<()> {
        self.define_color("currentstroke", stroke.color)?;
        self.pgf.push_str("\\pgfsetstrokecolor{currentstroke}%\n");
        writeln!(self.pgf, "\\pgfsetlinewidth{{{}pt}}%", fmt_num(stroke.width))?;
        Ok(())
    }
}

impl Renderer for PgfWriter {
    fn begin(&mut self, width: f64, height: f64, background: Color) -> FigportResult<()> {
        self.height = height;
        self.pgf.push_str("%% Creator: figport\n");
        self.pgf.push_str("\\begingroup%\n\\makeatletter%\n\\begin{pgfpicture}%\n");
        writeln!(
            self.pgf,
            "\\pgfpathrectangle{{\\pgfpointorigin}}{{\\pgfqpoint{{{}in}}{{{}in}}}}%",
            inches(width),
            inches(height)
        )?;
        self.pgf.push_str("\\pgfusepath{use as bounding box, clip}%\n");
        self.pgf.push_str("\\pgfsetroundjoin%\n\\pgfsetrectcap%\n");

        self.pgf.push_str("\\begin{pgfscope}%\n");
        self.define_color("currentfill", background)?;
        self.pgf.push_str("\\pgfsetfillcolor{currentfill}%\n");
        writeln!(
            self.pgf,
            "\\pgfpathrectangle{{\\pgfpointorigin}}{{\\pgfqpoint{{{}in}}{{{}in}}}}%",
            inches(width),
            inches(height)
        )?;
        self.pgf.push_str("\\pgfusepath{fill}%\n\\end{pgfscope}%\n");
        Ok(())
    }

    fn rect(
        &mut self,
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<&Stroke>,
    ) -> FigportResult<()> {
        self.pgf.push_str("\\begin{pgfscope}%\n");
        if let Some(color) = fill {
            self.define_color("currentfill", color)?;
            self.pgf.push_str("\\pgfsetfillcolor{currentfill}%\n");
        }
        if let Some(stroke) = stroke {
            self.set_stroke(stroke)?;
        }
        let corner = self.qpoint(rect.x, rect.max_y());
        writeln!(
            self.pgf,
            "\\pgfpathrectangle{{{corner}}}{{\\pgfqpoint{{{}in}}{{{}in}}}}%",
            inches(rect.w),
            inches(rect.h)
        )?;
        let usage = match (fill.is_some(), stroke.is_some()) {
            (true, true) => "fill,stroke",
            (true, false) => "fill",
            (false, true) => "stroke",
            (false, false) => "discard",
        };
        writeln!(self.pgf, "\\pgfusepath{{{usage}}}%")?;
        self.pgf.push_str("\\end{pgfscope}%\n");
        Ok(())
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) -> FigportResult<()> {
        self.pgf.push_str("\\begin{pgfscope}%\n");
        self.set_stroke(stroke)?;
        for (i, p) in points.iter().enumerate() {
            let op = if i == 0 { "moveto" } else { "lineto" };
            let q = self.qpoint(p.x, p.y);
            writeln!(self.pgf, "\\pgfpath{op}{{{q}}}%")?;
        }
        self.pgf.push_str("\\pgfusepath{stroke}%\n\\end{pgfscope}%\n");
        Ok(())
    }

    fn text(&mut self, text: &TextShape) -> FigportResult<()> {
        self.pgf.push_str("\\begin{pgfscope}%\n");
        self.define_color("textcolor", text.color)?;
        let mut options = format!(
            "x={}in,y={}in",
            inches(text.pos.x),
            inches(self.height - text.pos.y)
        );
        match text.anchor {
            TextAnchor::Start => options.push_str(",left"),
            TextAnchor::Middle => {}
            TextAnchor::End => options.push_str(",right"),
        }
        options.push_str(",base");
        if text.rotation == TextRotation::Vertical {
            options.push_str(",rotate=90");
        }
        writeln!(
            self.pgf,
            "\\pgftext[{options}]{{\\color{{textcolor}}\\fontsize{{{}}}{{{}}}\\selectfont {}}}%",
            fmt_num(text.size),
            fmt_num(text.size * 1.2),
            escape_latex(&text.content)
        )?;
        self.pgf.push_str("\\end{pgfscope}%\n");
        Ok(())
    }

    fn end(&mut self) -> FigportResult<()> {
        self.pgf
            .push_str("\\end{pgfpicture}%\n\\makeatother%\n\\endgroup%\n");
        Ok(())
    }
}

fn inches(points: f64) -> String {
    fmt_num(points / POINTS_PER_INCH)
}

/// Escape characters that are special in LaTeX text mode.
fn escape_latex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
