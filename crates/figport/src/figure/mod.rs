//! The renderable image artifact.
//!
//! A [`Figure`] is an explicit value handed to the exporter: a page size, a
//! native resolution, labels and line series. [`Figure::scene`] lays it out
//! as resolution independent drawing instructions (the vector form); the
//! raster form is obtained from that scene by [`crate::raster::rasterize`].
//!
//! ```ignore
//! let figure = Figure::new(8.0, 6.0)
//!     .with_title("Simple Line Plot")
//!     .with_x_label("X-axis")
//!     .with_y_label("Y-axis")
//!     .plot(xs, ys);
//! let scene = figure.scene();
//! ```

mod geometry;
mod scene;
mod ticks;

pub use geometry::{Color, Point, Rect, Stroke};
pub use scene::{Scene, Shape, TextAnchor, TextRotation, TextShape, POINTS_PER_INCH};
pub use ticks::{format_tick, nice_step, padded_limits, ticks};

use serde::{Deserialize, Serialize};

/// Default native resolution of a figure.
pub const DEFAULT_FIGURE_DPI: f64 = 100.0;

// Subplot rectangle as fractions of the figure (left, right, bottom, top).
const SUBPLOT_LEFT: f64 = 0.125;
const SUBPLOT_RIGHT: f64 = 0.9;
const SUBPLOT_BOTTOM: f64 = 0.11;
const SUBPLOT_TOP: f64 = 0.88;

const DATA_MARGIN: f64 = 0.05;
const MAX_TICKS: usize = 8;

const AXES_LINE_WIDTH: f64 = 0.8;
const TICK_LENGTH: f64 = 3.5;
const TICK_PAD: f64 = 3.5;
const TICK_LABEL_SIZE: f64 = 10.0;
const AXIS_LABEL_SIZE: f64 = 10.0;
const TITLE_SIZE: f64 = 12.0;
const TITLE_PAD: f64 = 6.0;
const LABEL_PAD: f64 = 4.0;

/// One line series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub stroke: Stroke,
}

impl Series {
    /// Finite (x, y) pairs; the shorter of the two vectors bounds the length.
    fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .map(|(x, y)| (*x, *y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

/// A single-axes line plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    width_in: f64,
    height_in: f64,
    dpi: f64,
    title: Option<String>,
    x_label: Option<String>,
    y_label: Option<String>,
    series: Vec<Series>,
}

impl Default for Figure {
    fn default() -> Self {
        Self::new(8.0, 6.0)
    }
}

impl Figure {
    /// Create an empty figure of the given size in inches
    #[must_use]
    pub fn new(width_in: f64, height_in: f64) -> Self {
        Self {
            width_in,
            height_in,
            dpi: DEFAULT_FIGURE_DPI,
            title: None,
            x_label: None,
            y_label: None,
            series: Vec::new(),
        }
    }

    /// 8 × 6 in plot of 100 samples of `sin(x)` over `[0, 10]`, titled
    /// "Simple Line Plot" with "X-axis" / "Y-axis" labels.
    #[must_use]
    pub fn sine_demo() -> Self {
        let xs: Vec<f64> = (0..100).map(|i| f64::from(i) * 10.0 / 99.0).collect();
        let ys = xs.iter().map(|x| x.sin()).collect();
        Self::default()
            .with_title("Simple Line Plot")
            .with_x_label("X-axis")
            .with_y_label("Y-axis")
            .plot(xs, ys)
    }

    /// Set the native resolution
    #[must_use]
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the x axis label
    #[must_use]
    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    /// Set the y axis label
    #[must_use]
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    /// Add a line series in the default colour
    #[must_use]
    pub fn plot(self, xs: Vec<f64>, ys: Vec<f64>) -> Self {
        self.plot_styled(xs, ys, Stroke::new(Color::C0, 1.5))
    }

    /// Add a line series with an explicit stroke
    #[must_use]
    pub fn plot_styled(mut self, xs: Vec<f64>, ys: Vec<f64>, stroke: Stroke) -> Self {
        self.series.push(Series { xs, ys, stroke });
        self
    }

    pub fn width_inches(&self) -> f64 {
        self.width_in
    }

    pub fn height_inches(&self) -> f64 {
        self.height_in
    }

    /// Native resolution, used when no target resolution applies
    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Pixel size at the native resolution.
    pub fn natural_pixel_size(&self) -> (u32, u32) {
        self.scene().pixel_size(self.dpi)
    }

    /// Lay the figure out as drawing instructions.
    pub fn scene(&self) -> Scene {
        let width = self.width_in * POINTS_PER_INCH;
        let height = self.height_in * POINTS_PER_INCH;
        let mut scene = Scene::new(width, height);

        let axes = Rect::from_bounds(
            width * SUBPLOT_LEFT,
            height * (1.0 - SUBPLOT_TOP),
            width * SUBPLOT_RIGHT,
            height * (1.0 - SUBPLOT_BOTTOM),
        );

        let (x_lo, x_hi, y_lo, y_hi) = self.data_limits();
        let map_x = |x: f64| axes.x + (x - x_lo) / (x_hi - x_lo) * axes.w;
        let map_y = |y: f64| axes.max_y() - (y - y_lo) / (y_hi - y_lo) * axes.h;

        for series in &self.series {
            let points: Vec<Point> = series
                .finite_points()
                .map(|(x, y)| Point::new(map_x(x), map_y(y)))
                .collect();
            if points.len() >= 2 {
                scene.push(Shape::Polyline {
                    points,
                    stroke: series.stroke,
                });
            }
        }

        let axis_stroke = Stroke::new(Color::BLACK, AXES_LINE_WIDTH);
        scene.push(Shape::Rect {
            rect: axes,
            fill: None,
            stroke: Some(axis_stroke),
        });

        // x ticks below the axes
        let (x_ticks, x_step) = ticks(x_lo, x_hi, MAX_TICKS);
        let x_label_baseline = axes.max_y() + TICK_LENGTH + TICK_PAD + TICK_LABEL_SIZE * 0.75;
        for value in x_ticks {
            let px = map_x(value);
            scene.push(Shape::line(
                Point::new(px, axes.max_y()),
                Point::new(px, axes.max_y() + TICK_LENGTH),
                axis_stroke,
            ));
            scene.push(Shape::Text(
                TextShape::new(
                    Point::new(px, x_label_baseline),
                    format_tick(value, x_step),
                    TICK_LABEL_SIZE,
                )
                .anchored(TextAnchor::Middle),
            ));
        }

        // y ticks left of the axes
        let (y_ticks, y_step) = ticks(y_lo, y_hi, MAX_TICKS);
        let mut widest_y_label: f64 = 0.0;
        for value in y_ticks {
            let py = map_y(value);
            scene.push(Shape::line(
                Point::new(axes.x - TICK_LENGTH, py),
                Point::new(axes.x, py),
                axis_stroke,
            ));
            let label = TextShape::new(
                Point::new(axes.x - TICK_LENGTH - TICK_PAD, py + TICK_LABEL_SIZE * 0.35),
                format_tick(value, y_step),
                TICK_LABEL_SIZE,
            )
            .anchored(TextAnchor::End);
            widest_y_label = widest_y_label.max(label.estimated_width());
            scene.push(Shape::Text(label));
        }

        if let Some(title) = &self.title {
            scene.push(Shape::Text(
                TextShape::new(
                    Point::new(axes.center().x, axes.y - TITLE_PAD),
                    title.clone(),
                    TITLE_SIZE,
                )
                .anchored(TextAnchor::Middle),
            ));
        }

        if let Some(label) = &self.x_label {
            scene.push(Shape::Text(
                TextShape::new(
                    Point::new(
                        axes.center().x,
                        x_label_baseline + LABEL_PAD + AXIS_LABEL_SIZE,
                    ),
                    label.clone(),
                    AXIS_LABEL_SIZE,
                )
                .anchored(TextAnchor::Middle),
            ));
        }

        if let Some(label) = &self.y_label {
            let x = axes.x - TICK_LENGTH - TICK_PAD - widest_y_label - LABEL_PAD;
            scene.push(Shape::Text(
                TextShape::new(Point::new(x, axes.center().y), label.clone(), AXIS_LABEL_SIZE)
                    .anchored(TextAnchor::Middle)
                    .rotated(TextRotation::Vertical),
            ));
        }

        scene
    }

    /// Padded (x_lo, x_hi, y_lo, y_hi) over every series, unit box when empty.
    fn data_limits(&self) -> (f64, f64, f64, f64) {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for (x, y) in self.series.iter().flat_map(Series::finite_points) {
            bounds = Some(match bounds {
                None => (x, x, y, y),
                Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
            });
        }
        let (x0, x1, y0, y1) = bounds.unwrap_or((0.0, 1.0, 0.0, 1.0));
        let (x_lo, x_hi) = padded_limits(x0, x1, DATA_MARGIN);
        let (y_lo, y_hi) = padded_limits(y0, y1, DATA_MARGIN);
        (x_lo, x_hi, y_lo, y_hi)
    }
}
