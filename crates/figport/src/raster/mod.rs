//! Rasterize-and-resize helper.
//!
//! Turns the vector form of a figure into pixels, rescales pixel buffers
//! for a target resolution and converts between channel layouts.

mod canvas;
pub mod font;

pub use font::BitmapFont;

use crate::figure::{Figure, Scene};
use crate::render;
use crate::result::FigportResult;
use canvas::Canvas;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Channel layout of an encoded raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    /// Colour with alpha
    Rgba,
    /// Colour without alpha
    Rgb,
    /// Single luminance channel
    Gray,
}

impl ChannelLayout {
    /// Number of channels per pixel
    pub const fn channels(self) -> u8 {
        match self {
            Self::Rgba => 4,
            Self::Rgb => 3,
            Self::Gray => 1,
        }
    }

    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba)
    }
}

/// Rasterize a scene at `dpi`.
///
/// The output is `round(width / 72 × dpi)` by `round(height / 72 × dpi)`
/// pixels and depends only on the scene and the resolution.
pub fn rasterize(scene: &Scene, dpi: f64) -> FigportResult<RgbaImage> {
    let (width, height) = scene.pixel_size(dpi);
    debug!(width, height, dpi, "Rasterizing scene");
    let mut canvas = Canvas::new(width, height, dpi);
    render::render(scene, &mut canvas)?;
    Ok(canvas.into_image())
}

/// Rasterize a figure at its native resolution.
pub fn rasterize_natural(figure: &Figure) -> FigportResult<RgbaImage> {
    rasterize(&figure.scene(), figure.dpi())
}

/// Pixel size for `target_dpi`, scaling `natural` by `target / baseline`.
pub fn scaled_dimensions(natural: (u32, u32), target_dpi: f64, baseline_dpi: f64) -> (u32, u32) {
    let factor = target_dpi / baseline_dpi;
    let scale = |n: u32| (f64::from(n) * factor).round().max(1.0) as u32;
    (scale(natural.0), scale(natural.1))
}

/// Resize to exactly `width` × `height` with a Lanczos filter.
pub fn resize(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image.clone();
    }
    debug!(
        from_width = image.width(),
        from_height = image.height(),
        width,
        height,
        "Resizing raster"
    );
    image.resize_exact(width, height, FilterType::Lanczos3)
}

/// Convert to the given channel layout.
///
/// Dropping alpha composites over white, so transparent pixels come out
/// white rather than black. Images that carry no alpha convert directly.
pub fn convert_layout(image: DynamicImage, layout: ChannelLayout) -> DynamicImage {
    match layout {
        ChannelLayout::Rgba => match image {
            DynamicImage::ImageRgba8(_) => image,
            other => DynamicImage::ImageRgba8(other.to_rgba8()),
        },
        ChannelLayout::Rgb => DynamicImage::ImageRgb8(drop_alpha(&image)),
        ChannelLayout::Gray => DynamicImage::ImageLuma8(
            DynamicImage::ImageRgb8(drop_alpha(&image)).to_luma8(),
        ),
    }
}

fn drop_alpha(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let alpha = u32::from(src[3]);
        let over_white = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        *dst = Rgb([over_white(src[0]), over_white(src[1]), over_white(src[2])]);
    }
    out
}
