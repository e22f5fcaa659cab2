//! Encoders. Each takes a pixel buffer and returns the complete file bytes.

use super::{dpi_to_ppm, EncodeOptions};
use crate::result::{FigportError, FigportResult};
use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use std::io::{Cursor, Seek, Write};
use tiff::encoder::{colortype, Rational, TiffEncoder};
use tiff::tags::ResolutionUnit;

/// Quantizer speed for GIF palettes (1 slowest, 30 fastest)
const GIF_SPEED: i32 = 10;

/// Offset of `biXPelsPerMeter` in a BMP file (14 byte file header + 24).
const BMP_X_PELS_OFFSET: usize = 38;

/// Smallest DIB header that stores a resolution.
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// Pixel bytes of `image` with the matching PNG colour type.
///
/// Gray and RGB buffers are passed through; anything else becomes RGBA.
fn png_color(image: &DynamicImage) -> png::ColorType {
    match image {
        DynamicImage::ImageLuma8(_) => png::ColorType::Grayscale,
        DynamicImage::ImageRgb8(_) => png::ColorType::Rgb,
        _ => png::ColorType::Rgba,
    }
}

/// Encode PNG with the png crate, writing a `pHYs` chunk when a dpi is set.
pub fn encode_png(image: &DynamicImage, options: &EncodeOptions) -> FigportResult<Vec<u8>> {
    let color = png_color(image);
    let rgba;
    let data: &[u8] = match image {
        DynamicImage::ImageLuma8(buf) => buf.as_raw(),
        DynamicImage::ImageRgb8(buf) => buf.as_raw(),
        other => {
            rgba = other.to_rgba8();
            rgba.as_raw()
        }
    };

    let mut output = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut output, image.width(), image.height());
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(options.png_compression.to_png_compression());
        if let Some(dpi) = options.dpi {
            let ppm = dpi_to_ppm(dpi);
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));
        }

        let mut writer = encoder
            .write_header()
            .map_err(|e| FigportError::write("png", format!("Failed to write PNG header: {e}")))?;
        writer
            .write_image_data(data)
            .map_err(|e| FigportError::write("png", format!("Failed to write PNG data: {e}")))?;
        writer
            .finish()
            .map_err(|e| FigportError::write("png", format!("Failed to finish PNG: {e}")))?;
    }

    Ok(output)
}

/// Encode baseline JPEG; a dpi is stored as JFIF density in dots per inch.
pub fn encode_jpeg(image: &DynamicImage, options: &EncodeOptions) -> FigportResult<Vec<u8>> {
    let mut output = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut output, options.jpeg_quality);
    if let Some(dpi) = options.dpi {
        let density = dpi.round().clamp(1.0, f64::from(u16::MAX)) as u16;
        encoder.set_pixel_density(PixelDensity::dpi(density));
    }

    let result = match image {
        DynamicImage::ImageLuma8(buf) => {
            encoder.write_image(buf.as_raw(), buf.width(), buf.height(), ExtendedColorType::L8)
        }
        other => {
            let rgb = other.to_rgb8();
            encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        }
    };
    result.map_err(|e| FigportError::write("jpeg", e.to_string()))?;
    Ok(output)
}

fn tiff_error(e: tiff::TiffError) -> FigportError {
    FigportError::write("tiff", e.to_string())
}

fn tiff_rational(dpi: f64) -> Rational {
    if dpi.fract() == 0.0 {
        Rational {
            n: dpi as u32,
            d: 1,
        }
    } else {
        Rational {
            n: (dpi * 1000.0).round() as u32,
            d: 1000,
        }
    }
}

fn write_tiff_image<C, W>(
    encoder: &mut TiffEncoder<W>,
    width: u32,
    height: u32,
    data: &[u8],
    dpi: Option<f64>,
) -> FigportResult<()>
where
    C: colortype::ColorType<Inner = u8>,
    W: Write + Seek,
{
    let mut image = encoder.new_image::<C>(width, height).map_err(tiff_error)?;
    if let Some(dpi) = dpi {
        image.resolution(ResolutionUnit::Inch, tiff_rational(dpi));
    }
    image.write_data(data).map_err(tiff_error)
}

/// Encode uncompressed TIFF with resolution tags in inches.
pub fn encode_tiff(image: &DynamicImage, options: &EncodeOptions) -> FigportResult<Vec<u8>> {
    let (width, height) = (image.width(), image.height());
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).map_err(tiff_error)?;
        match image {
            DynamicImage::ImageLuma8(buf) => write_tiff_image::<colortype::Gray8, _>(
                &mut encoder,
                width,
                height,
                buf.as_raw(),
                options.dpi,
            )?,
            DynamicImage::ImageRgb8(buf) => write_tiff_image::<colortype::RGB8, _>(
                &mut encoder,
                width,
                height,
                buf.as_raw(),
                options.dpi,
            )?,
            other => write_tiff_image::<colortype::RGBA8, _>(
                &mut encoder,
                width,
                height,
                other.to_rgba8().as_raw(),
                options.dpi,
            )?,
        }
    }
    Ok(cursor.into_inner())
}

/// Encode BMP through the image crate, then store the resolution in the
/// info header, which that encoder leaves at zero.
pub fn encode_bmp(image: &DynamicImage, options: &EncodeOptions) -> FigportResult<Vec<u8>> {
    let mut output = Vec::new();
    let result = match image {
        DynamicImage::ImageLuma8(buf) => BmpEncoder::new(&mut output).write_image(
            buf.as_raw(),
            buf.width(),
            buf.height(),
            ExtendedColorType::L8,
        ),
        DynamicImage::ImageRgb8(buf) => BmpEncoder::new(&mut output).write_image(
            buf.as_raw(),
            buf.width(),
            buf.height(),
            ExtendedColorType::Rgb8,
        ),
        other => {
            let rgba = other.to_rgba8();
            BmpEncoder::new(&mut output).write_image(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
                ExtendedColorType::Rgba8,
            )
        }
    };
    result.map_err(|e| FigportError::write("bmp", e.to_string()))?;

    if let Some(dpi) = options.dpi {
        set_bmp_resolution(&mut output, dpi_to_ppm(dpi))?;
    }
    Ok(output)
}

fn set_bmp_resolution(bmp: &mut [u8], ppm: u32) -> FigportResult<()> {
    let header_size = bmp
        .get(14..18)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .unwrap_or_default();
    if header_size < BMP_INFO_HEADER_SIZE || bmp.len() < BMP_X_PELS_OFFSET + 8 {
        return Err(FigportError::write(
            "bmp",
            "bitmap header has no resolution fields",
        ));
    }
    let ppm = i32::try_from(ppm).unwrap_or(i32::MAX).to_le_bytes();
    bmp[BMP_X_PELS_OFFSET..BMP_X_PELS_OFFSET + 4].copy_from_slice(&ppm);
    bmp[BMP_X_PELS_OFFSET + 4..BMP_X_PELS_OFFSET + 8].copy_from_slice(&ppm);
    Ok(())
}

/// Encode a single-frame GIF with the gif crate.
pub fn encode_gif(image: &DynamicImage) -> FigportResult<Vec<u8>> {
    let too_large = || {
        FigportError::write(
            "gif",
            format!(
                "{}x{} exceeds the GIF size limit of {}",
                image.width(),
                image.height(),
                u16::MAX
            ),
        )
    };
    let width = u16::try_from(image.width()).map_err(|_| too_large())?;
    let height = u16::try_from(image.height()).map_err(|_| too_large())?;
    let mut rgba = image.to_rgba8().into_raw();

    let mut output = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut output, width, height, &[])
            .map_err(|e| FigportError::write("gif", format!("Failed to create GIF encoder: {e}")))?;
        let frame = gif::Frame::from_rgba_speed(width, height, &mut rgba, GIF_SPEED);
        encoder
            .write_frame(&frame)
            .map_err(|e| FigportError::write("gif", format!("Failed to write GIF frame: {e}")))?;
    }
    Ok(output)
}

/// Binary PPM for colour buffers, PGM for gray ones.
pub fn encode_pnm(image: &DynamicImage) -> FigportResult<Vec<u8>> {
    let mut output = Vec::new();
    let result = match image {
        DynamicImage::ImageLuma8(buf) => PnmEncoder::new(&mut output)
            .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
            .write_image(buf.as_raw(), buf.width(), buf.height(), ExtendedColorType::L8),
        other => {
            let rgb = other.to_rgb8();
            PnmEncoder::new(&mut output)
                .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
                .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        }
    };
    result.map_err(|e| FigportError::write("pnm", e.to_string()))?;
    Ok(output)
}

/// Raw RGBA samples, row-major, no header.
pub fn encode_raw(image: &DynamicImage) -> Vec<u8> {
    image.to_rgba8().into_raw()
}
