//! Resolution decoders.
//!
//! Each reader returns `Ok(Some(dpi))` when the container declares an
//! absolute horizontal resolution, `Ok(None)` when it decodes but carries no
//! such tag, and `Err(MetadataRead)` when the bytes cannot be decoded.

use super::{ppm_to_dpi, CM_PER_INCH};
use crate::result::{FigportError, FigportResult};
use std::io::Cursor;
use tiff::decoder::ifd::Value;
use tiff::tags::Tag;

const JFIF_UNITS_NONE: u8 = 0;
const JFIF_UNITS_INCH: u8 = 1;
const JFIF_UNITS_CM: u8 = 2;

const TIFF_UNIT_INCH: u16 = 2;
const TIFF_UNIT_CM: u16 = 3;

/// Horizontal resolution from a PNG `pHYs` chunk in metres.
pub fn read_png_dpi(bytes: &[u8]) -> FigportResult<Option<f64>> {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let reader = decoder
        .read_info()
        .map_err(|e| FigportError::metadata_read(format!("Failed to decode PNG: {e}")))?;
    Ok(reader
        .info()
        .pixel_dims
        .filter(|dims| dims.unit == png::Unit::Meter && dims.xppu > 0)
        .map(|dims| ppm_to_dpi(dims.xppu)))
}

/// Horizontal density from the JFIF APP0 segment.
pub fn read_jfif_dpi(bytes: &[u8]) -> FigportResult<Option<f64>> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return Err(FigportError::metadata_read("Not a JPEG stream"));
    }

    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return Err(FigportError::metadata_read(format!(
                "Corrupt JPEG marker at offset {pos}"
            )));
        }
        let marker = bytes[pos + 1];
        // Start of scan: no header segments follow
        if marker == 0xDA {
            break;
        }
        let length = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        let segment = bytes
            .get(pos + 4..pos + 2 + length)
            .ok_or_else(|| FigportError::metadata_read("Truncated JPEG segment"))?;

        if marker == 0xE0 && segment.starts_with(b"JFIF\0") && segment.len() >= 12 {
            let units = segment[7];
            let x_density = f64::from(u16::from_be_bytes([segment[8], segment[9]]));
            return Ok(match units {
                JFIF_UNITS_INCH if x_density > 0.0 => Some(x_density),
                JFIF_UNITS_CM if x_density > 0.0 => Some(x_density * CM_PER_INCH),
                JFIF_UNITS_NONE | JFIF_UNITS_INCH | JFIF_UNITS_CM => None,
                other => {
                    return Err(FigportError::metadata_read(format!(
                        "Unknown JFIF density unit {other}"
                    )))
                }
            });
        }
        pos += 2 + length;
    }
    Ok(None)
}

/// Horizontal resolution from the TIFF `XResolution` and `ResolutionUnit` tags.
pub fn read_tiff_dpi(bytes: &[u8]) -> FigportResult<Option<f64>> {
    let tiff_err = |e: tiff::TiffError| FigportError::metadata_read(format!("Failed to decode TIFF: {e}"));
    let mut decoder = tiff::decoder::Decoder::new(Cursor::new(bytes)).map_err(tiff_err)?;

    let Some(x_resolution) = decoder.find_tag(Tag::XResolution).map_err(tiff_err)? else {
        return Ok(None);
    };
    let value = match x_resolution {
        Value::Rational(n, d) if d != 0 => f64::from(n) / f64::from(d),
        Value::Rational(..) => return Ok(None),
        other => {
            return Err(FigportError::metadata_read(format!(
                "Unexpected XResolution value {other:?}"
            )))
        }
    };

    // The tag defaults to inches when absent
    let unit = match decoder.find_tag(Tag::ResolutionUnit).map_err(tiff_err)? {
        Some(v) => v.into_u16().map_err(tiff_err)?,
        None => TIFF_UNIT_INCH,
    };
    Ok(match unit {
        TIFF_UNIT_INCH => Some(value),
        TIFF_UNIT_CM => Some(value * CM_PER_INCH),
        _ => None,
    })
}

/// Horizontal resolution from `biXPelsPerMeter` of a BMP info header.
pub fn read_bmp_dpi(bytes: &[u8]) -> FigportResult<Option<f64>> {
    if !bytes.starts_with(b"BM") || bytes.len() < 18 {
        return Err(FigportError::metadata_read("Not a BMP file"));
    }
    let header_size = u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]);
    // BITMAPCOREHEADER has no resolution fields
    if header_size < 40 {
        return Ok(None);
    }
    let ppm = bytes
        .get(38..42)
        .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| FigportError::metadata_read("Truncated BMP info header"))?;
    Ok(u32::try_from(ppm).ok().filter(|p| *p > 0).map(ppm_to_dpi))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codec::{encode_bmp, encode_jpeg, encode_png, encode_tiff, EncodeOptions};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 4, Rgb([10, 20, 30])))
    }

    fn at(dpi: f64) -> EncodeOptions {
        EncodeOptions::default().with_dpi(dpi)
    }

    fn via_image_crate(format: ImageFormat) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        image().write_to(&mut cursor, format).unwrap();
        cursor.into_inner()
    }

    fn close(found: Option<f64>, expected: f64) -> bool {
        found.is_some_and(|v| (v - expected).abs() < 0.01)
    }

    mod png_tests {
        use super::*;

        #[test]
        fn test_round_trip() {
            let bytes = encode_png(&image(), &at(300.0)).unwrap();
            assert!(close(read_png_dpi(&bytes).unwrap(), 300.0));
        }

        #[test]
        fn test_missing_tag() {
            let bytes = encode_png(&image(), &EncodeOptions::default()).unwrap();
            assert_eq!(read_png_dpi(&bytes).unwrap(), None);
        }

        #[test]
        fn test_garbage_is_error() {
            assert!(matches!(
                read_png_dpi(b"not a png"),
                Err(FigportError::MetadataRead { .. })
            ));
        }
    }

    mod jfif_tests {
        use super::*;

        #[test]
        fn test_round_trip() {
            let bytes = encode_jpeg(&image(), &at(300.0)).unwrap();
            assert!(close(read_jfif_dpi(&bytes).unwrap(), 300.0));
        }

        #[test]
        fn test_aspect_only_density_is_missing() {
            let bytes = encode_jpeg(&image(), &EncodeOptions::default()).unwrap();
            assert_eq!(read_jfif_dpi(&bytes).unwrap(), None);
        }

        #[test]
        fn test_dots_per_cm() {
            let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
            bytes.extend_from_slice(b"JFIF\0");
            bytes.extend_from_slice(&[1, 1, JFIF_UNITS_CM, 0, 100, 0, 100, 0, 0]);
            bytes.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
            assert!(close(read_jfif_dpi(&bytes).unwrap(), 254.0));
        }

        #[test]
        fn test_not_jpeg() {
            assert!(read_jfif_dpi(b"\x89PNG").is_err());
        }

        #[test]
        fn test_truncated_segment() {
            let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x40, b'J'];
            assert!(read_jfif_dpi(&bytes).is_err());
        }
    }

    mod tiff_tests {
        use super::*;

        #[test]
        fn test_round_trip() {
            let bytes = encode_tiff(&image(), &at(300.0)).unwrap();
            assert!(close(read_tiff_dpi(&bytes).unwrap(), 300.0));
        }

        #[test]
        fn test_fractional_round_trip() {
            let bytes = encode_tiff(&image(), &at(72.5)).unwrap();
            assert!(close(read_tiff_dpi(&bytes).unwrap(), 72.5));
        }

        #[test]
        fn test_garbage_is_error() {
            assert!(read_tiff_dpi(b"II*\0garbage").is_err());
        }
    }

    mod bmp_tests {
        use super::*;

        #[test]
        fn test_round_trip() {
            let bytes = encode_bmp(&image(), &at(300.0)).unwrap();
            assert!(close(read_bmp_dpi(&bytes).unwrap(), 300.0));
        }

        #[test]
        fn test_image_crate_bmp_has_no_resolution() {
            let bytes = via_image_crate(ImageFormat::Bmp);
            assert_eq!(read_bmp_dpi(&bytes).unwrap(), None);
        }

        #[test]
        fn test_not_bmp() {
            assert!(read_bmp_dpi(b"GIF89a").is_err());
        }
    }
}
