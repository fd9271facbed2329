//! Rasterize the composed SVG through an offscreen pixmap and encode the
//! pixel buffer as PNG or JPEG.

use image::RgbImage;
use resvg::tiny_skia::Pixmap;

use crate::error::ExportError;
use crate::template::{RasterizeError, rasterize_svg};

const JPEG_QUALITY: u8 = 90;

pub fn render_pixmap(svg: &str, width: u32, height: u32) -> Result<Pixmap, ExportError> {
    rasterize_svg(svg, width, height).map_err(|e| match e {
        RasterizeError::Parse(message) => ExportError::ComposedSvg(message),
        RasterizeError::Alloc => ExportError::Encode {
            format: "raster",
            message: format!("cannot allocate a {width}x{height} surface"),
        },
    })
}

pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    pixmap.encode_png().map_err(|e| ExportError::Encode {
        format: "png",
        message: e.to_string(),
    })
}

/// JPEG has no alpha channel: the pixmap is composited over an opaque
/// white background first.
pub fn encode_jpeg(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let rgb = flatten_on_white(pixmap);
    let mut bytes = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ExportError::Encode {
            format: "jpeg",
            message: e.to_string(),
        })?;
    Ok(bytes)
}

/// tiny-skia pixels are premultiplied, so compositing over white is just
/// `channel + white * (1 - alpha)`.
fn flatten_on_white(pixmap: &Pixmap) -> RgbImage {
    let mut pixels = Vec::with_capacity(pixmap.pixels().len() * 3);
    for pixel in pixmap.pixels() {
        let inverse = 255 - pixel.alpha() as u16;
        pixels.push((pixel.red() as u16 + inverse).min(255) as u8);
        pixels.push((pixel.green() as u16 + inverse).min(255) as u8);
        pixels.push((pixel.blue() as u16 + inverse).min(255) as u8);
    }
    RgbImage::from_raw(pixmap.width(), pixmap.height(), pixels)
        .expect("pixel buffer length matches pixmap dimensions")
}
