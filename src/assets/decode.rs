use std::{io::Cursor, sync::Arc};

use base64::Engine;

use crate::foundation::error::{LayoutError, LayoutResult};

#[derive(Clone, Debug, PartialEq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Premultiply a straight-alpha image.
    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut rgba8_premul = img.as_raw().clone();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        }
    }

    /// Width over height; square for empty images.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }
}

/// Decode PNG/JPEG/... bytes into straight-alpha RGBA8.
pub fn decode_rgba_image(bytes: &[u8]) -> LayoutResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| LayoutError::decode(format!("decode image from memory: {e}")))?;
    Ok(dyn_img.to_rgba8())
}

/// Decode image bytes into a premultiplied [`PreparedImage`].
pub fn decode_image(bytes: &[u8]) -> LayoutResult<PreparedImage> {
    decode_rgba_image(bytes).map(|img| PreparedImage::from_rgba_image(&img))
}

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Payload of a `data:` URL.
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Parse a `data:` URL; `None` when the string is not one or its base64 payload is invalid.
pub fn parse_data_url(uri: &str) -> Option<DataUrl> {
    let rest = uri.trim().strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header
        .split(';')
        .next()
        .filter(|v| !v.is_empty())
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = if header.split(';').any(|p| p == "base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .ok()?
    } else {
        payload.as_bytes().to_vec()
    };
    Some(DataUrl { mime, bytes })
}

/// Encode straight-alpha RGBA8 as PNG bytes.
pub fn encode_png(img: &image::RgbaImage) -> LayoutResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| LayoutError::render(format!("encode png: {e}")))?;
    Ok(buf)
}

/// Encode as a `data:image/png;base64,...` URL.
pub fn png_data_url(img: &image::RgbaImage) -> LayoutResult<String> {
    let png = encode_png(img)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
