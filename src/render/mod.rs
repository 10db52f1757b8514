pub mod basic;
pub mod text_paint;
pub mod vello;

use crate::{
    assets::{decode::unpremultiply_rgba8_in_place, store::ImageStore},
    foundation::core::PrintFormat,
    foundation::error::{LayoutError, LayoutResult},
    layout::model::PageLayout,
    text::font::FontFace,
};

#[derive(Clone, Debug)]
/// Rendered RGBA8 frame.
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// True when `data` holds premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy suitable for PNG export.
    pub fn to_rgba_image(&self) -> LayoutResult<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| LayoutError::render("frame byte length does not match its size"))
    }

    /// Raw pixel at `(x, y)`, in the frame's own alpha convention.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Draws a [`PageLayout`] onto a raster surface.
pub trait CanvasRenderer {
    /// Render every element in z order. Images missing from `images` are skipped.
    fn render(&mut self, layout: &PageLayout, images: &ImageStore) -> LayoutResult<FrameRGBA>;

    fn kind(&self) -> RendererKind;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererKind {
    /// vello_cpu: anti-aliased, rotated elements, rounded plaques, glyph text.
    Vello,
    /// `image` buffers only: axis-aligned, nearest-neighbour, block glyphs.
    Basic,
}

impl RendererKind {
    /// Pick the richest renderer the output surface and font allow.
    pub fn detect(width: u32, height: u32, font: Option<&FontFace>) -> Self {
        let fits = u16::try_from(width).is_ok() && u16::try_from(height).is_ok();
        let kind = if fits && font.is_some() {
            RendererKind::Vello
        } else {
            RendererKind::Basic
        };
        tracing::debug!(?kind, width, height, font = font.is_some(), "renderer selected");
        kind
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Output scale relative to the print canvas (previews use < 1).
    pub scale: f64,
    /// Device pixel ratio multiplied into the scale.
    pub pixel_ratio: f64,
    /// Background, straight alpha; `None` leaves the surface transparent.
    pub clear_rgba: Option<[u8; 4]>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::print()
    }
}

impl RenderSettings {
    /// Full print resolution on a white background.
    pub fn print() -> Self {
        Self {
            scale: 1.0,
            pixel_ratio: 1.0,
            clear_rgba: Some([255, 255, 255, 255]),
        }
    }

    /// Scaled-down preview on a white background.
    pub fn preview(scale: f64) -> Self {
        Self {
            scale,
            ..Self::print()
        }
    }

    /// Canvas-to-output scale factor.
    pub fn factor(&self) -> f64 {
        self.scale * self.pixel_ratio
    }

    /// Output surface size for a print format.
    pub fn output_size(&self, format: &PrintFormat) -> LayoutResult<(u32, u32)> {
        let f = self.factor();
        if !f.is_finite() || f <= 0.0 {
            return Err(LayoutError::validation(
                "render scale and pixel ratio must be finite and > 0",
            ));
        }
        let w = (format.width * f).round();
        let h = (format.height * f).round();
        if w < 1.0 || h < 1.0 || w > f64::from(u32::MAX) || h > f64::from(u32::MAX) {
            return Err(LayoutError::validation(format!(
                "output surface {w}x{h} is out of range"
            )));
        }
        Ok((w as u32, h as u32))
    }
}

/// Build a renderer of the requested kind.
pub fn create_renderer(
    kind: RendererKind,
    settings: &RenderSettings,
    font: Option<&FontFace>,
) -> LayoutResult<Box<dyn CanvasRenderer>> {
    match kind {
        RendererKind::Vello => Ok(Box::new(vello::VelloRenderer::new(
            settings.clone(),
            font,
        )?)),
        RendererKind::Basic => Ok(Box::new(basic::BasicRenderer::new(settings.clone()))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/mod.rs"]
mod tests;
