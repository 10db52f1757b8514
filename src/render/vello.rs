use std::{collections::HashMap, sync::Arc};

use kurbo::Shape as _;

use crate::{
    assets::{decode::PreparedImage, store::ImageStore},
    foundation::core::Rgba8,
    foundation::error::{LayoutError, LayoutResult},
    layout::model::{ElementKind, LayoutElement, PageLayout, ShapeMask, TextStyle},
    render::{
        CanvasRenderer, FrameRGBA, RenderSettings, RendererKind,
        text_paint::{TextPainter, layout_text_block},
    },
    text::font::FontFace,
};

/// vello_cpu renderer: anti-aliased, honours rotation, paints glyphs from the loaded font.
pub struct VelloRenderer {
    settings: RenderSettings,
    text: TextPainter,
}

// Image paints for one render call, keyed by reference.
type PaintCache = HashMap<String, vello_cpu::Image>;

impl VelloRenderer {
    pub fn new(settings: RenderSettings, font: Option<&FontFace>) -> LayoutResult<Self> {
        Ok(Self {
            settings,
            text: TextPainter::new(font)?,
        })
    }

    fn draw_element(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        view: kurbo::Affine,
        e: &LayoutElement,
        images: &ImageStore,
        paints: &mut PaintCache,
    ) {
        let base = view * element_transform(e);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match &e.kind {
            ElementKind::Image { url } => {
                let (paint, iw, ih) = match image_paint_for(url, images, paints) {
                    Ok(Some(p)) => p,
                    Ok(None) => {
                        tracing::warn!(element = %e.id, "image not prepared, skipping");
                        return;
                    }
                    Err(err) => {
                        tracing::warn!(element = %e.id, error = %err, "image unusable, skipping");
                        return;
                    }
                };
                if iw <= 0.0 || ih <= 0.0 {
                    return;
                }
                let s = (e.width / iw).min(e.height / ih);
                let offset = ((e.width - iw * s) * 0.5, (e.height - ih * s) * 0.5);
                ctx.set_transform(affine_to_cpu(
                    base * kurbo::Affine::translate(offset) * kurbo::Affine::scale(s),
                ));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
            }
            ElementKind::Shape {
                mask,
                fill,
                corner_radius,
            } => {
                ctx.set_transform(affine_to_cpu(base));
                ctx.set_paint(color_to_cpu(Rgba8::parse_or(fill, Rgba8::WHITE)));
                let local = kurbo::Rect::new(0.0, 0.0, e.width, e.height);
                match mask {
                    ShapeMask::Rect => {
                        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, e.width, e.height));
                    }
                    ShapeMask::RoundedRect => {
                        let r = corner_radius.max(0.0).min(e.width * 0.5).min(e.height * 0.5);
                        let path = kurbo::RoundedRect::from_rect(local, r).to_path(0.1);
                        ctx.fill_path(&bezpath_to_cpu(&path));
                    }
                    ShapeMask::Ellipse => {
                        let path = kurbo::Ellipse::from_rect(local).to_path(0.1);
                        ctx.fill_path(&bezpath_to_cpu(&path));
                    }
                }
            }
            ElementKind::Text { content, style } => {
                self.draw_text(ctx, base, e, content, style);
            }
        }
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        base: kurbo::Affine,
        e: &LayoutElement,
        content: &str,
        style: &TextStyle,
    ) {
        if let Some(bg) = style.background_color.as_deref() {
            ctx.set_transform(affine_to_cpu(base));
            ctx.set_paint(color_to_cpu(Rgba8::parse_or(bg, Rgba8::WHITE)));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, e.width, e.height));
        }

        let pad = style.padding.unwrap_or(0.0).max(0.0);
        let block = layout_text_block(
            content,
            style.font_size,
            style.line_height,
            style.align,
            (e.width - 2.0 * pad).max(0.0),
            (e.height - 2.0 * pad).max(0.0),
            &mut self.text,
        );
        if block.truncated() {
            tracing::warn!(
                element = %e.id,
                drawn = block.lines.len(),
                total = block.total,
                "text truncated"
            );
        }

        let inner = base * kurbo::Affine::translate((pad, pad));
        let color = Rgba8::parse_or(&style.color, Rgba8::BLACK);
        for line in &block.lines {
            if let Some(shadow) = &style.shadow {
                let shifted = inner * kurbo::Affine::translate((shadow.offset_x, shadow.offset_y));
                let shadow_color = Rgba8::parse_or(&shadow.color, Rgba8::BLACK);
                self.text
                    .fill_line(ctx, shifted, line, style.font_size, shadow_color);
            }
            self.text.fill_line(ctx, inner, line, style.font_size, color);
        }
    }
}

impl CanvasRenderer for VelloRenderer {
    #[tracing::instrument(skip_all, fields(renderer = "vello", seed = layout.seed))]
    fn render(&mut self, layout: &PageLayout, images: &ImageStore) -> LayoutResult<FrameRGBA> {
        let (width, height) = self.settings.output_size(&layout.canvas)?;
        let (w16, h16) = surface_size(width, height)?;

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        let mut ctx = vello_cpu::RenderContext::new(w16, h16);

        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            ));
        }

        let view = kurbo::Affine::scale(self.settings.factor());
        let mut paints = PaintCache::new();
        let mut ordered: Vec<&LayoutElement> = layout.elements.iter().collect();
        ordered.sort_by_key(|e| e.z_index);
        for e in ordered {
            self.draw_element(&mut ctx, view, e, images, &mut paints);
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn kind(&self) -> RendererKind {
        RendererKind::Vello
    }
}

fn image_paint_for(
    url: &str,
    images: &ImageStore,
    paints: &mut PaintCache,
) -> LayoutResult<Option<(vello_cpu::Image, f64, f64)>> {
    let Some(img) = images.get(url) else {
        return Ok(None);
    };
    let size = (f64::from(img.width), f64::from(img.height));
    if let Some(paint) = paints.get(url) {
        return Ok(Some((paint.clone(), size.0, size.1)));
    }
    let paint = image_paint(img)?;
    paints.insert(url.to_string(), paint.clone());
    Ok(Some((paint, size.0, size.1)))
}

/// Element-local box `(0, 0, w, h)` to canvas: rotate about the element center.
pub fn element_transform(e: &LayoutElement) -> kurbo::Affine {
    kurbo::Affine::translate((e.x, e.y))
        * kurbo::Affine::rotate(e.rotation.to_radians())
        * kurbo::Affine::translate((-e.width * 0.5, -e.height * 0.5))
}

pub(crate) fn surface_size(width: u32, height: u32) -> LayoutResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LayoutError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LayoutError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

pub(crate) fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Image paint for a premultiplied image.
pub(crate) fn image_paint(img: &PreparedImage) -> LayoutResult<vello_cpu::Image> {
    let (w, h) = surface_size(img.width, img.height)?;
    let expected = img.width as usize * img.height as usize * 4;
    if img.rgba8_premul.len() != expected {
        return Err(LayoutError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(expected / 4);
    for px in img.rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/vello.rs"]
mod tests;
