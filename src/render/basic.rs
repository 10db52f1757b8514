use crate::{
    assets::{decode::PreparedImage, store::ImageStore},
    foundation::core::{Rect, Rgba8},
    foundation::error::LayoutResult,
    layout::model::{ElementKind, LayoutElement, PageLayout, ShapeMask, TextStyle},
    render::{
        CanvasRenderer, FrameRGBA, RenderSettings, RendererKind,
        text_paint::{block_glyph_rects, layout_text_block},
    },
    text::measure::FixedAdvance,
};

/// Fallback renderer built on plain pixel buffers.
///
/// Elements are drawn axis-aligned (rotation is ignored), images are sampled nearest-neighbour
/// and text is drawn as glyph blocks.
#[derive(Clone, Debug)]
pub struct BasicRenderer {
    settings: RenderSettings,
    measure: FixedAdvance,
}

impl BasicRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            measure: FixedAdvance::default(),
        }
    }
}

struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32, clear: [u8; 4]) -> Self {
        let mut data = vec![0u8; width as usize * height as usize * 4];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&clear);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Integer pixel span covered by `r`, clipped to the canvas.
    fn span(&self, r: &Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = r.x.max(0.0).round();
        let y0 = r.y.max(0.0).round();
        let x1 = r.right().min(f64::from(self.width)).round();
        let y1 = r.bottom().min(f64::from(self.height)).round();
        (x1 > x0 && y1 > y0).then(|| (x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn blend(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let inv = 255 - u16::from(src[3]);
        for c in 0..4 {
            let d = u16::from(self.data[i + c]);
            self.data[i + c] = (u16::from(src[c]) + (d * inv + 127) / 255).min(255) as u8;
        }
    }

    fn fill(&mut self, r: &Rect, color: Rgba8, inside: impl Fn(f64, f64) -> bool) {
        let Some((x0, y0, x1, y1)) = self.span(r) else {
            return;
        };
        let src = color.premul();
        for y in y0..y1 {
            for x in x0..x1 {
                if inside(f64::from(x) + 0.5, f64::from(y) + 0.5) {
                    self.blend(x, y, src);
                }
            }
        }
    }

    fn draw_image(&mut self, dest: &Rect, img: &PreparedImage) {
        let Some((x0, y0, x1, y1)) = self.span(dest) else {
            return;
        };
        let sx = f64::from(img.width) / dest.width;
        let sy = f64::from(img.height) / dest.height;
        for y in y0..y1 {
            let iy = (((f64::from(y) + 0.5 - dest.y) * sy) as u32).min(img.height - 1);
            for x in x0..x1 {
                let ix = (((f64::from(x) + 0.5 - dest.x) * sx) as u32).min(img.width - 1);
                let i = (iy as usize * img.width as usize + ix as usize) * 4;
                let px = &img.rgba8_premul[i..i + 4];
                self.blend(x, y, [px[0], px[1], px[2], px[3]]);
            }
        }
    }
}

fn inside_rounded(r: &Rect, radius: f64) -> impl Fn(f64, f64) -> bool {
    let r = *r;
    let rad = radius.max(0.0).min(r.width * 0.5).min(r.height * 0.5);
    move |x, y| {
        let cx = x.clamp(r.x + rad, r.right() - rad);
        let cy = y.clamp(r.y + rad, r.bottom() - rad);
        let (dx, dy) = (x - cx, y - cy);
        dx * dx + dy * dy <= rad * rad
    }
}

fn inside_ellipse(r: &Rect) -> impl Fn(f64, f64) -> bool {
    let r = *r;
    move |x, y| {
        if r.width <= 0.0 || r.height <= 0.0 {
            return false;
        }
        let nx = (x - r.center_x()) / (r.width * 0.5);
        let ny = (y - r.center_y()) / (r.height * 0.5);
        nx * nx + ny * ny <= 1.0
    }
}

fn scaled(r: &Rect, f: f64) -> Rect {
    Rect::new(r.x * f, r.y * f, r.width * f, r.height * f)
}

impl BasicRenderer {
    fn draw_element(&mut self, canvas: &mut Canvas, e: &LayoutElement, images: &ImageStore) {
        let f = self.settings.factor();
        let b = scaled(&e.bounds(), f);

        match &e.kind {
            ElementKind::Image { url } => {
                let Some(img) = images.get(url) else {
                    tracing::warn!(element = %e.id, "image not prepared, skipping");
                    return;
                };
                if img.width == 0 || img.height == 0 {
                    return;
                }
                let (iw, ih) = (f64::from(img.width), f64::from(img.height));
                let s = (b.width / iw).min(b.height / ih);
                let dest = Rect::from_center(b.center_x(), b.center_y(), iw * s, ih * s);
                canvas.draw_image(&dest, img);
            }
            ElementKind::Shape {
                mask,
                fill,
                corner_radius,
            } => {
                let color = Rgba8::parse_or(fill, Rgba8::WHITE);
                match mask {
                    ShapeMask::Rect => canvas.fill(&b, color, |_, _| true),
                    ShapeMask::RoundedRect => {
                        canvas.fill(&b, color, inside_rounded(&b, corner_radius * f))
                    }
                    ShapeMask::Ellipse => canvas.fill(&b, color, inside_ellipse(&b)),
                }
            }
            ElementKind::Text { content, style } => {
                self.draw_text(canvas, e, &b, content, style);
            }
        }
    }

    fn draw_text(
        &mut self,
        canvas: &mut Canvas,
        e: &LayoutElement,
        b: &Rect,
        content: &str,
        style: &TextStyle,
    ) {
        let f = self.settings.factor();
        if let Some(bg) = style.background_color.as_deref() {
            canvas.fill(b, Rgba8::parse_or(bg, Rgba8::WHITE), |_, _| true);
        }

        let pad = style.padding.unwrap_or(0.0).max(0.0);
        let block = layout_text_block(
            content,
            style.font_size,
            style.line_height,
            style.align,
            (e.width - 2.0 * pad).max(0.0),
            (e.height - 2.0 * pad).max(0.0),
            &mut self.measure,
        );
        if block.truncated() {
            tracing::warn!(
                element = %e.id,
                drawn = block.lines.len(),
                total = block.total,
                "text truncated"
            );
        }

        let color = Rgba8::parse_or(&style.color, Rgba8::BLACK);
        let advance = style.font_size * self.measure.em_advance;
        let origin = (e.bounds().x + pad, e.bounds().y + pad);
        for line in &block.lines {
            for glyph in block_glyph_rects(&line.text, line.x, line.top, style.font_size, advance) {
                let r = Rect::new(
                    (origin.0 + glyph.x) * f,
                    (origin.1 + glyph.y) * f,
                    glyph.width * f,
                    glyph.height * f,
                );
                canvas.fill(&r, color, |_, _| true);
            }
        }
    }
}

impl CanvasRenderer for BasicRenderer {
    #[tracing::instrument(skip_all, fields(renderer = "basic", seed = layout.seed))]
    fn render(&mut self, layout: &PageLayout, images: &ImageStore) -> LayoutResult<FrameRGBA> {
        let (width, height) = self.settings.output_size(&layout.canvas)?;
        let clear = self
            .settings
            .clear_rgba
            .map(|[r, g, b, a]| Rgba8 { r, g, b, a }.premul())
            .unwrap_or([0, 0, 0, 0]);
        let mut canvas = Canvas::new(width, height, clear);

        let mut ordered: Vec<&LayoutElement> = layout.elements.iter().collect();
        ordered.sort_by_key(|e| e.z_index);
        for e in ordered {
            self.draw_element(&mut canvas, e, images);
        }

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: canvas.data,
            premultiplied: true,
        })
    }

    fn kind(&self) -> RendererKind {
        RendererKind::Basic
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/basic.rs"]
mod tests;
