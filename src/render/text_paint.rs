//! Line placement and painting shared by the renderers and the spread compositor.

use crate::{
    foundation::core::{Rect, Rgba8},
    foundation::error::LayoutResult,
    layout::model::TextAlign,
    render::vello::{affine_to_cpu, color_to_cpu},
    text::{
        font::FontFace,
        measure::{FixedAdvance, ParleyMeasure, TextMeasure},
        wrap::{block_height, line_spacing, lines_that_fit, wrap_words},
    },
};

#[derive(Clone, Debug, PartialEq)]
/// One wrapped line positioned in its text box (box-local coordinates).
pub struct PlacedLine {
    pub text: String,
    /// Left edge of the line.
    pub x: f64,
    /// Top of the line box.
    pub top: f64,
    /// Measured width.
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// Wrapped and vertically truncated text.
pub struct TextBlock {
    /// Lines that fit, top to bottom.
    pub lines: Vec<PlacedLine>,
    /// Lines produced by wrapping, before truncation.
    pub total: usize,
    pub font_size: f64,
    pub spacing: f64,
}

impl TextBlock {
    pub fn truncated(&self) -> bool {
        self.lines.len() < self.total
    }

    /// Height of the drawn lines: `(n - 1) * spacing + font_size`, zero when empty.
    pub fn height(&self) -> f64 {
        block_height(self.lines.len(), self.font_size, self.spacing)
    }
}

/// Wrap `content` to `width` and keep the lines whose box fits in `height`.
pub fn layout_text_block(
    content: &str,
    font_size: f64,
    line_height: f64,
    align: TextAlign,
    width: f64,
    height: f64,
    measure: &mut dyn TextMeasure,
) -> TextBlock {
    let spacing = line_spacing(font_size, line_height);
    let wrapped = wrap_words(content, width, font_size, measure);
    let total = wrapped.len();
    let keep = lines_that_fit(total, spacing, height);

    let lines = wrapped
        .into_iter()
        .take(keep)
        .enumerate()
        .map(|(i, text)| {
            let w = measure.width(&text, font_size);
            let x = match align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (width - w) * 0.5,
                TextAlign::Right => width - w,
            };
            PlacedLine {
                text,
                x,
                top: i as f64 * spacing,
                width: w,
            }
        })
        .collect();

    TextBlock {
        lines,
        total,
        font_size,
        spacing,
    }
}

/// Solid rectangles standing in for the glyphs of `text` when no font is loaded.
pub fn block_glyph_rects(text: &str, x: f64, top: f64, font_size: f64, advance: f64) -> Vec<Rect> {
    text.chars()
        .enumerate()
        .filter(|(_, ch)| !ch.is_whitespace())
        .map(|(i, _)| {
            Rect::new(
                x + i as f64 * advance + advance * 0.1,
                top + font_size * 0.25,
                advance * 0.8,
                font_size * 0.65,
            )
        })
        .collect()
}

/// Measures and paints lines with a loaded font, or with glyph blocks when there is none.
pub struct TextPainter {
    shaper: Option<(ParleyMeasure, vello_cpu::peniko::FontData)>,
    blocks: FixedAdvance,
}

impl TextPainter {
    pub fn new(font: Option<&FontFace>) -> LayoutResult<Self> {
        let shaper = match font {
            Some(face) => Some((ParleyMeasure::new(face)?, face.to_font_data())),
            None => None,
        };
        Ok(Self {
            shaper,
            blocks: FixedAdvance::default(),
        })
    }

    pub fn has_font(&self) -> bool {
        self.shaper.is_some()
    }

    /// Paint one placed line; `base` maps text-box coordinates to the surface.
    pub fn fill_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        base: kurbo::Affine,
        line: &PlacedLine,
        font_size: f64,
        color: Rgba8,
    ) {
        ctx.set_paint(color_to_cpu(color));
        match &mut self.shaper {
            Some((shaper, font)) => {
                let shaped = shaper.shape(&line.text, font_size);
                ctx.set_transform(affine_to_cpu(
                    base * kurbo::Affine::translate((line.x, line.top)),
                ));
                let glyphs = shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(font_size as f32)
                    .fill_glyphs(glyphs);
            }
            None => {
                ctx.set_transform(affine_to_cpu(base));
                let advance = font_size * self.blocks.em_advance;
                for r in block_glyph_rects(&line.text, line.x, line.top, font_size, advance) {
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(r.x, r.y, r.right(), r.bottom()));
                }
            }
        }
    }
}

impl TextMeasure for TextPainter {
    fn width(&mut self, text: &str, font_size: f64) -> f64 {
        match &mut self.shaper {
            Some((shaper, _)) => shaper.width(text, font_size),
            None => self.blocks.width(text, font_size),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text_paint.rs"]
mod tests;
