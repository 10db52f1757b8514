use crate::{
    foundation::error::{LayoutError, LayoutResult},
    text::font::FontFace,
};

/// Default advance of [`FixedAdvance`], as a fraction of the font size.
pub const DEFAULT_EM_ADVANCE: f64 = 0.55;

/// Measures the rendered width of a single line of text.
pub trait TextMeasure {
    /// Width in pixels of `text` set at `font_size` pixels.
    fn width(&mut self, text: &str, font_size: f64) -> f64;
}

/// Deterministic measurer that gives every character the same advance.
///
/// Used when no font is loaded, and by tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    /// Advance per character as a fraction of the font size.
    pub em_advance: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self {
            em_advance: DEFAULT_EM_ADVANCE,
        }
    }
}

impl FixedAdvance {
    pub fn new(em_advance: f64) -> Self {
        Self { em_advance }
    }
}

impl TextMeasure for FixedAdvance {
    fn width(&mut self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.em_advance
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Positioned glyph of a shaped line; `y` is the baseline offset from the line top.
pub struct ShapedGlyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// One line shaped with a real font.
pub struct ShapedLine {
    pub glyphs: Vec<ShapedGlyph>,
    /// Advance width in pixels.
    pub width: f64,
}

/// Measurer backed by parley shaping of a loaded font.
pub struct ParleyMeasure {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: String,
}

impl std::fmt::Debug for ParleyMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyMeasure")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl ParleyMeasure {
    pub fn new(face: &FontFace) -> LayoutResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes().to_vec()), None);
        if families.is_empty() {
            return Err(LayoutError::validation(
                "no font families registered from font bytes",
            ));
        }
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family: face.family().to_string(),
        })
    }

    fn layout(&mut self, text: &str, font_size: f64) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size as f32));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Shape one line into positioned glyphs.
    pub fn shape(&mut self, text: &str, font_size: f64) -> ShapedLine {
        let layout = self.layout(text, font_size);
        let mut out = ShapedLine::default();
        for line in layout.lines() {
            out.width = out.width.max(f64::from(line.metrics().advance));
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                out.glyphs.extend(run.glyphs().map(|g| ShapedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }
        out
    }
}

impl TextMeasure for ParleyMeasure {
    fn width(&mut self, text: &str, font_size: f64) -> f64 {
        self.layout(text, font_size)
            .lines()
            .map(|line| f64::from(line.metrics().advance))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
