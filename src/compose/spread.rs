use crate::{
    assets::decode::{
        PreparedImage, decode_rgba_image, parse_data_url, png_data_url,
        unpremultiply_rgba8_in_place,
    },
    foundation::core::{PrintFormat, Rect, Rgba8},
    foundation::error::{LayoutError, LayoutResult},
    layout::model::TextAlign,
    render::{
        text_paint::{TextBlock, TextPainter, layout_text_block},
        vello::{affine_to_cpu, color_to_cpu, image_paint, surface_size},
    },
    text::font::FontFace,
};

/// Which panel holds the character image; narration goes in the other one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterPosition {
    #[default]
    Left,
    Right,
}

/// Fixed typography of the spread text panel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpreadTypography {
    pub font_family: String,
    pub font_size: f64,
    pub line_height: f64,
    /// Inset from the text panel's left, right and bottom edges.
    pub padding: f64,
    /// Distance from the panel top to the first line.
    pub first_line_offset: f64,
    pub text_color: String,
    pub background_color: String,
}

impl Default for SpreadTypography {
    fn default() -> Self {
        Self {
            font_family: "Andika".to_string(),
            font_size: 48.0,
            line_height: 1.4,
            padding: 80.0,
            first_line_offset: 120.0,
            text_color: "#2D2A26".to_string(),
            background_color: "#FFFFFF".to_string(),
        }
    }
}

impl SpreadTypography {
    pub fn validate(&self) -> LayoutResult<()> {
        let nums = [
            self.font_size,
            self.line_height,
            self.padding,
            self.first_line_offset,
        ];
        if nums.iter().any(|v| !v.is_finite() || *v < 0.0) || self.font_size <= 0.0 {
            return Err(LayoutError::validation(
                "typography sizes must be finite, font size > 0, the rest >= 0",
            ));
        }
        Ok(())
    }

    /// Text area inside a panel.
    pub fn text_area(&self, panel: &Rect) -> Rect {
        Rect::new(
            panel.x + self.padding,
            panel.y + self.first_line_offset,
            panel.width - 2.0 * self.padding,
            panel.height - self.first_line_offset - self.padding,
        )
    }
}

/// Character artwork for a spread.
#[derive(Clone, Debug)]
pub enum CharacterImage {
    /// Already decoded, straight alpha.
    Decoded(image::RgbaImage),
    /// `data:` URL holding an encoded image.
    DataUrl(String),
}

impl CharacterImage {
    fn decode(&self) -> LayoutResult<image::RgbaImage> {
        match self {
            CharacterImage::Decoded(img) => Ok(img.clone()),
            CharacterImage::DataUrl(url) => {
                let payload = parse_data_url(url)
                    .ok_or_else(|| LayoutError::decode("character image is not a data url"))?;
                decode_rgba_image(&payload.bytes)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct SpreadInput {
    pub character_image: CharacterImage,
    pub narration: String,
    pub character_position: CharacterPosition,
}

/// Output of [`SpreadCompositor::compose`].
#[derive(Clone, Debug)]
pub struct CompositionResult {
    /// Composited spread, straight alpha.
    pub image: image::RgbaImage,
    /// The same image as a PNG data URL.
    pub data_url: String,
    /// Where text was actually drawn. Zero height at the text origin when nothing was drawn.
    pub actual_text_bounds: Rect,
    pub character_panel: Rect,
    pub text_panel: Rect,
    /// Placement of the fitted character image.
    pub character_rect: Rect,
    pub lines_drawn: usize,
    pub lines_total: usize,
}

/// Geometry of a spread, computed before any pixels are touched.
#[derive(Clone, Debug, PartialEq)]
pub struct SpreadPlan {
    pub character_panel: Rect,
    pub text_panel: Rect,
    pub text_area: Rect,
    pub block: TextBlock,
    pub actual_text_bounds: Rect,
}

/// Two-panel compositor: character image on one half, wrapped narration on the other.
pub struct SpreadCompositor {
    width: u16,
    height: u16,
    typography: SpreadTypography,
    font: Option<FontFace>,
}

impl std::fmt::Debug for SpreadCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpreadCompositor")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("typography", &self.typography)
            .field("font", &self.font.as_ref().map(FontFace::family))
            .finish()
    }
}

impl SpreadCompositor {
    pub fn new(format: &PrintFormat, typography: SpreadTypography) -> LayoutResult<Self> {
        format.validate()?;
        typography.validate()?;
        let (width, height) = surface_size(format.width.round() as u32, format.height.round() as u32)?;
        Ok(Self {
            width,
            height,
            typography,
            font: None,
        })
    }

    /// Draw narration with a real font instead of glyph blocks.
    pub fn with_font(mut self, font: FontFace) -> Self {
        if font.family() != self.typography.font_family {
            tracing::debug!(
                requested = %self.typography.font_family,
                loaded = %font.family(),
                "using loaded font family"
            );
        }
        self.font = Some(font);
        self
    }

    pub fn typography(&self) -> &SpreadTypography {
        &self.typography
    }

    /// Left and right halves of the canvas.
    pub fn panels(&self) -> (Rect, Rect) {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let half = w * 0.5;
        (Rect::new(0.0, 0.0, half, h), Rect::new(half, 0.0, w - half, h))
    }

    /// Compute panels, wrapped lines and text bounds with the given painter's metrics.
    fn plan_with(
        &self,
        narration: &str,
        position: CharacterPosition,
        painter: &mut TextPainter,
    ) -> SpreadPlan {
        let (left, right) = self.panels();
        let (character_panel, text_panel) = match position {
            CharacterPosition::Left => (left, right),
            CharacterPosition::Right => (right, left),
        };
        let t = &self.typography;
        let text_area = t.text_area(&text_panel);
        let block = layout_text_block(
            narration,
            t.font_size,
            t.line_height,
            TextAlign::Center,
            text_area.width,
            text_area.height,
            painter,
        );
        let actual_text_bounds = Rect::new(text_area.x, text_area.y, text_area.width, block.height());

        SpreadPlan {
            character_panel,
            text_panel,
            text_area,
            block,
            actual_text_bounds,
        }
    }

    /// Geometry only; nothing is rasterised.
    pub fn plan(&self, narration: &str, position: CharacterPosition) -> LayoutResult<SpreadPlan> {
        let mut painter = TextPainter::new(self.font.as_ref())?;
        Ok(self.plan_with(narration, position, &mut painter))
    }

    /// Composite the spread.
    ///
    /// Narration that does not fit is truncated with a warning. Only an undecodable
    /// character image is an error.
    #[tracing::instrument(skip_all, fields(position = ?input.character_position))]
    pub fn compose(&self, input: &SpreadInput) -> LayoutResult<CompositionResult> {
        let character = input.character_image.decode()?;
        let mut painter = TextPainter::new(self.font.as_ref())?;
        let plan = self.plan_with(&input.narration, input.character_position, &mut painter);

        if plan.block.truncated() {
            tracing::warn!(
                drawn = plan.block.lines.len(),
                total = plan.block.total,
                "narration truncated"
            );
        }

        let character_rect = fit_within(character.width(), character.height(), &plan.character_panel);

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(Rgba8::parse_or(
            &self.typography.background_color,
            Rgba8::WHITE,
        )));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

        if character.width() > 0 && character.height() > 0 {
            let prepared = PreparedImage::from_rgba_image(&character);
            let paint = image_paint(&prepared)?;
            let s = character_rect.width / f64::from(character.width());
            ctx.set_transform(affine_to_cpu(
                kurbo::Affine::translate((character_rect.x, character_rect.y))
                    * kurbo::Affine::scale(s),
            ));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(character.width()),
                f64::from(character.height()),
            ));
        }

        let color = Rgba8::parse_or(&self.typography.text_color, Rgba8::BLACK);
        let origin = kurbo::Affine::translate((plan.text_area.x, plan.text_area.y));
        for line in &plan.block.lines {
            painter.fill_line(&mut ctx, origin, line, self.typography.font_size, color);
        }

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        let image = image::RgbaImage::from_raw(u32::from(self.width), u32::from(self.height), data)
            .ok_or_else(|| LayoutError::render("spread pixmap size mismatch"))?;
        let data_url = png_data_url(&image)?;

        Ok(CompositionResult {
            image,
            data_url,
            actual_text_bounds: plan.actual_text_bounds,
            character_panel: plan.character_panel,
            text_panel: plan.text_panel,
            character_rect,
            lines_drawn: plan.block.lines.len(),
            lines_total: plan.block.total,
        })
    }
}

/// Uniformly scale `w x h` to fit inside `panel`, centered. Never crops or stretches.
pub fn fit_within(w: u32, h: u32, panel: &Rect) -> Rect {
    if w == 0 || h == 0 {
        return Rect::new(panel.center_x(), panel.center_y(), 0.0, 0.0);
    }
    let (w, h) = (f64::from(w), f64::from(h));
    let s = (panel.width / w).min(panel.height / h);
    Rect::from_center(panel.center_x(), panel.center_y(), w * s, h * s)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/spread.rs"]
mod tests;
