use crate::{
    foundation::core::{PrintFormat, Rect},
    foundation::error::LayoutResult,
    foundation::rng::{SeededRng, page_seed},
    layout::diagnostics::diagnose,
    layout::frames::{caption_overlay_frame, compute_frames},
    layout::model::{
        ElementKind, LayoutElement, MAIN_IMAGE_ID, NARRATION_ID, PageLayout, ShapeMask,
        TEXT_PLAQUE_ID, TextAlign, TextStyle,
    },
    layout::policy::{
        LayoutMode, choose_mode, emotion_color, font_size_for_words, scale_for, word_count,
    },
    layout::shot::{CanonShot, canonicalize},
};

/// Maximum image position jitter in pixels.
pub const IMAGE_JITTER_PX: f64 = 10.0;
/// Maximum image rotation jitter in degrees.
pub const IMAGE_JITTER_DEG: f64 = 1.0;
/// Maximum text position jitter in pixels.
pub const TEXT_JITTER_PX: f64 = 5.0;
/// Maximum text rotation jitter in degrees.
pub const TEXT_JITTER_DEG: f64 = 0.5;
/// Space between the plaque edge and the narration box.
pub const PLAQUE_PADDING: f64 = 24.0;
/// Plaque corner radius.
pub const PLAQUE_RADIUS: f64 = 32.0;
/// Plaque fill: white at ~82% opacity.
pub const PLAQUE_FILL: &str = "#FFFFFFD1";
/// Requested narration font family.
pub const NARRATION_FONT_FAMILY: &str = "Andika";
/// Narration line spacing multiple.
pub const NARRATION_LINE_HEIGHT: f64 = 1.3;

const PLAQUE_Z: i32 = 1;
const IMAGE_Z: i32 = 2;
const TEXT_Z: i32 = 3;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Inputs for one page layout.
pub struct PageRequest {
    /// Book identifier (seed key part).
    pub book_id: String,
    /// Page number (seed key part).
    pub page_number: u32,
    /// Template name, carried through for provenance.
    pub template: String,
    /// Narration text; empty or whitespace counts as absent.
    pub narration: Option<String>,
    /// Illustration URL or data URL; empty counts as absent.
    pub illustration_url: Option<String>,
    /// Illustration aspect ratio (width / height); square when absent.
    pub image_aspect: Option<f64>,
    /// Free-form shot descriptor.
    pub shot: Option<String>,
    /// Action identifier, for provenance.
    pub action_id: Option<String>,
    /// Emotion tag driving narration colour.
    pub emotion: Option<String>,
    /// Forces a layout mode instead of the shot/word-count decision.
    pub mode_override: Option<LayoutMode>,
}

impl PageRequest {
    /// Request for one page of one book with no content yet.
    pub fn new(book_id: impl Into<String>, page_number: u32) -> Self {
        Self {
            book_id: book_id.into(),
            page_number,
            ..Self::default()
        }
    }

    /// Set the template name.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Set the narration.
    pub fn narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }

    /// Set the illustration reference.
    pub fn illustration(mut self, url: impl Into<String>) -> Self {
        self.illustration_url = Some(url.into());
        self
    }

    /// Set the illustration aspect ratio.
    pub fn aspect(mut self, aspect: f64) -> Self {
        self.image_aspect = Some(aspect);
        self
    }

    /// Set the shot descriptor.
    pub fn shot(mut self, shot: impl Into<String>) -> Self {
        self.shot = Some(shot.into());
        self
    }

    /// Set the action id.
    pub fn action_id(mut self, action_id: impl Into<String>) -> Self {
        self.action_id = Some(action_id.into());
        self
    }

    /// Set the emotion tag.
    pub fn emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    /// Force a layout mode.
    pub fn mode(mut self, mode: LayoutMode) -> Self {
        self.mode_override = Some(mode);
        self
    }
}

/// Stateless page layout generator for one print format.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    format: PrintFormat,
}

impl LayoutEngine {
    /// Build an engine after validating the print format.
    pub fn new(format: PrintFormat) -> LayoutResult<Self> {
        format.validate()?;
        Ok(Self { format })
    }

    /// Print format used for every page.
    pub fn format(&self) -> &PrintFormat {
        &self.format
    }

    /// Compute the layout for one page.
    ///
    /// Never fails: missing narration or illustration simply yields fewer elements. Repeated
    /// calls with the same request return identical layouts.
    #[tracing::instrument(skip(self, req), fields(book = %req.book_id, page = req.page_number))]
    pub fn generate(&self, req: &PageRequest) -> PageLayout {
        let narration = non_blank(req.narration.as_deref());
        let url = non_blank(req.illustration_url.as_deref());

        let shot = canonicalize(req.shot.as_deref(), CanonShot::Medium);
        let words = narration.map(word_count).unwrap_or(0);
        let mode = req
            .mode_override
            .unwrap_or_else(|| choose_mode(shot, words));
        let frames = compute_frames(&self.format, mode, req.image_aspect.unwrap_or(1.0));

        let seed = page_seed(&req.book_id, req.page_number);
        let mut rng = SeededRng::new(seed);
        let image_jitter = Jitter::draw(&mut rng, IMAGE_JITTER_PX, IMAGE_JITTER_DEG);
        let text_jitter = Jitter::draw(&mut rng, TEXT_JITTER_PX, TEXT_JITTER_DEG);

        let mut elements = Vec::with_capacity(3);

        if let Some(url) = url {
            let frame = frames.image_frame;
            let scale = scale_for(shot);
            elements.push(LayoutElement {
                id: MAIN_IMAGE_ID.to_string(),
                x: frame.center_x() + image_jitter.dx,
                y: frame.center_y() + image_jitter.dy,
                width: frame.width * scale,
                height: frame.height * scale,
                rotation: image_jitter.rotation,
                z_index: IMAGE_Z,
                kind: ElementKind::Image {
                    url: url.to_string(),
                },
            });
        }

        let text_frame = match (frames.text_frame, mode) {
            (Some(f), _) => Some(f),
            (None, LayoutMode::FullBleed) => Some(caption_overlay_frame(&self.format)),
            (None, _) => None,
        };
        if let (Some(text), Some(frame)) = (narration, text_frame) {
            let frame = clear_gutter(frame, &self.format).unwrap_or(frame);
            elements.push(LayoutElement {
                id: TEXT_PLAQUE_ID.to_string(),
                x: frame.center_x(),
                y: frame.center_y(),
                width: frame.width,
                height: frame.height,
                rotation: 0.0,
                z_index: PLAQUE_Z,
                kind: ElementKind::Shape {
                    mask: ShapeMask::RoundedRect,
                    fill: PLAQUE_FILL.to_string(),
                    corner_radius: PLAQUE_RADIUS,
                },
            });

            let inner = frame.inset(PLAQUE_PADDING);
            elements.push(LayoutElement {
                id: NARRATION_ID.to_string(),
                x: inner.center_x() + text_jitter.dx,
                y: inner.center_y() + text_jitter.dy,
                width: inner.width,
                height: inner.height,
                rotation: text_jitter.rotation,
                z_index: TEXT_Z,
                kind: ElementKind::Text {
                    content: text.to_string(),
                    style: narration_style(words, req.emotion.as_deref()),
                },
            });
        }

        let repaired = repair_gutter(&mut elements, &self.format);
        if repaired > 0 {
            tracing::debug!(repaired, "moved elements off the gutter");
        }
        elements.sort_by_key(|e| e.z_index);

        let debug = diagnose(&elements, &frames.safe_rect);
        if debug.degenerate {
            tracing::debug!("page has neither narration nor illustration");
        }

        PageLayout {
            canvas: self.format,
            elements,
            safe_area: frames.safe_rect,
            bleed_area: self.format.bleed_rect(),
            gutter_area: frames.gutter_rect,
            seed,
            template: if req.template.trim().is_empty() {
                "default".to_string()
            } else {
                req.template.clone()
            },
            shot,
            mode,
            action_id: req.action_id.clone(),
            emotion: req.emotion.clone(),
            debug,
        }
    }
}

/// Lay out one page with the default print format.
pub fn generate_layout(req: &PageRequest) -> PageLayout {
    LayoutEngine::default().generate(req)
}

#[derive(Clone, Copy, Debug)]
struct Jitter {
    dx: f64,
    dy: f64,
    rotation: f64,
}

impl Jitter {
    fn draw(rng: &mut SeededRng, px: f64, deg: f64) -> Self {
        Self {
            dx: rng.jitter(px),
            dy: rng.jitter(px),
            rotation: rng.jitter(deg),
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn narration_style(words: usize, emotion: Option<&str>) -> TextStyle {
    TextStyle {
        font_family: NARRATION_FONT_FAMILY.to_string(),
        font_size: font_size_for_words(words),
        align: TextAlign::Center,
        color: emotion_color(emotion).to_string(),
        line_height: NARRATION_LINE_HEIGHT,
        background_color: None,
        padding: None,
        shadow: None,
        letter_spacing: None,
    }
}

// Edges within this distance of the gutter count as touching, not straddling.
const GUTTER_TOUCH_EPS: f64 = 1e-6;

/// Move a rect that straddles the gutter to the side needing the smaller shift (ties go
/// right), then clamp it into that side's safe half, narrowing it when it cannot fit.
///
/// Only the x axis is touched. Returns `None` when the rect does not straddle the gutter.
pub fn clear_gutter(rect: Rect, format: &PrintFormat) -> Option<Rect> {
    let gutter = format.gutter_rect();
    let safe = format.safe_rect();
    let straddles =
        rect.x < gutter.right() - GUTTER_TOUCH_EPS && rect.right() > gutter.x + GUTTER_TOUCH_EPS;
    if rect.width <= 0.0 || !straddles {
        return None;
    }

    let shift_left = rect.right() - gutter.x;
    let shift_right = gutter.right() - rect.x;
    let (lo, hi, x0) = if shift_left < shift_right {
        (safe.x, gutter.x, rect.x - shift_left)
    } else {
        (gutter.right(), safe.right(), rect.x + shift_right)
    };

    let width = rect.width.min(hi - lo);
    let x0 = x0.clamp(lo, hi - width);
    Some(Rect::new(x0, rect.y, width, rect.height))
}

/// Single non-iterating repair pass over the emitted elements. Returns how many moved.
///
/// Narrowed images keep their aspect ratio. The pass does not re-check collisions it may
/// introduce; those surface in the page diagnostics.
pub fn repair_gutter(elements: &mut [LayoutElement], format: &PrintFormat) -> usize {
    let mut moved = 0;
    for e in elements.iter_mut() {
        let before = e.bounds();
        let Some(after) = clear_gutter(before, format) else {
            continue;
        };
        if matches!(e.kind, ElementKind::Image { .. }) && after.width < before.width {
            e.height *= after.width / before.width;
        }
        e.width = after.width;
        e.x = after.center_x();
        moved += 1;
    }
    moved
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
