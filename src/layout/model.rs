use crate::{
    foundation::core::{PrintFormat, Rect},
    foundation::error::LayoutResult,
    layout::{policy::LayoutMode, shot::CanonShot},
};

/// Element id of the illustration.
pub const MAIN_IMAGE_ID: &str = "main_image";
/// Element id of the narration text.
pub const NARRATION_ID: &str = "narration";
/// Element id of the translucent plaque behind the narration.
pub const TEXT_PLAQUE_ID: &str = "text_plaque";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One positioned visual primitive.
///
/// Geometry is center-anchored: the bounding box is
/// `[x - width/2, x + width/2] x [y - height/2, y + height/2]`.
pub struct LayoutElement {
    /// Identifier, unique within a page.
    pub id: String,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Rotation about the center, in degrees.
    pub rotation: f64,
    /// Paint order; lower paints first.
    pub z_index: i32,
    /// Type-specific payload.
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl LayoutElement {
    /// Axis-aligned bounding box (rotation is not applied).
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.x, self.y, self.width, self.height)
    }

    /// Short type name: `image`, `text` or `shape`.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ElementKind::Image { .. } => "image",
            ElementKind::Text { .. } => "text",
            ElementKind::Shape { .. } => "shape",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
/// Closed set of element payloads.
pub enum ElementKind {
    /// Illustration reference; opaque to the layout engine.
    Image {
        /// URL or data URL.
        url: String,
    },
    /// Narration text.
    Text {
        /// Text to render.
        content: String,
        /// Typography.
        style: TextStyle,
    },
    /// Decorative overlay shape.
    Shape {
        /// Shape outline.
        mask: ShapeMask,
        /// Fill colour as `#RRGGBB[AA]`.
        fill: String,
        /// Corner radius for rounded shapes.
        #[serde(default, rename = "cornerRadius")]
        corner_radius: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Outline of a shape element.
pub enum ShapeMask {
    /// Plain rectangle.
    Rect,
    /// Rectangle with rounded corners.
    RoundedRect,
    /// Ellipse inscribed in the bounds.
    Ellipse,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Horizontal text alignment.
pub enum TextAlign {
    /// Flush left.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Flush right.
    Right,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Drop shadow behind text.
pub struct TextShadow {
    /// Shadow colour.
    pub color: String,
    /// Blur radius in pixels.
    pub blur: f64,
    /// Horizontal offset.
    pub offset_x: f64,
    /// Vertical offset.
    pub offset_y: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Sizing and placement contract a text renderer must honour.
pub struct TextStyle {
    /// Requested font family; renderers may substitute.
    pub font_family: String,
    /// Font size in points (1pt = 1px on the layout canvas).
    pub font_size: f64,
    /// Horizontal alignment within the element box.
    pub align: TextAlign,
    /// Text colour as `#RRGGBB[AA]`.
    pub color: String,
    /// Line spacing as a multiple of the font size.
    pub line_height: f64,
    /// Optional box fill behind the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Inner padding in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    /// Optional drop shadow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<TextShadow>,
    /// Extra advance between glyphs in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Advisory diagnostics; never affects rendering.
pub struct DebugInfo {
    /// True when any two elements (other than plaque + narration) overlap.
    pub collision_checks: bool,
    /// `"<elementId>: <edges>"` for every element leaving the safe area.
    pub safe_area_violations: Vec<String>,
    /// True when the page has no elements at all.
    #[serde(default)]
    pub degenerate: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Complete layout for one page.
pub struct PageLayout {
    /// Print geometry the layout was computed for.
    pub canvas: PrintFormat,
    /// Elements sorted by ascending `z_index`.
    pub elements: Vec<LayoutElement>,
    /// Canvas inset by the safe margin.
    pub safe_area: Rect,
    /// Canvas grown by the bleed.
    pub bleed_area: Rect,
    /// Binding strip.
    pub gutter_area: Rect,
    /// Seed derived from `"<bookId>-<pageNumber>"`.
    pub seed: u32,
    /// Template name, for provenance.
    pub template: String,
    /// Canonical shot used.
    pub shot: CanonShot,
    /// Layout mode used.
    pub mode: LayoutMode,
    /// Action id, for provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    /// Emotion tag, for provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    /// Diagnostics.
    pub debug: DebugInfo,
}

impl PageLayout {
    /// Lookup an element by id.
    pub fn element(&self, id: &str) -> Option<&LayoutElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Parse a layout from JSON.
    pub fn from_json(s: &str) -> LayoutResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_pretty(&self) -> LayoutResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/model.rs"]
mod tests;
