//! Us & Then page layout engine.
//!
//! Turns story-page metadata (narration, illustration, shot, emotion) into deterministic,
//! print-ready page layouts, and composites two-panel spreads for export:
//!
//! - Build a [`PageRequest`] (or read loose JSON into [`PageContent`])
//! - Generate a [`PageLayout`] with a [`LayoutEngine`]
//! - Rasterise it with a [`CanvasRenderer`], or compose a spread with [`SpreadCompositor`]
#![forbid(unsafe_code)]

mod foundation;

/// Loose page metadata validated into fixed fields.
pub mod content;
/// Spread compositing and inpaint masks.
pub mod compose;
/// Configuration loading.
pub mod config;
/// Image decoding and the prepared image store.
pub mod assets;
/// Layout generation.
pub mod layout;
/// Canvas renderers.
pub mod render;
/// Text measurement, fonts and wrapping.
pub mod text;

pub use crate::foundation::core::{PrintFormat, Rect, Rgba8};
pub use crate::foundation::error::{LayoutError, LayoutResult};
pub use crate::foundation::rng::{SeededRng, page_seed, seed_from_key};

pub use crate::assets::decode::{PreparedImage, decode_image, parse_data_url, png_data_url};
pub use crate::assets::store::ImageStore;
pub use crate::compose::mask::text_protect_mask;
pub use crate::compose::spread::{
    CharacterImage, CharacterPosition, CompositionResult, SpreadCompositor, SpreadInput,
    SpreadTypography,
};
pub use crate::config::Config;
pub use crate::content::page::PageContent;
pub use crate::layout::book::BookLayouts;
pub use crate::layout::diagnostics::{colliding_pairs, has_collision, safe_area_violations};
pub use crate::layout::engine::{LayoutEngine, PageRequest, generate_layout};
pub use crate::layout::frames::{Frames, compute_frames};
pub use crate::layout::model::{
    DebugInfo, ElementKind, LayoutElement, PageLayout, ShapeMask, TextAlign, TextStyle,
};
pub use crate::layout::policy::{LayoutMode, choose_mode, scale_for, scale_for_descriptor};
pub use crate::layout::shot::{CanonShot, canonicalize};
pub use crate::render::{
    CanvasRenderer, FrameRGBA, RenderSettings, RendererKind, create_renderer,
};
pub use crate::text::font::FontFace;
pub use crate::text::measure::{FixedAdvance, ParleyMeasure, TextMeasure};
pub use crate::text::wrap::wrap_words;
