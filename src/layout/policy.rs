//! Pure decision tables: layout mode, character scale, and narration typography.

use crate::layout::shot::CanonShot;

/// Pages with at most this many words may go full-bleed on wide/low shots.
pub const FULL_BLEED_MAX_WORDS: usize = 14;
/// Medium pages with more than this many words switch to the text-dominant layout.
pub const TEXT_HEAVY_MIN_WORDS: usize = 16;
/// Character scale used when a shot descriptor cannot be resolved.
pub const DEFAULT_CHARACTER_SCALE: f64 = 0.5;
/// Narration colour for pages with no (or an unknown) emotion tag.
pub const DEFAULT_TEXT_COLOR: &str = "#2D2A26";

/// Page composition selected for one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LayoutMode {
    /// Image-dominant: image left, text right.
    #[serde(rename = "image70")]
    Image70,
    /// Text-dominant: text left, image right.
    #[serde(rename = "text70")]
    Text70,
    /// Image covers the whole canvas.
    #[serde(rename = "fullBleed")]
    FullBleed,
    /// Large image above a text band.
    #[serde(rename = "closeup")]
    Closeup,
    /// Two-panel spread; panel splitting happens in the spread compositor.
    #[serde(rename = "spread")]
    Spread,
}

impl LayoutMode {
    /// Every layout mode.
    pub const ALL: [LayoutMode; 5] = [
        LayoutMode::Image70,
        LayoutMode::Text70,
        LayoutMode::FullBleed,
        LayoutMode::Closeup,
        LayoutMode::Spread,
    ];

    /// Stable identifier, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::Image70 => "image70",
            LayoutMode::Text70 => "text70",
            LayoutMode::FullBleed => "fullBleed",
            LayoutMode::Closeup => "closeup",
            LayoutMode::Spread => "spread",
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Choose a layout mode from the canonical shot and narration length. First match wins.
pub fn choose_mode(shot: CanonShot, word_count: usize) -> LayoutMode {
    match shot {
        CanonShot::Birdseye => LayoutMode::Image70,
        CanonShot::Closeup => LayoutMode::Closeup,
        CanonShot::Low | CanonShot::Wide => {
            if word_count <= FULL_BLEED_MAX_WORDS {
                LayoutMode::FullBleed
            } else {
                LayoutMode::Image70
            }
        }
        CanonShot::Medium => {
            if word_count > TEXT_HEAVY_MIN_WORDS {
                LayoutMode::Text70
            } else {
                LayoutMode::Image70
            }
        }
    }
}

/// Fraction of the image frame the subject should occupy for a shot.
pub fn scale_for(shot: CanonShot) -> f64 {
    match shot {
        CanonShot::Closeup => 0.9,
        CanonShot::Birdseye => 0.25,
        CanonShot::Wide => 0.3,
        CanonShot::Medium => 0.55,
        CanonShot::Low => 0.6,
    }
}

/// Scale for a raw descriptor; unresolvable descriptors get [`DEFAULT_CHARACTER_SCALE`].
pub fn scale_for_descriptor(raw: Option<&str>) -> f64 {
    raw.and_then(crate::layout::shot::try_canonicalize)
        .map(scale_for)
        .unwrap_or(DEFAULT_CHARACTER_SCALE)
}

/// Narration font size in points; shorter captions get larger type (42..=56).
pub fn font_size_for_words(word_count: usize) -> f64 {
    match word_count {
        0..=6 => 56.0,
        7..=10 => 52.0,
        11..=16 => 48.0,
        17..=24 => 44.0,
        _ => 42.0,
    }
}

/// Narration colour for an emotion tag (case-insensitive, with synonyms).
pub fn emotion_color(emotion: Option<&str>) -> &'static str {
    let Some(emotion) = emotion else {
        return DEFAULT_TEXT_COLOR;
    };
    match emotion.trim().to_lowercase().as_str() {
        "happy" | "joy" | "joyful" => "#D9480F",
        "calm" | "peaceful" => "#1971C2",
        "excited" => "#E8590C",
        "sleepy" | "tired" => "#5F3DC4",
        "curious" | "wonder" => "#0B7285",
        "love" | "loving" => "#C2255C",
        "silly" | "playful" => "#2B8A3E",
        "proud" => "#E67700",
        "sad" => "#364FC7",
        other => {
            if !other.is_empty() {
                tracing::debug!(emotion = other, "unknown emotion, using default colour");
            }
            DEFAULT_TEXT_COLOR
        }
    }
}

/// Whitespace-separated word count.
pub fn word_count(narration: &str) -> usize {
    narration.split_whitespace().count()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/policy.rs"]
mod tests;
