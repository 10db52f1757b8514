/// Canonical camera framing used by every layout decision.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CanonShot {
    /// Establishing / long shot.
    Wide,
    /// Waist-up framing; the default.
    #[default]
    Medium,
    /// Face-filling framing.
    Closeup,
    /// Overhead view.
    Birdseye,
    /// Camera below the subject looking up.
    Low,
}

impl CanonShot {
    /// Every canonical shot, in declaration order.
    pub const ALL: [CanonShot; 5] = [
        CanonShot::Wide,
        CanonShot::Medium,
        CanonShot::Closeup,
        CanonShot::Birdseye,
        CanonShot::Low,
    ];

    /// Stable lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            CanonShot::Wide => "wide",
            CanonShot::Medium => "medium",
            CanonShot::Closeup => "closeup",
            CanonShot::Birdseye => "birdseye",
            CanonShot::Low => "low",
        }
    }
}

impl std::fmt::Display for CanonShot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a free-form shot descriptor.
///
/// Lower-cases, trims, turns `_` and `-` into spaces and collapses runs of whitespace, then
/// looks the result up in a fixed synonym table. Anything unrecognized, and `None`, yields
/// `fallback`.
pub fn canonicalize(raw: Option<&str>, fallback: CanonShot) -> CanonShot {
    let Some(raw) = raw else {
        return fallback;
    };
    match try_canonicalize(raw) {
        Some(shot) => shot,
        None => {
            if !raw.trim().is_empty() {
                tracing::debug!(shot = raw, fallback = %fallback, "unrecognized shot");
            }
            fallback
        }
    }
}

/// Synonym-table lookup without a fallback.
pub fn try_canonicalize(raw: &str) -> Option<CanonShot> {
    let lowered = raw.trim().to_lowercase().replace(['_', '-'], " ");
    let norm = lowered.split_whitespace().collect::<Vec<_>>().join(" ");

    match norm.as_str() {
        "wide" | "wide shot" | "long shot" | "full shot" | "establishing"
        | "establishing shot" => Some(CanonShot::Wide),
        "medium" | "medium shot" | "mid" | "mid shot" => Some(CanonShot::Medium),
        "closeup" | "close up" | "close" | "close up shot" | "closeup shot"
        | "extreme close up" => Some(CanonShot::Closeup),
        "birdseye" | "bird's eye" | "birds eye" | "bird eye" | "bird's eye view"
        | "birdseye view" | "overhead" | "top down" | "aerial" => Some(CanonShot::Birdseye),
        "low" | "low angle" | "low angle shot" | "worm's eye" | "worms eye" => {
            Some(CanonShot::Low)
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/shot.rs"]
mod tests;
