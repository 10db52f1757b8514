//! Advisory checks over a candidate element list. They flag problems; they never fail.

use crate::{
    foundation::core::Rect,
    layout::model::{DebugInfo, LayoutElement, NARRATION_ID, TEXT_PLAQUE_ID},
};

const EDGE_EPS: f64 = 1e-6;

/// Side of a bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
}

impl Edge {
    /// Lowercase name used in violation reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        }
    }
}

/// Pairs that overlap on purpose (the plaque sits under the narration).
pub fn is_expected_overlap(a: &LayoutElement, b: &LayoutElement) -> bool {
    matches!(
        (a.id.as_str(), b.id.as_str()),
        (TEXT_PLAQUE_ID, NARRATION_ID) | (NARRATION_ID, TEXT_PLAQUE_ID)
    )
}

/// Every unordered pair of element ids whose bounding boxes overlap.
pub fn colliding_pairs(elements: &[LayoutElement]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for (i, a) in elements.iter().enumerate() {
        for b in &elements[i + 1..] {
            if is_expected_overlap(a, b) {
                continue;
            }
            if a.bounds().intersects(&b.bounds()) {
                out.push((a.id.clone(), b.id.clone()));
            }
        }
    }
    out
}

/// Whether any pair (other than plaque + narration) overlaps.
pub fn has_collision(elements: &[LayoutElement]) -> bool {
    !colliding_pairs(elements).is_empty()
}

/// Edges of `bounds` lying outside `safe`, in left/right/top/bottom order.
pub fn violated_edges(bounds: &Rect, safe: &Rect) -> Vec<Edge> {
    let mut edges = Vec::new();
    if bounds.x < safe.x - EDGE_EPS {
        edges.push(Edge::Left);
    }
    if bounds.right() > safe.right() + EDGE_EPS {
        edges.push(Edge::Right);
    }
    if bounds.y < safe.y - EDGE_EPS {
        edges.push(Edge::Top);
    }
    if bounds.bottom() > safe.bottom() + EDGE_EPS {
        edges.push(Edge::Bottom);
    }
    edges
}

/// One `"<elementId>: <edges>"` entry per element leaving the safe area.
pub fn safe_area_violations(elements: &[LayoutElement], safe: &Rect) -> Vec<String> {
    elements
        .iter()
        .filter_map(|e| {
            let edges = violated_edges(&e.bounds(), safe);
            if edges.is_empty() {
                return None;
            }
            let names = edges.iter().map(|e| e.as_str()).collect::<Vec<_>>();
            Some(format!("{}: {}", e.id, names.join(", ")))
        })
        .collect()
}

/// Run every check and bundle the results.
pub fn diagnose(elements: &[LayoutElement], safe: &Rect) -> DebugInfo {
    DebugInfo {
        collision_checks: has_collision(elements),
        safe_area_violations: safe_area_violations(elements, safe),
        degenerate: elements.is_empty(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/diagnostics.rs"]
mod tests;
