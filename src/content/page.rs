use serde_json::Value;

use crate::{foundation::error::LayoutResult, layout::engine::PageRequest};

/// Story-page metadata validated into fixed fields.
///
/// Built leniently from loosely shaped JSON: a missing, blank, or non-string field is simply
/// absent. Nothing here ever fails on shape.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub page_number: Option<u32>,
    pub narration: Option<String>,
    pub illustration_url: Option<String>,
    pub shot: Option<String>,
    pub action_id: Option<String>,
    pub emotion: Option<String>,
    pub aspect_ratio: Option<f64>,
}

impl PageContent {
    /// Read known fields (with their aliases) from a JSON object.
    pub fn from_value(v: &Value) -> Self {
        Self {
            page_number: first_u32(v, &["pageNumber", "page"]),
            narration: first_string(v, &["narration", "text"]),
            illustration_url: first_string(v, &["illustrationUrl", "imageUrl"]),
            shot: first_string(v, &["shot", "shotType"]),
            action_id: first_string(v, &["actionId"]),
            emotion: first_string(v, &["emotion"]),
            aspect_ratio: first_f64(v, &["aspectRatio"]).filter(|a| a.is_finite() && *a > 0.0),
        }
    }

    /// Parse JSON text and read it leniently. Only malformed JSON is an error.
    pub fn from_json(s: &str) -> LayoutResult<Self> {
        let v: Value = serde_json::from_str(s)?;
        Ok(Self::from_value(&v))
    }

    /// Read one page or an array of pages. Array entries without a page number are
    /// numbered by position (1-based).
    pub fn many_from_value(v: &Value) -> Vec<Self> {
        match v {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let mut page = Self::from_value(item);
                    if page.page_number.is_none() {
                        page.page_number = u32::try_from(i + 1).ok();
                    }
                    page
                })
                .collect(),
            Value::Object(map) => match map.get("pages") {
                Some(pages @ Value::Array(_)) => Self::many_from_value(pages),
                _ => vec![Self::from_value(v)],
            },
            _ => {
                tracing::debug!("page content is neither an object nor an array");
                Vec::new()
            }
        }
    }

    /// Turn the content into a layout request for one page of a book.
    ///
    /// `page_number` is used when the content carries none.
    pub fn to_request(&self, book_id: &str, page_number: u32) -> PageRequest {
        PageRequest {
            book_id: book_id.to_string(),
            page_number: self.page_number.unwrap_or(page_number),
            template: String::new(),
            narration: self.narration.clone(),
            illustration_url: self.illustration_url.clone(),
            image_aspect: self.aspect_ratio,
            shot: self.shot.clone(),
            action_id: self.action_id.clone(),
            emotion: self.emotion.clone(),
            mode_override: None,
        }
    }
}

fn first_string(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match v.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::String(_) | Value::Null => None,
        other => {
            tracing::debug!(field = *k, kind = value_kind(other), "ignoring non-string field");
            None
        }
    })
}

fn first_f64(v: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| v.get(*k)?.as_f64())
}

fn first_u32(v: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter()
        .find_map(|k| v.get(*k)?.as_u64())
        .and_then(|n| u32::try_from(n).ok())
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/page.rs"]
mod tests;
