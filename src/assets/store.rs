use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, decode_image, parse_data_url},
    foundation::error::{LayoutError, LayoutResult},
    layout::model::{ElementKind, PageLayout},
};

/// Where an image reference points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline `data:` URL.
    Data,
    /// Local file, resolved against the asset root when relative.
    File(PathBuf),
    /// Network URL; never fetched.
    Remote,
}

/// Normalize a relative asset path: `/` separators, no `.` segments, no `..` traversal.
pub fn normalize_rel_path(source: &str) -> LayoutResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(LayoutError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(LayoutError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(LayoutError::validation(
            "asset path must contain a file name",
        ));
    }
    Ok(out.join("/"))
}

/// Classify a reference and resolve file paths against `root`.
pub fn resolve_source(reference: &str, root: &Path) -> LayoutResult<ImageSource> {
    let r = reference.trim();
    if r.starts_with("data:") {
        return Ok(ImageSource::Data);
    }
    if r.starts_with("http://") || r.starts_with("https://") {
        return Ok(ImageSource::Remote);
    }
    let r = r.strip_prefix("file://").unwrap_or(r);
    let p = Path::new(r);
    if p.is_absolute() {
        return Ok(ImageSource::File(p.to_path_buf()));
    }
    Ok(ImageSource::File(root.join(normalize_rel_path(r)?)))
}

/// Decode one image reference (data URL or local path).
pub fn load_image(reference: &str, root: &Path) -> LayoutResult<PreparedImage> {
    match resolve_source(reference, root)? {
        ImageSource::Data => {
            let url = parse_data_url(reference)
                .ok_or_else(|| LayoutError::decode("malformed data url"))?;
            decode_image(&url.bytes)
        }
        ImageSource::File(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read image {}", path.display()))?;
            decode_image(&bytes)
        }
        ImageSource::Remote => Err(LayoutError::validation(
            "remote image urls are not fetched",
        )),
    }
}

/// Decoded images keyed by the reference string used in layouts.
///
/// All IO and decoding happens up front in [`ImageStore::prepare`]; renderers only read.
#[derive(Clone, Debug, Default)]
pub struct ImageStore {
    images: HashMap<String, PreparedImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every reference; failures are logged and skipped.
    pub fn prepare<'a>(urls: impl IntoIterator<Item = &'a str>, root: &Path) -> Self {
        let mut store = Self::new();
        for url in urls {
            if store.images.contains_key(url) {
                continue;
            }
            match load_image(url, root) {
                Ok(img) => {
                    store.images.insert(url.to_string(), img);
                }
                Err(err) => {
                    tracing::warn!(url = %short_ref(url), error = %err, "skipping image");
                }
            }
        }
        store
    }

    /// Load every image a layout references.
    pub fn for_layout(layout: &PageLayout, root: &Path) -> Self {
        Self::prepare(image_urls(layout), root)
    }

    pub fn insert(&mut self, url: impl Into<String>, image: PreparedImage) {
        self.images.insert(url.into(), image);
    }

    pub fn get(&self, url: &str) -> Option<&PreparedImage> {
        self.images.get(url)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Image references of a layout, in element order.
pub fn image_urls(layout: &PageLayout) -> impl Iterator<Item = &str> {
    layout.elements.iter().filter_map(|e| match &e.kind {
        ElementKind::Image { url } => Some(url.as_str()),
        _ => None,
    })
}

// Data URLs are long; log only their header.
fn short_ref(url: &str) -> &str {
    match url.find(',') {
        Some(i) if url.starts_with("data:") => &url[..i],
        _ => url,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
