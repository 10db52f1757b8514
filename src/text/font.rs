use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{LayoutError, LayoutResult};

/// A font loaded once and shared by measurement and painting.
#[derive(Clone)]
pub struct FontFace {
    bytes: Arc<Vec<u8>>,
    family: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl FontFace {
    /// Register raw TTF/OTF bytes and read the family name they declare.
    pub fn from_bytes(bytes: Vec<u8>) -> LayoutResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| LayoutError::validation("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LayoutError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            bytes: Arc::new(bytes),
            family,
        })
    }

    /// Read and register a font file.
    pub fn from_path(path: &Path) -> LayoutResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font {}", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Family name declared by the font.
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Font handle for the raster backend.
    pub fn to_font_data(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.bytes.as_ref().clone()),
            0,
        )
    }
}
