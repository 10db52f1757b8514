use std::{
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    compose::spread::SpreadTypography,
    foundation::core::PrintFormat,
    foundation::error::LayoutResult,
    text::font::FontFace,
};

/// Environment variable naming a font file; overrides `fontPath` from the config file.
pub const FONT_PATH_ENV: &str = "USANDTHEN_FONT_PATH";

/// Engine configuration: print product, spread typography and the narration font.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub format: PrintFormat,
    pub typography: SpreadTypography,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Config {
    /// Parse JSON; missing fields take their defaults.
    pub fn from_reader<R: Read>(reader: R) -> LayoutResult<Self> {
        let cfg: Self = serde_json::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> LayoutResult<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open config {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Read the file when given (defaults otherwise), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> LayoutResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    /// Apply overrides from a variable lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(p) = lookup(FONT_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(font_path = %p, "font path from environment");
            self.font_path = Some(PathBuf::from(p));
        }
    }

    pub fn validate(&self) -> LayoutResult<()> {
        self.format.validate()?;
        self.typography.validate()
    }

    /// Load the configured font, if any.
    pub fn load_font(&self) -> LayoutResult<Option<FontFace>> {
        self.font_path
            .as_deref()
            .map(FontFace::from_path)
            .transpose()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
