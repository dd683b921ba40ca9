//! TrueType fonts loaded with ttf-parser.

use std::path::Path;
use std::sync::Arc;

use cb_core::{Error, FontMetrics, FontRole, FontSet, Result};
use tracing::debug;

/// A font face at a fixed pixel size.
///
/// The raw file is kept and re-parsed on use; parsing only reads table
/// offsets.
#[derive(Clone)]
pub struct TtfFont {
    data: Arc<Vec<u8>>,
    size: f32,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
    line_gap: f32,
}

impl std::fmt::Debug for TtfFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFont")
            .field("size", &self.size)
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl TtfFont {
    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self> {
        if size.is_nan() || size <= 0.0 {
            return Err(Error::Render(format!("Invalid font size {}", size)));
        }
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| Error::Render(format!("Unreadable font: {}", e)))?;
        let units_per_em = face.units_per_em() as f32;
        let ascender = face.ascender() as f32;
        let descender = face.descender() as f32;
        let line_gap = face.line_gap() as f32;
        Ok(Self {
            data: Arc::new(data),
            size,
            units_per_em,
            ascender,
            descender,
            line_gap,
        })
    }

    pub fn load(path: &Path, size: f32) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| Error::Render(format!("Cannot read font {}: {}", path.display(), e)))?;
        let font = Self::from_bytes(data, size)?;
        debug!("Loaded font {} at {}px", path.display(), size);
        Ok(font)
    }

    /// Parses the face again. Construction already proved the data valid.
    pub fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, 0).ok()
    }

    /// Pixels per design unit.
    pub fn scale(&self) -> f32 {
        self.size / self.units_per_em
    }

    /// Distance from the top of a line to its baseline, in pixels.
    pub fn ascent(&self) -> f32 {
        self.ascender * self.scale()
    }

    /// Unrounded advance width of `text` in pixels.
    pub fn advance(&self, text: &str) -> f32 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        let units: f32 = text
            .chars()
            .map(|c| {
                face.glyph_index(c)
                    .and_then(|id| face.glyph_hor_advance(id))
                    .unwrap_or(0) as f32
            })
            .sum();
        units * self.scale()
    }
}

impl FontMetrics for TtfFont {
    fn measure(&self, text: &str) -> u32 {
        self.advance(text).round() as u32
    }

    fn line_height(&self) -> u32 {
        ((self.ascender - self.descender + self.line_gap) * self.scale()).ceil() as u32
    }
}

/// The three faces used for title, preface and body.
#[derive(Debug, Clone)]
pub struct TtfFontSet {
    pub title: TtfFont,
    pub preface: TtfFont,
    pub body: TtfFont,
}

impl TtfFontSet {
    pub fn new(title: TtfFont, preface: TtfFont, body: TtfFont) -> Self {
        Self { title, preface, body }
    }

    pub fn font(&self, role: FontRole) -> &TtfFont {
        match role {
            FontRole::Title => &self.title,
            FontRole::Preface => &self.preface,
            FontRole::Body => &self.body,
        }
    }
}

impl FontSet for TtfFontSet {
    fn metrics(&self, role: FontRole) -> &dyn FontMetrics {
        self.font(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_not_a_font() {
        let err = TtfFont::from_bytes(b"definitely not a font".to_vec(), 34.0).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(TtfFont::from_bytes(vec![], 0.0), Err(Error::Render(_))));
    }

    #[test]
    fn test_missing_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TtfFont::load(&dir.path().join("Roboto-Bold.ttf"), 44.0).unwrap_err();
        assert!(err.to_string().contains("Roboto-Bold.ttf"));
    }
}
