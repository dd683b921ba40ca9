//! Glyph outlines as tiny-skia paths.
//!
//! Outlines are emitted in font design units (y-up); `glyph_transform` maps
//! them onto the y-down pixmap at a given pen position.

use tiny_skia::{Path, PathBuilder, Transform};

/// Collects ttf-parser outline commands into a tiny-skia path.
pub struct GlyphOutlineBuilder {
    builder: PathBuilder,
    verbs: usize,
}

impl GlyphOutlineBuilder {
    pub fn new() -> Self {
        Self {
            builder: PathBuilder::new(),
            verbs: 0,
        }
    }

    pub fn verb_count(&self) -> usize {
        self.verbs
    }

    pub fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

impl Default for GlyphOutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ttf_parser::OutlineBuilder for GlyphOutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.verbs += 1;
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.verbs += 1;
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.verbs += 1;
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.verbs += 1;
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.verbs += 1;
        self.builder.close();
    }
}

/// Outline of one glyph, or `None` for blank glyphs such as spaces.
pub fn build_glyph_path(face: &ttf_parser::Face<'_>, glyph: ttf_parser::GlyphId) -> Option<Path> {
    let mut builder = GlyphOutlineBuilder::new();
    face.outline_glyph(glyph, &mut builder)?;
    builder.finish()
}

/// Scales design units to pixels, flips the y axis and moves the origin to
/// the pen position `(x, baseline)`.
#[inline]
pub fn glyph_transform(scale: f32, x: f32, baseline: f32) -> Transform {
    Transform::from_row(scale, 0.0, 0.0, -scale, x, baseline)
}
