use std::sync::Arc;

use cb_core::{Error, ImageLayout, Rasterizer, Result, Rgb, TextBlock};
use tiny_skia::{Color, FillRule, Paint, Pixmap, Rect, Transform};
use tracing::debug;

use crate::fonts::{TtfFont, TtfFontSet};
use crate::glyph_path::{build_glyph_path, glyph_transform};

fn color(rgb: Rgb) -> Color {
    Color::from_rgba8(rgb.0, rgb.1, rgb.2, 255)
}

fn solid(rgb: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgb));
    paint.anti_alias = true;
    paint
}

/// Allocates the canvas and paints the background and the highlight band
/// behind the title.
pub fn paint_background(layout: &ImageLayout) -> Result<Pixmap> {
    let mut pixmap = Pixmap::new(layout.width, layout.height).ok_or_else(|| {
        Error::Render(format!("Cannot allocate a {}x{} image", layout.width, layout.height))
    })?;
    pixmap.fill(color(layout.background));

    let band = layout.band_height.min(layout.height);
    if let Some(rect) = Rect::from_xywh(0.0, 0.0, layout.width as f32, band as f32) {
        pixmap.fill_rect(rect, &solid(layout.highlight), Transform::identity(), None);
    }
    Ok(pixmap)
}

/// Draws layouts with TrueType outlines onto a tiny-skia pixmap.
pub struct SkiaRasterizer {
    fonts: Arc<TtfFontSet>,
}

impl SkiaRasterizer {
    pub fn new(fonts: Arc<TtfFontSet>) -> Self {
        Self { fonts }
    }

    pub fn paint(&self, layout: &ImageLayout) -> Result<Pixmap> {
        let mut pixmap = paint_background(layout)?;
        let paint = solid(layout.text_color);
        for block in &layout.blocks {
            self.draw_block(&mut pixmap, block, &paint);
        }
        Ok(pixmap)
    }

    fn draw_block(&self, pixmap: &mut Pixmap, block: &TextBlock, paint: &Paint<'_>) {
        let font = self.fonts.font(block.role);
        let line_height = cb_core::FontMetrics::line_height(font) as f32;
        for (i, line) in block.text.lines.iter().enumerate() {
            let baseline = block.y as f32 + i as f32 * line_height + font.ascent();
            draw_line(pixmap, font, line, block.x as f32, baseline, paint);
        }
    }
}

fn draw_line(pixmap: &mut Pixmap, font: &TtfFont, line: &str, x: f32, baseline: f32, paint: &Paint<'_>) {
    let Some(face) = font.face() else {
        return;
    };
    let scale = font.scale();
    let mut pen = x;
    for c in line.chars() {
        let Some(glyph) = face.glyph_index(c) else {
            continue;
        };
        if let Some(path) = build_glyph_path(&face, glyph) {
            let transform = glyph_transform(scale, pen, baseline);
            pixmap.fill_path(&path, paint, FillRule::Winding, transform, None);
        }
        pen += face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale;
    }
}

impl Rasterizer for SkiaRasterizer {
    fn rasterize(&self, layout: &ImageLayout) -> Result<Vec<u8>> {
        let pixmap = self.paint(layout)?;
        let png = pixmap
            .encode_png()
            .map_err(|e| Error::Render(format!("PNG encoding failed: {}", e)))?;
        debug!("Encoded {}x{} PNG, {} bytes", layout.width, layout.height, png.len());
        Ok(png)
    }
}
