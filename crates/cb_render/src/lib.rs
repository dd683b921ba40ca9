//! Font metrics and PNG rasterization for article images.

pub mod fonts;
pub mod glyph_path;
pub mod raster;

pub use fonts::{TtfFont, TtfFontSet};
pub use raster::SkiaRasterizer;
