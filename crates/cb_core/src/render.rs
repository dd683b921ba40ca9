use crate::types::{FontRole, ImageLayout};
use crate::Result;

/// Pixel measurements for one font at one size.
pub trait FontMetrics: Send + Sync {
    /// Advance width of `text` in pixels
    fn measure(&self, text: &str) -> u32;

    /// Vertical distance between consecutive baselines in pixels
    fn line_height(&self) -> u32;
}

/// One set of metrics per text role.
pub trait FontSet: Send + Sync {
    fn metrics(&self, role: FontRole) -> &dyn FontMetrics;
}

/// Turns a computed layout into encoded image bytes.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, layout: &ImageLayout) -> Result<Vec<u8>>;
}
