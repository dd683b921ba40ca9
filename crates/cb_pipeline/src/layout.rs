use std::path::PathBuf;

use cb_core::{FontRole, FontSet, ImageLayout, Rasterizer, Result, Rgb, TextBlock};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::wrap::{wrap, wrap_paragraphs};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    pub path: PathBuf,
    pub size: f32,
}

impl FontConfig {
    fn new(path: &str, size: f32) -> Self {
        Self {
            path: PathBuf::from(path),
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    pub title: FontConfig,
    pub preface: FontConfig,
    pub body: FontConfig,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            title: FontConfig::new("fonts/Roboto-Bold.ttf", 44.0),
            preface: FontConfig::new("fonts/Roboto-Medium.ttf", 38.0),
            body: FontConfig::new("fonts/Roboto-Regular.ttf", 34.0),
        }
    }
}

impl FontsConfig {
    pub fn for_role(&self, role: FontRole) -> &FontConfig {
        match role {
            FontRole::Title => &self.title,
            FontRole::Preface => &self.preface,
            FontRole::Body => &self.body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: u32,
    pub side_pad: u32,
    pub title_pad: u32,
    pub preface_pad: u32,
    pub body_pad: u32,
    pub background: Rgb,
    pub highlight: Rgb,
    pub text_color: Rgb,
    pub fonts: FontsConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1100,
            side_pad: 25,
            title_pad: 16,
            preface_pad: 32,
            body_pad: 32,
            background: Rgb(5, 5, 5),
            highlight: Rgb(15, 140, 85),
            text_color: Rgb(255, 255, 255),
            fonts: FontsConfig::default(),
        }
    }
}

/// Stacks the title, preface and body into one image layout.
#[derive(Debug, Clone, Default)]
pub struct LayoutRenderer {
    config: LayoutConfig,
}

impl LayoutRenderer {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn wrap_width(&self) -> u32 {
        self.config.width.saturating_sub(2 * self.config.side_pad)
    }

    /// Sum of the fixed vertical paddings around the three blocks.
    pub fn vertical_padding(&self) -> u32 {
        self.config.title_pad + self.config.preface_pad + 2 * self.config.body_pad
    }

    pub fn layout<S: AsRef<str>>(
        &self,
        title: &str,
        preface: &str,
        body: &[S],
        fonts: &dyn FontSet,
    ) -> ImageLayout {
        let max_width = self.wrap_width();
        let title = wrap(title, fonts.metrics(FontRole::Title), max_width);
        let preface = wrap(preface, fonts.metrics(FontRole::Preface), max_width);
        let body = wrap_paragraphs(body, fonts.metrics(FontRole::Body), max_width);

        let y_title = self.config.title_pad;
        let y_preface = y_title + title.pixel_height + self.config.preface_pad;
        let y_body = y_preface + preface.pixel_height + self.config.body_pad;
        let height = y_body + body.pixel_height + self.config.body_pad;
        debug!(
            "Layout: title {}px, preface {}px, body {}px, image {}x{}",
            title.pixel_height, preface.pixel_height, body.pixel_height, self.config.width, height
        );

        let x = self.config.side_pad;
        ImageLayout {
            width: self.config.width,
            height,
            band_height: y_preface - self.config.title_pad,
            background: self.config.background,
            highlight: self.config.highlight,
            text_color: self.config.text_color,
            blocks: vec![
                TextBlock { role: FontRole::Title, x, y: y_title, text: title },
                TextBlock { role: FontRole::Preface, x, y: y_preface, text: preface },
                TextBlock { role: FontRole::Body, x, y: y_body, text: body },
            ],
        }
    }

    /// Lays out the text and hands it to the rasterizer for encoding.
    pub fn render<S: AsRef<str>>(
        &self,
        title: &str,
        preface: &str,
        body: &[S],
        fonts: &dyn FontSet,
        rasterizer: &dyn Rasterizer,
    ) -> Result<Vec<u8>> {
        let layout = self.layout(title, preface, body, fonts);
        rasterizer.rasterize(&layout)
    }
}
