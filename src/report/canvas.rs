use std::path::Path;

use anyhow::{Context, Result};
use printpdf::image_crate::{self, DynamicImage, RgbImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const GRAY: Rgb = Rgb(200, 200, 200);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub style: FontStyle,
    pub size_pt: f32,
}

impl Font {
    pub const fn regular(size_pt: f32) -> Self {
        Self {
            style: FontStyle::Regular,
            size_pt,
        }
    }

    pub const fn bold(size_pt: f32) -> Self {
        Self {
            style: FontStyle::Bold,
            size_pt,
        }
    }
}

/// Decoded image placed in the report header.
#[derive(Debug, Clone)]
pub struct Logo {
    image: DynamicImage,
}

impl Logo {
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read logo {path:?}"))?;
        let image = image_crate::load_from_memory(&bytes)
            .with_context(|| format!("Failed to decode logo {path:?}"))?;
        Ok(Self::from_image(image))
    }

    /// Transparent pixels are flattened onto white, the logo is embedded without an alpha mask.
    pub fn from_image(image: DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let mut rgb = RgbImage::new(rgba.width(), rgba.height());
        for (source, target) in rgba.pixels().zip(rgb.pixels_mut()) {
            let [r, g, b, alpha] = source.0;
            let over_white = |c: u8| {
                let alpha = u16::from(alpha);
                ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8
            };
            *target = image_crate::Rgb([over_white(r), over_white(g), over_white(b)]);
        }
        Self {
            image: DynamicImage::ImageRgb8(rgb),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Height that keeps the aspect ratio when drawn `width` wide.
    pub fn height_for(&self, width: f32) -> f32 {
        if self.image.width() == 0 {
            return 0.;
        }
        width * self.image.height() as f32 / self.image.width() as f32
    }
}

/// Drawing surface of a report. Coordinates are millimetres from the top left corner of the
/// current page.
pub trait Canvas {
    fn add_page(&mut self);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb);

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    /// `y` is the baseline of the text.
    fn text(&mut self, x: f32, y: f32, font: Font, color: Rgb, text: &str);

    fn image(&mut self, logo: &Logo, x: f32, y: f32, width: f32);
}
