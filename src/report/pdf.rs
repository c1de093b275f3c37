use anyhow::{anyhow, Result};
use printpdf::{
    path::PaintMode, BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rect, Rgb as PdfRgb,
};

use super::{
    canvas::{Canvas, Font, FontStyle, Logo, Rgb},
    layout::{PAGE_HEIGHT, PAGE_WIDTH},
    PT_TO_MM,
};

const LAYER_NAME: &str = "Layer 1";
/// Border width, in points.
const LINE_WIDTH: f32 = 0.2 / PT_TO_MM;

/// [Canvas] producing a PDF document with the base-14 Helvetica fonts.
pub struct PdfCanvas {
    document: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// The document is created with its first page, which is handed out on the first
    /// [Canvas::add_page].
    first_page_taken: bool,
}

impl PdfCanvas {
    pub fn new(title: &str) -> Result<Self> {
        let (document, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        let regular = document
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow!("Failed to add font {e:?}"))?;
        let bold = document
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow!("Failed to add font {e:?}"))?;
        let layer = document.get_page(page).get_layer(layer);
        Ok(Self {
            document,
            layer,
            regular,
            bold,
            first_page_taken: false,
        })
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        self.document
            .save_to_bytes()
            .map_err(|e| anyhow!("Failed to encode pdf {e:?}"))
    }

    fn set_fill(&self, color: Rgb) {
        self.layer.set_fill_color(pdf_color(color));
    }

    fn rect(&self, x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(
            Mm(x),
            Mm(PAGE_HEIGHT - (y + h)),
            Mm(x + w),
            Mm(PAGE_HEIGHT - y),
        )
    }
}

fn pdf_color(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb(PdfRgb::new(
        r as f32 / 255.,
        g as f32 / 255.,
        b as f32 / 255.,
        None,
    ))
}

impl Canvas for PdfCanvas {
    fn add_page(&mut self) {
        if !self.first_page_taken {
            self.first_page_taken = true;
            return;
        }
        let (page, layer) = self
            .document
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        self.layer = self.document.get_page(page).get_layer(layer);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.set_fill(color);
        self.layer
            .add_rect(self.rect(x, y, w, h).with_mode(PaintMode::Fill));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.layer.set_outline_color(pdf_color(Rgb::BLACK));
        self.layer.set_outline_thickness(LINE_WIDTH);
        self.layer
            .add_rect(self.rect(x, y, w, h).with_mode(PaintMode::Stroke));
    }

    fn text(&mut self, x: f32, y: f32, font: Font, color: Rgb, text: &str) {
        let font_ref = match font.style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        };
        self.set_fill(color);
        self.layer
            .use_text(text, font.size_pt, Mm(x), Mm(PAGE_HEIGHT - y), font_ref);
    }

    fn image(&mut self, logo: &Logo, x: f32, y: f32, width: f32) {
        let pixels = logo.image().width().max(1) as f32;
        let height = logo.height_for(width);
        // printpdf sizes images through their resolution.
        let dpi = pixels * 25.4 / width;
        Image::from_dynamic_image(logo.image()).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(PAGE_HEIGHT - (y + height))),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }
}
