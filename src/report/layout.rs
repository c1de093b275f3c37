use super::{
    canvas::{Canvas, Font, Logo, Rgb},
    metrics::text_width,
    PT_TO_MM,
};

pub const PAGE_WIDTH: f32 = 210.;
pub const PAGE_HEIGHT: f32 = 297.;
const MARGIN: f32 = 10.;
const BOTTOM_MARGIN: f32 = 20.;
/// Horizontal padding between a cell border and left aligned text.
const CELL_PADDING: f32 = 1.;

const LOGO_X: f32 = 5.;
const LOGO_Y: f32 = 4.;
const LOGO_WIDTH: f32 = 16.;
const HEADER_FONT: Font = Font::bold(14.);
const HEADER_LINE_WIDTH: f32 = 180.;
const HEADER_LINE_HEIGHT: f32 = 8.;
const HEADER_GAP: f32 = 5.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A rectangular box of text, drawn at the cursor.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    pub width: f32,
    pub height: f32,
    pub text: &'a str,
    pub border: bool,
    pub align: Align,
    pub fill: Option<Rgb>,
    /// Move to the start of the next line after the cell instead of to its right.
    pub line_break: bool,
}

impl<'a> Cell<'a> {
    pub fn new(width: f32, height: f32, text: &'a str) -> Self {
        Self {
            width,
            height,
            text,
            border: false,
            align: Align::Left,
            fill: None,
            line_break: false,
        }
    }

    pub fn bordered(self) -> Self {
        Self {
            border: true,
            ..self
        }
    }

    pub fn centered(self) -> Self {
        Self {
            align: Align::Center,
            ..self
        }
    }

    pub fn filled(self, fill: Option<Rgb>) -> Self {
        Self { fill, ..self }
    }

    pub fn line_break(self) -> Self {
        Self {
            line_break: true,
            ..self
        }
    }
}

/// Content repeated at the top of every page.
#[derive(Debug, Clone)]
pub struct Header {
    pub logo: Logo,
    pub title: String,
    pub subtitle: String,
}

/// Flows cells down A4 pages, starting a new page (with its header) whenever a cell would cross
/// the bottom margin.
pub struct DocumentWriter<C> {
    canvas: C,
    header: Header,
    x: f32,
    y: f32,
    font: Font,
    text_color: Rgb,
    in_header: bool,
}

impl<C: Canvas> DocumentWriter<C> {
    pub fn new(canvas: C, header: Header) -> Self {
        Self {
            canvas,
            header,
            x: MARGIN,
            y: MARGIN,
            font: Font::regular(12.),
            text_color: Rgb::BLACK,
            in_header: false,
        }
    }

    pub fn add_page(&mut self) {
        self.canvas.add_page();
        self.x = MARGIN;
        self.y = MARGIN;

        let font = self.font;
        let text_color = self.text_color;
        self.in_header = true;
        self.draw_header();
        self.in_header = false;
        self.font = font;
        self.text_color = text_color;
    }

    fn draw_header(&mut self) {
        self.canvas
            .image(&self.header.logo, LOGO_X, LOGO_Y, LOGO_WIDTH);
        self.font = HEADER_FONT;
        self.text_color = Rgb::BLACK;

        let title = self.header.title.clone();
        let subtitle = self.header.subtitle.clone();
        for line in [title, subtitle] {
            self.cell(
                Cell::new(HEADER_LINE_WIDTH, HEADER_LINE_HEIGHT, &line)
                    .centered()
                    .line_break(),
            );
        }
        self.ln(HEADER_GAP);
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn cell(&mut self, cell: Cell) {
        if !self.in_header && self.y + cell.height > PAGE_HEIGHT - BOTTOM_MARGIN {
            let x = self.x;
            self.add_page();
            self.x = x;
        }

        if let Some(fill) = cell.fill {
            self.canvas
                .fill_rect(self.x, self.y, cell.width, cell.height, fill);
        }
        if cell.border {
            self.canvas
                .stroke_rect(self.x, self.y, cell.width, cell.height);
        }
        if !cell.text.is_empty() {
            let offset = match cell.align {
                Align::Left => CELL_PADDING,
                Align::Center => {
                    (cell.width - text_width(cell.text, self.font.style, self.font.size_pt)) / 2.
                }
            };
            let baseline = self.y + 0.5 * cell.height + 0.3 * self.font.size_pt * PT_TO_MM;
            self.canvas
                .text(self.x + offset, baseline, self.font, self.text_color, cell.text);
        }

        if cell.line_break {
            self.x = MARGIN;
            self.y += cell.height;
        } else {
            self.x += cell.width;
        }
    }

    /// Moves the cursor to the start of the line `height` below.
    pub fn ln(&mut self, height: f32) {
        self.x = MARGIN;
        self.y += height;
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }
}
