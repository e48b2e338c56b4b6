//! PDF layout with the built-in Helvetica fonts

use chrono::NaiveDate;
use printpdf::{
    Actions, BuiltinFont, Color, IndirectFontRef, LinkAnnotation, Mm, PdfDocument, Rect, Rgb,
};

use super::{Block, DOCUMENT_TITLE};
use crate::plan::BARE_URL;
use crate::{Error, Result};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;

/// Millimetres per typographic point
const PT_TO_MM: f32 = 0.3528;

/// Average Helvetica glyph width relative to the font size
const GLYPH_WIDTH: f32 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style {
    Title,
    Heading,
    Bold,
    Body,
    Link,
}

impl Style {
    /// Font size in points and line height in millimetres
    fn metrics(self) -> (f32, f32) {
        match self {
            Style::Title => (14.0, 10.0),
            Style::Heading => (12.0, 9.0),
            Style::Bold | Style::Body | Style::Link => (10.0, 6.0),
        }
    }

    fn is_bold(self) -> bool {
        matches!(self, Style::Title | Style::Heading | Style::Bold)
    }
}

/// A single positioned line of text
#[derive(Debug, Clone, PartialEq)]
struct PdfLine {
    text: String,
    style: Style,
    x: f32,
    /// Baseline, measured from the bottom of the page
    y: f32,
    link: Option<String>,
}

/// Places lines top to bottom, starting a new sheet when one fills up
struct Cursor {
    sheets: Vec<Vec<PdfLine>>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            sheets: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_sheet(&mut self) {
        if self.sheets.last().is_some_and(|sheet| !sheet.is_empty()) {
            self.sheets.push(Vec::new());
        }
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn push(&mut self, style: Style, indent: f32, text: &str, link: Option<&str>) {
        let (size, height) = style.metrics();
        let width = PAGE_WIDTH - 2.0 * MARGIN - indent;

        for piece in wrap(text, chars_per_line(size, width)) {
            if self.y - height < MARGIN {
                self.new_sheet();
            }
            self.y -= height;

            if let Some(sheet) = self.sheets.last_mut() {
                sheet.push(PdfLine {
                    text: piece,
                    style,
                    x: MARGIN + indent,
                    y: self.y,
                    link: link.map(str::to_string),
                });
            }
        }
    }
}

/// Position every block, one or more sheets per logical page
fn layout(pages: &[Vec<Block>], generated_on: Option<NaiveDate>) -> Vec<Vec<PdfLine>> {
    let mut cursor = Cursor::new();
    cursor.push(Style::Title, 0.0, DOCUMENT_TITLE, None);
    if let Some(date) = generated_on {
        cursor.push(Style::Body, 0.0, &format!("Generated on {}", date.format("%Y-%m-%d")), None);
    }
    cursor.gap(4.0);

    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            cursor.new_sheet();
        }
        for block in page {
            place(&mut cursor, block);
        }
    }

    cursor.sheets
}

fn place(cursor: &mut Cursor, block: &Block) {
    match block {
        Block::Day(label) => {
            cursor.gap(2.0);
            cursor.push(Style::Heading, 0.0, label, None);
        }
        Block::Meal { meal_type, title } => {
            cursor.push(Style::Bold, 0.0, &format!("{}: {}", meal_type, title), None);
        }
        Block::Ingredients(text) => {
            cursor.push(Style::Body, 4.0, &format!("Ingredients: {}", text), None);
        }
        Block::Recipe(link) => {
            cursor.push(Style::Link, 4.0, link, Some(link));
        }
        Block::Tweaks(tweaks) => {
            for (person, tweak) in tweaks {
                cursor.push(Style::Body, 8.0, &format!("- {}: {}", person, tweak), None);
            }
        }
        Block::Note(text) => cursor.push(Style::Body, 0.0, text, None),
        Block::Raw(line) => {
            let text = BARE_URL.replace_all(line, "");
            let text = text.trim();
            if !text.is_empty() {
                cursor.push(Style::Body, 0.0, text, None);
            }
            for url in BARE_URL.find_iter(line) {
                cursor.push(Style::Link, 4.0, url.as_str(), Some(url.as_str()));
            }
        }
    }
}

fn chars_per_line(size: f32, width: f32) -> usize {
    ((width / (size * GLYPH_WIDTH * PT_TO_MM)) as usize).max(1)
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH * PT_TO_MM
}

/// Greedy word wrap; words longer than a line are split
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(max_chars) {
            let chunk: String = chunk.iter().collect();
            let needed = current.chars().count()
                + usize::from(!current.is_empty())
                + chunk.chars().count();
            if !current.is_empty() && needed > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&chunk);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn pdf_error(e: printpdf::Error) -> Error {
    Error::Render(format!("PDF generation failed: {}", e))
}

/// Draw the pages, returning the PDF bytes and the number of sheets
pub(super) fn write_pdf(
    pages: &[Vec<Block>],
    generated_on: Option<NaiveDate>,
) -> Result<(Vec<u8>, usize)> {
    let sheets = layout(pages, generated_on);

    let (doc, first_page, first_layer) =
        PdfDocument::new(DOCUMENT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Plan");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    for (index, sheet) in sheets.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Plan")
        };
        let layer = doc.get_page(page).get_layer(layer);

        for line in sheet {
            let font: &IndirectFontRef = if line.style.is_bold() { &bold } else { &regular };
            let (size, _) = line.style.metrics();

            let Some(ref url) = line.link else {
                layer.use_text(line.text.as_str(), size, Mm(line.x), Mm(line.y), font);
                continue;
            };

            layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 1.0, None)));
            layer.use_text(line.text.as_str(), size, Mm(line.x), Mm(line.y), font);
            layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));

            layer.add_link_annotation(LinkAnnotation::new(
                Rect::new(
                    Mm(line.x),
                    Mm(line.y - 1.0),
                    Mm(line.x + text_width(&line.text, size)),
                    Mm(line.y + size * PT_TO_MM),
                ),
                None,
                None,
                Actions::uri(url.clone()),
                None,
            ));
        }
    }

    let bytes = doc.save_to_bytes().map_err(pdf_error)?;
    Ok((bytes, sheets.len()))
}
