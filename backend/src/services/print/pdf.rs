//! Shared `genpdf` plumbing for the print documents.

use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element, PaperSize};
use std::error::Error;
use std::path::Path;

/// Loads the document font family from `fonts_dir`.
///
/// Arial is used when its TTF files are present, LiberationSans otherwise.
pub fn load_font(fonts_dir: &Path) -> Result<FontFamily<FontData>, Box<dyn Error>> {
    if let Ok(family) = genpdf::fonts::from_files(fonts_dir, "Arial", None) {
        return Ok(family);
    }
    genpdf::fonts::from_files(fonts_dir, "LiberationSans", None).map_err(|e| {
        format!(
            "No usable font in {} (expected Arial or LiberationSans TTF files): {}",
            fonts_dir.display(),
            e
        )
        .into()
    })
}

/// A document with the shared font, margins and body size.
pub fn configure_document(
    fonts_dir: &Path,
    title: &str,
    paper: PaperSize,
) -> Result<Document, Box<dyn Error>> {
    let mut doc = Document::new(load_font(fonts_dir)?);
    doc.set_title(title);
    doc.set_paper_size(paper);
    doc.set_font_size(11);
    doc.set_line_spacing(1.25);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(15);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

pub fn push_title(doc: &mut Document, title: &str) {
    doc.push(
        Paragraph::new(title)
            .aligned(Alignment::Center)
            .styled(Style::new().bold().with_font_size(20)),
    );
    doc.push(Break::new(1));
}

pub fn push_section(doc: &mut Document, heading: &str) {
    doc.push(Break::new(1));
    doc.push(Paragraph::new(heading).styled(Style::new().bold().with_font_size(14)));
}

/// A framed grid with a bold header row.
pub fn grid(
    weights: Vec<usize>,
    headers: &[&str],
    rows: &[Vec<String>],
    font_size: u8,
) -> Result<TableLayout, Box<dyn Error>> {
    let mut table = TableLayout::new(weights);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let mut header_row = table.row();
    for header in headers {
        header_row.push_element(
            Paragraph::new(*header)
                .styled(Style::new().bold().with_font_size(font_size))
                .padded(1),
        );
    }
    header_row.push()?;

    for cells in rows {
        let mut row = table.row();
        for cell in cells {
            row.push_element(
                Paragraph::new(cell.as_str())
                    .styled(Style::new().with_font_size(font_size))
                    .padded(1),
            );
        }
        row.push()?;
    }
    Ok(table)
}

pub fn render(doc: Document) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut bytes = Vec::new();
    doc.render(&mut bytes)?;
    Ok(bytes)
}
