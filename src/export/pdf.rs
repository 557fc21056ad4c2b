//! PDF rendering of a paginated layout.
//!
//! Draws every placed line with the built-in Helvetica font using printpdf.
//! PDF coordinates grow upwards from the bottom edge, so baselines measured
//! from the top are flipped here.

use super::layout::PaginatedDocument;
use crate::error::{Error, Result};
use log::debug;
use printpdf::{BuiltinFont, Mm, PdfDocument};

/// Title written into the PDF metadata.
const DOCUMENT_TITLE: &str = "Exported Document";

/// Name of the single drawing layer on every page.
const LAYER_NAME: &str = "Text";

/// Render a paginated document to PDF bytes.
pub fn render_pdf(layout: &PaginatedDocument) -> Result<Vec<u8>> {
    let setup = &layout.setup;
    let width = Mm(setup.width_mm);
    let height = Mm(setup.height_mm);

    let (doc, first_page, first_layer) = PdfDocument::new(DOCUMENT_TITLE, width, height, LAYER_NAME);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Render(e.to_string()))?;

    for (index, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, LAYER_NAME)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in page.lines.iter().filter(|l| !l.text.is_empty()) {
            layer.use_text(
                line.text.as_str(),
                setup.font_size_pt,
                Mm(line.x_mm),
                Mm(setup.height_mm - line.y_mm),
                &font,
            );
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| Error::Render(e.to_string()))?;

    debug!(
        "Rendered {} page(s) into {} bytes of PDF",
        layout.page_count(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::layout::layout_document;
    use crate::export::options::PageSetup;

    #[test]
    fn test_render_produces_pdf_header() {
        let layout = layout_document("Hello\nWorld", &PageSetup::default());
        let bytes = render_pdf(&layout).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_multi_page_document() {
        let page = PageSetup::default();
        let body = vec!["line"; page.lines_per_page() * 3].join("\n");
        let layout = layout_document(&body, &page);
        assert_eq!(layout.page_count(), 3);

        let single = render_pdf(&layout_document("line", &page)).unwrap();
        let triple = render_pdf(&layout).unwrap();
        assert!(triple.len() > single.len());
    }

    #[test]
    fn test_render_empty_document() {
        let layout = layout_document("", &PageSetup::default());
        let bytes = render_pdf(&layout).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
