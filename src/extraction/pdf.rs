//! Per-page PDF text extraction built on `lopdf`.

use lopdf::Document;

use super::ExtractionError;

/// Extract the text of every page in document order.
///
/// Parsing happens entirely in memory; the caller owns the file read. Pages
/// are visited in the order `get_pages` reports them (page numbers are the
/// map keys, so iteration follows the document). Each non-empty page text is
/// appended followed by a newline; a page whose text cannot be decoded is
/// skipped with a warning rather than failing the whole document.
pub(crate) fn extract(bytes: &[u8]) -> Result<(String, usize), ExtractionError> {
    let document = Document::load_mem(bytes)?;
    let pages = document.get_pages();
    let page_count = pages.len();

    let mut text = String::new();
    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => {
                if !page_text.trim().is_empty() {
                    text.push_str(&page_text);
                    text.push('\n');
                }
            }
            Err(error) => {
                tracing::warn!(
                    page = page_number,
                    error = %error,
                    "Skipping page with undecodable text"
                );
            }
        }
    }

    Ok((text, page_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    fn build_pdf(pages_text: &[&str]) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages_text {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![50.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let kid_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => kid_count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();
        doc
    }

    #[test]
    fn extracts_pages_in_document_order() {
        let mut bytes = Vec::new();
        build_pdf(&["First page about rivers", "Second page about dams"])
            .save_to(&mut bytes)
            .expect("serialize fixture");

        let (text, page_count) = extract(&bytes).expect("extraction");

        assert_eq!(page_count, 2);
        let first = text.find("First page about rivers").expect("first page text");
        let second = text.find("Second page about dams").expect("second page text");
        assert!(first < second);
    }

    #[test]
    fn corrupt_bytes_are_a_pdf_error() {
        let error = extract(b"%PDF-nope, not really").expect_err("corrupt pdf");
        assert!(matches!(error, ExtractionError::Pdf(_)));
    }
}
