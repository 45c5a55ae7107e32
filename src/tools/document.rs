//! Financial document reader
//!
//! Extracts the full text of a PDF, page by page in page order, each
//! page's text followed by a newline. Read failures come back as a
//! descriptive string, never as an error.

use lopdf::Document;
use tracing::{debug, warn};

use super::Tool;

pub const DOCUMENT_READER_TOOL: &str = "read_financial_document";

pub struct DocumentReaderTool;

impl DocumentReaderTool {
    fn extract(file_path: &str) -> Result<String, lopdf::Error> {
        let doc = Document::load(file_path)?;

        let mut text = String::new();
        for page_number in doc.get_pages().keys() {
            let page_text = doc.extract_text(&[*page_number])?;
            text.push_str(&page_text);
            if !text.ends_with('\n') {
                text.push('\n');
            }
        }

        Ok(text)
    }
}

#[async_trait::async_trait]
impl Tool for DocumentReaderTool {
    fn name(&self) -> &'static str {
        DOCUMENT_READER_TOOL
    }

    fn description(&self) -> &'static str {
        "Read and extract text from a financial PDF document at the given file path"
    }

    async fn run(&self, input: &str) -> String {
        match Self::extract(input) {
            Ok(text) => {
                debug!(file_path = %input, bytes = text.len(), "Document extracted");
                text
            }
            Err(e) => {
                warn!(file_path = %input, error = %e, "Document read failed");
                format!("Error reading PDF: {}", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn page_content(text: &str) -> Content {
        Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        }
    }

    fn two_page_pdf(path: &std::path::Path) {
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

        let mut kids = Vec::new();
        for text in ["Revenue grew twelve percent", "Risk factors remain elevated"] {
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                page_content(text).encode().unwrap(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc.save(path).unwrap();
    }

    #[tokio::test]
    async fn test_pages_concatenated_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        two_page_pdf(&path);

        let output = DocumentReaderTool.run(path.to_str().unwrap()).await;

        let first = output.find("Revenue grew twelve percent").unwrap();
        let second = output.find("Risk factors remain elevated").unwrap();
        assert!(first < second);
        assert!(output.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_missing_file_returns_error_string() {
        let output = DocumentReaderTool.run("/no/such/report.pdf").await;
        assert!(output.starts_with("Error reading PDF:"));
    }

    #[tokio::test]
    async fn test_corrupt_file_returns_error_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let output = DocumentReaderTool.run(path.to_str().unwrap()).await;
        assert!(output.starts_with("Error reading PDF:"));
    }
}
