//! Document text extraction for uploaded résumés.
//!
//! Only two kinds are accepted: PDF and DOCX. Classification happens before
//! any decoding, so an unsupported upload never reaches a parser.

pub mod docx;
pub mod pdf;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {file_name}")]
    UnsupportedFileType { file_name: String },

    #[error("Document decoding engine unavailable: {0}")]
    LibraryUnavailable(String),

    #[error("Failed to decode document: {0}")]
    Decode(String),
}

/// Document kinds the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Classifies by declared media type first, then by file-name suffix.
    pub fn classify(content_type: Option<&str>, file_name: &str) -> Option<Self> {
        if let Some(kind) = content_type.and_then(Self::from_mime) {
            return Some(kind);
        }

        let name = file_name.trim().to_ascii_lowercase();
        if name.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if name.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }

    fn from_mime(content_type: &str) -> Option<Self> {
        // Drop parameters such as "; charset=binary".
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MIME => Some(DocumentKind::Pdf),
            DOCX_MIME => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// A file received from a client, before classification.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::classify(self.content_type.as_deref(), &self.file_name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedText {
    pub kind: DocumentKind,
    pub text: String,
    /// Present for PDFs only. DOCX has no page concept.
    pub page_count: Option<usize>,
}

/// Extracts plain text from an uploaded PDF or DOCX file.
#[tracing::instrument(skip(file), fields(file_name = %file.file_name, size = file.bytes.len()))]
pub async fn extract_text(file: &UploadedFile) -> Result<ExtractedText, ExtractError> {
    let kind = file.kind().ok_or_else(|| ExtractError::UnsupportedFileType {
        file_name: file.file_name.clone(),
    })?;
    debug!(?kind, "Classified upload");

    let extracted = match kind {
        DocumentKind::Pdf => {
            let pages = pdf::extract_pages(file.bytes.clone()).await?;
            ExtractedText {
                kind,
                page_count: Some(pages.len()),
                text: pdf::join_pages(&pages),
            }
        }
        DocumentKind::Docx => ExtractedText {
            kind,
            page_count: None,
            text: docx::extract(file.bytes.clone()).await?,
        },
    };

    info!(
        ?kind,
        chars = extracted.text.len(),
        pages = ?extracted.page_count,
        "Document text extraction complete"
    );
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content_type: Option<&str>, bytes: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.map(String::from),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_classify_by_declared_mime() {
        assert_eq!(
            DocumentKind::classify(Some("application/pdf"), "resume"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::classify(Some(DOCX_MIME), "resume.bin"),
            Some(DocumentKind::Docx)
        );
    }

    #[test]
    fn test_classify_mime_ignores_parameters_and_case() {
        assert_eq!(
            DocumentKind::classify(Some("Application/PDF; charset=binary"), "x"),
            Some(DocumentKind::Pdf)
        );
    }

    #[test]
    fn test_classify_mime_wins_over_suffix() {
        assert_eq!(
            DocumentKind::classify(Some(DOCX_MIME), "resume.pdf"),
            Some(DocumentKind::Docx)
        );
    }

    #[test]
    fn test_classify_falls_back_to_suffix() {
        assert_eq!(
            DocumentKind::classify(Some("application/octet-stream"), "CV.PDF"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::classify(None, "resume.docx"),
            Some(DocumentKind::Docx)
        );
    }

    #[test]
    fn test_classify_rejects_everything_else() {
        assert_eq!(DocumentKind::classify(Some("text/plain"), "resume.txt"), None);
        assert_eq!(DocumentKind::classify(None, "resume.doc"), None);
        assert_eq!(DocumentKind::classify(Some("application/msword"), "resume"), None);
    }

    #[tokio::test]
    async fn test_unsupported_file_fails_before_decoding() {
        // Bytes look like a PDF, but neither declared type nor suffix match.
        let file = upload("resume.txt", Some("text/plain"), b"%PDF-1.7 not really");
        let err = extract_text(&file).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnsupportedFileType { ref file_name } if file_name == "resume.txt"
        ));
    }

    /// A PDF with one line of Courier text per page.
    fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

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
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "MediaBox" => Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_multi_page_pdf_keeps_page_order() {
        let file = UploadedFile {
            file_name: "resume.pdf".to_string(),
            content_type: Some(PDF_MIME.to_string()),
            bytes: Bytes::from(pdf_with_pages(&[
                "Alpha First",
                "Bravo Second",
                "Charlie Third",
            ])),
        };

        let extracted = extract_text(&file).await.unwrap();

        assert_eq!(extracted.kind, DocumentKind::Pdf);
        assert_eq!(extracted.page_count, Some(3));
        assert_eq!(extracted.text, "Alpha First\nBravo Second\nCharlie Third");
    }

    #[tokio::test]
    async fn test_corrupt_docx_is_decode_error() {
        let file = upload("resume.docx", None, b"this is not a zip archive");
        let err = extract_text(&file).await.unwrap_err();
        assert!(matches!(err, ExtractError::Decode(_)));
    }
}
