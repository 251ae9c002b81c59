// Text Extraction Service
// Pulls plain text out of PDF, DOCX and plain-text submissions

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read PDF: {0}")]
    PdfRead(String),
    #[error("failed to read DOCX: {0}")]
    DocxRead(String),
    #[error("file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("extracted text is empty")]
    EmptyExtraction,
}

/// Extract text from raw PDF bytes.
///
/// An unreadable file or an empty extraction is an error the caller must
/// surface; an empty string is never returned as success.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::PdfRead(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(ExtractError::EmptyExtraction);
    }

    info!(chars = text.chars().count(), "pdf text extracted");
    Ok(text)
}

/// Extract text from raw DOCX bytes by walking document paragraphs.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::DocxRead(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(para) = child {
            let mut line = String::new();
            for pc in &para.children {
                if let ParagraphChild::Run(run) = pc {
                    for rc in &run.children {
                        if let RunChild::Text(t) = rc {
                            line.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(line);
        }
    }

    let text = paragraphs.join("\n");
    if text.trim().is_empty() {
        return Err(ExtractError::EmptyExtraction);
    }

    info!(chars = text.chars().count(), "docx text extracted");
    Ok(text)
}

/// Read the content of a plain-text file.
pub fn read_text_file(bytes: Vec<u8>) -> Result<String, ExtractError> {
    let text = String::from_utf8(bytes)?;
    if text.trim().is_empty() {
        return Err(ExtractError::EmptyExtraction);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};

    #[test]
    fn test_read_text_file() {
        let text = read_text_file(b"This is a test document for txt extraction.".to_vec()).unwrap();
        assert_eq!(text, "This is a test document for txt extraction.");
    }

    #[test]
    fn test_read_text_file_rejects_empty() {
        assert!(matches!(
            read_text_file(b"   \n".to_vec()),
            Err(ExtractError::EmptyExtraction)
        ));
    }

    #[test]
    fn test_read_text_file_rejects_invalid_utf8() {
        assert!(matches!(
            read_text_file(vec![0xff, 0xfe, 0x00]),
            Err(ExtractError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_docx_round_trip() {
        let mut buf = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("This is a test document for docx extraction.")),
            )
            .build()
            .pack(&mut buf)
            .unwrap();

        let text = extract_docx_text(buf.get_ref()).unwrap();
        assert_eq!(text, "This is a test document for docx extraction.");
    }

    #[test]
    fn test_garbage_pdf_bytes_fail_loudly() {
        let result = extract_pdf_text(b"definitely not a pdf");
        assert!(result.is_err());
    }
}
