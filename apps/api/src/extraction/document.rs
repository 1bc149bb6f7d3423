//! Document text extraction: turns PDF/DOCX bytes into cleaned plain text.
//!
//! Parsing delegates to `pdf-extract` and `docx-rs`. Everything after that is
//! string cleanup, word counting and low-content warnings. A parse failure is
//! terminal for the upload; nothing is retried.

use std::time::Instant;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extraction::file_info::FileInfo;
use crate::extraction::{DOCX_MIME, PDF_MIME};

/// Below this many characters the document is probably image-only.
pub const MIN_TEXT_CHARS: usize = 100;
pub const MIN_WORDS: usize = 50;

pub const LOW_TEXT_WARNING: &str =
    "Very little text was extracted - document may be mostly images";
pub const FEW_WORDS_WARNING: &str = "Document appears to have very few words for a resume";
pub const NO_TEXT_ERROR: &str = "No text could be extracted from the document";
pub const UNSUPPORTED_TYPE_ERROR: &str = "Unsupported file type for text extraction";

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

// Letters, digits, whitespace and common resume punctuation. Everything else
// (bullets, emoji, accented letters, private-use glyphs) becomes a space.
static DISALLOWED_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^a-zA-Z0-9\s.,;:!?@#$%&*\-–—'"`()\[\]{}]"#).expect("valid allow-list pattern")
});

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{0}")]
    Pdf(String),

    #[error("{0}")]
    Docx(String),
}

/// Outcome of one extraction. `success == false` always carries empty text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub success: bool,
    pub text: String,
    pub word_count: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub file_info: FileInfo,
}

impl ExtractionResult {
    fn failure(file_info: FileInfo, errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            text: String::new(),
            word_count: 0,
            errors,
            warnings,
            file_info,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

pub fn is_extraction_supported(mime_type: &str) -> bool {
    mime_type == PDF_MIME || mime_type == DOCX_MIME
}

/// Extracts, cleans and sanity-checks the text of an uploaded resume.
/// Routing is by declared MIME type, not by sniffing the bytes.
pub fn extract_text(bytes: &[u8], file_info: FileInfo) -> ExtractionResult {
    let started = Instant::now();

    let raw = match file_info.mime_type.as_str() {
        PDF_MIME => extract_pdf(bytes),
        DOCX_MIME => extract_docx(bytes),
        _ => {
            return ExtractionResult::failure(
                file_info,
                vec![UNSUPPORTED_TYPE_ERROR.to_string()],
                vec![],
            )
        }
    };

    let raw = match raw {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Text extraction failed for {}: {e}", file_info.name);
            return extraction_failure(file_info, &e.to_string());
        }
    };

    let text = clean_extracted_text(&raw);
    if text.is_empty() {
        return ExtractionResult::failure(
            file_info,
            vec![NO_TEXT_ERROR.to_string()],
            vec![LOW_TEXT_WARNING.to_string()],
        );
    }

    let word_count = count_words(&text);
    let mut warnings = Vec::new();
    if text.chars().count() < MIN_TEXT_CHARS {
        warnings.push(LOW_TEXT_WARNING.to_string());
    }
    if word_count < MIN_WORDS {
        warnings.push(FEW_WORDS_WARNING.to_string());
    }

    info!(
        "Text extraction completed in {}ms: file={}, raw_chars={}, words={}",
        started.elapsed().as_millis(),
        file_info.name,
        raw.len(),
        word_count
    );

    ExtractionResult {
        success: true,
        text,
        word_count,
        errors: vec![],
        warnings,
        file_info,
    }
}

/// Fail-result for a parser that errored or panicked.
pub fn extraction_failure(file_info: FileInfo, reason: &str) -> ExtractionResult {
    ExtractionResult::failure(
        file_info,
        vec![format!("Text extraction failed: {reason}")],
        vec![],
    )
}

/// Collapses whitespace and replaces characters outside the allow-list with spaces.
pub fn clean_extracted_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let filtered = DISALLOWED_CHARS.replace_all(collapsed.trim(), " ");
    WHITESPACE_RUN.replace_all(&filtered, " ").trim().to_string()
}

/// Whitespace-split token count.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        collect_document_child(child, &mut lines);
    }
    debug!("DOCX extraction produced {} lines", lines.len());
    Ok(lines.join("\n"))
}

fn collect_document_child(child: &docx_rs::DocumentChild, lines: &mut Vec<String>) {
    match child {
        docx_rs::DocumentChild::Paragraph(paragraph) => {
            let text = paragraph_text(paragraph);
            if !text.trim().is_empty() {
                lines.push(text);
            }
        }
        docx_rs::DocumentChild::Table(table) => collect_table(table, lines),
        _ => {}
    }
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        push_paragraph_child(child, &mut buffer);
    }
    buffer
}

fn push_paragraph_child(child: &docx_rs::ParagraphChild, buffer: &mut String) {
    match child {
        docx_rs::ParagraphChild::Run(run) => push_run(run, buffer),
        docx_rs::ParagraphChild::Hyperlink(link) => {
            for link_child in &link.children {
                push_paragraph_child(link_child, buffer);
            }
        }
        docx_rs::ParagraphChild::Insert(insert) => {
            for insert_child in &insert.children {
                if let docx_rs::InsertChild::Run(run) = insert_child {
                    push_run(run, buffer);
                }
            }
        }
        _ => {}
    }
}

fn push_run(run: &docx_rs::Run, buffer: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text) => buffer.push_str(&text.text),
            docx_rs::RunChild::Tab(_) => buffer.push('\t'),
            docx_rs::RunChild::Break(_) => buffer.push('\n'),
            _ => {}
        }
    }
}

fn collect_table(table: &docx_rs::Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let docx_rs::TableChild::TableRow(row) = row;
        let mut cells = Vec::new();
        for cell in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = cell;
            let text = table_cell_text(cell);
            if !text.trim().is_empty() {
                cells.push(text);
            }
        }
        if !cells.is_empty() {
            lines.push(cells.join(" | "));
        }
    }
}

fn table_cell_text(cell: &docx_rs::TableCell) -> String {
    let mut parts = Vec::new();
    for content in &cell.children {
        match content {
            docx_rs::TableCellContent::Paragraph(paragraph) => {
                let text = paragraph_text(paragraph);
                if !text.trim().is_empty() {
                    parts.push(text);
                }
            }
            docx_rs::TableCellContent::Table(table) => {
                let mut nested = Vec::new();
                collect_table(table, &mut nested);
                if !nested.is_empty() {
                    parts.push(nested.join(" "));
                }
            }
            _ => {}
        }
    }
    parts.join(" ")
}
