use serde::Serialize;

use crate::extraction::{DOCX_MIME, PDF_MIME};

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;

/// Descriptive metadata about an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Lowercase, with the leading dot. Empty when the name has no dot.
    pub extension: String,
    pub formatted_size: String,
    pub type_description: String,
}

impl FileInfo {
    pub fn new(name: &str, size: u64, mime_type: &str) -> Self {
        let extension = file_extension(name);
        let type_description = type_description(&extension, mime_type);
        Self {
            name: name.to_string(),
            size,
            mime_type: mime_type.to_string(),
            extension,
            formatted_size: format_file_size(size),
            type_description,
        }
    }

    /// PDFs over 2 MB are usually page images rather than text.
    pub fn is_likely_scanned(&self) -> bool {
        self.extension == ".pdf" && self.size > 2 * MB
    }

    pub fn extraction_difficulty(&self) -> ExtractionDifficulty {
        match self.mime_type.as_str() {
            DOCX_MIME => ExtractionDifficulty::Easy,
            PDF_MIME if self.size > 5 * MB => ExtractionDifficulty::Hard,
            PDF_MIME => ExtractionDifficulty::Medium,
            _ => ExtractionDifficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionDifficulty {
    Easy,
    Medium,
    Hard,
}

pub fn file_extension(name: &str) -> String {
    name.rfind('.')
        .map(|dot| name[dot..].to_lowercase())
        .unwrap_or_default()
}

/// Human-readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2.25 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= KB && exponent < UNITS.len() - 1 {
        scaled /= KB;
        exponent += 1;
    }
    let value = bytes as f64 / (KB as f64).powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exponent])
}

fn type_description(extension: &str, mime_type: &str) -> String {
    match extension {
        ".pdf" => "PDF Document".to_string(),
        ".docx" => "Microsoft Word Document".to_string(),
        ".doc" => "Legacy Microsoft Word Document".to_string(),
        _ if !mime_type.is_empty() => mime_type.to_string(),
        _ => "Unknown File Type".to_string(),
    }
}
