use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::extraction::file_info::{format_file_size, FileInfo};
use crate::extraction::{DOCX_MIME, PDF_MIME};

const MAX_FILENAME_CHARS: usize = 255;
const SMALL_FILE_BYTES: u64 = 1024;
const LARGE_FILE_BYTES: u64 = 5 * 1024 * 1024;

static SAFE_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s\-_.()\[\]]+$").expect("valid filename pattern"));

/// Knobs for resume file checks. `Default` matches what the upload endpoint uses.
#[derive(Debug, Clone)]
pub struct FileValidationOptions {
    pub max_size_bytes: u64,
    pub allowed_types: Vec<String>,
    pub allowed_extensions: Vec<String>,
    pub strict_type_checking: bool,
    pub check_filename: bool,
}

impl Default for FileValidationOptions {
    fn default() -> Self {
        Self {
            max_size_bytes: 10 * 1024 * 1024,
            allowed_types: vec![PDF_MIME.to_string(), DOCX_MIME.to_string()],
            allowed_extensions: vec![".pdf".to_string(), ".docx".to_string()],
            strict_type_checking: true,
            check_filename: true,
        }
    }
}

impl FileValidationOptions {
    pub fn with_max_size(max_size_bytes: u64) -> Self {
        Self {
            max_size_bytes,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValidationResult {
    pub is_valid: bool,
    /// Blocking problems.
    pub errors: Vec<String>,
    /// Non-blocking suggestions.
    pub warnings: Vec<String>,
    pub file_info: FileInfo,
}

/// Size error for a file over the limit. `None` when the upload was cut off
/// before its size was known.
pub fn size_limit_error(size: Option<u64>, options: &FileValidationOptions) -> String {
    let max_mb = (options.max_size_bytes as f64 / (1024.0 * 1024.0)).round();
    match size {
        Some(size) => format!(
            "File size ({}) exceeds maximum allowed size of {max_mb}MB",
            format_file_size(size)
        ),
        None => format!("File size exceeds maximum allowed size of {max_mb}MB"),
    }
}

/// Checks an uploaded file before any parsing happens.
pub fn validate_resume_file(
    name: &str,
    size: u64,
    mime_type: &str,
    options: &FileValidationOptions,
) -> FileValidationResult {
    let file_info = FileInfo::new(name, size, mime_type);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if size == 0 {
        errors.push("File appears to be empty".to_string());
    } else if size > options.max_size_bytes {
        errors.push(size_limit_error(Some(size), options));
    }

    if !options.allowed_extensions.contains(&file_info.extension) {
        errors.push(format!(
            "File extension \"{}\" is not allowed. Supported formats: {}",
            file_info.extension,
            options.allowed_extensions.join(", ")
        ));
    }

    if options.strict_type_checking {
        if mime_type.is_empty() {
            warnings.push("File type could not be determined".to_string());
        } else if !options.allowed_types.iter().any(|t| t == mime_type) {
            errors.push(format!(
                "File type \"{mime_type}\" is not supported. Supported types: PDF, DOCX"
            ));
        }
    }

    if name.chars().count() > MAX_FILENAME_CHARS {
        errors.push("File name is too long (maximum 255 characters)".to_string());
    }

    if options.check_filename && !SAFE_FILENAME.is_match(name) {
        warnings.push("File name contains special characters that may cause issues".to_string());
    }

    if size > 0 && size < SMALL_FILE_BYTES {
        warnings.push("File seems very small for a resume".to_string());
    }

    if size > LARGE_FILE_BYTES {
        warnings.push("File is quite large for a resume - consider optimizing".to_string());
    }

    if file_info.is_likely_scanned() {
        warnings.push(
            "Large PDF files are often scanned images - text extraction may be incomplete"
                .to_string(),
        );
    }

    FileValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        file_info,
    }
}
