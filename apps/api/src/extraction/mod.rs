// Resume upload pipeline: file checks, PDF/DOCX text extraction, cleanup.
// Parsing is synchronous and CPU-bound; handlers run it on the blocking pool.

pub mod document;
pub mod file_info;
pub mod handlers;
pub mod validation;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
