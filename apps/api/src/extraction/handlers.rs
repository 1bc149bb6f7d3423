//! Axum route handler for resume uploads.

use std::time::Instant;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::extraction::document::{extract_text, extraction_failure, ExtractionResult};
use crate::extraction::file_info::FileInfo;
use crate::extraction::validation::{size_limit_error, validate_resume_file, FileValidationOptions};
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const FALLBACK_MIME: &str = "application/octet-stream";

/// Headroom over the file size limit for multipart framing and other fields.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Successful upload body. Field names are what the frontend store reads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub text: String,
    pub word_count: usize,
    pub char_count: usize,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub processing_time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
    pub timestamp: String,
}

struct UploadedFile {
    name: String,
    mime_type: String,
    data: Bytes,
}

/// POST /api/upload
///
/// Multipart form with a single `file` field. Validates the file, extracts
/// its text and returns it with word and character counts.
pub async fn handle_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let started = Instant::now();
    let options = FileValidationOptions::with_max_size(state.config.max_upload_bytes as u64);

    let declared_len = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if let Some(len) = declared_len {
        if len > options.max_size_bytes + MULTIPART_OVERHEAD_BYTES as u64 {
            return Err(oversized_upload(Some(len), &options));
        }
    }

    let file = read_file_field(multipart, &options).await?;
    info!(
        "Processing upload: name={}, size={}B, type={}",
        file.name,
        file.data.len(),
        file.mime_type
    );

    let validation = validate_resume_file(
        &file.name,
        file.data.len() as u64,
        &file.mime_type,
        &options,
    );
    if !validation.is_valid {
        return Err(AppError::InvalidUpload {
            message: "File validation failed".to_string(),
            details: validation.errors,
            warnings: validation.warnings,
        });
    }

    let extraction = extract_on_blocking_pool(file.data, validation.file_info.clone()).await;
    if !extraction.success {
        let mut warnings = validation.warnings;
        warnings.extend(extraction.warnings);
        return Err(AppError::Extraction {
            details: extraction.errors,
            warnings,
        });
    }

    let mut warnings = validation.warnings;
    warnings.extend(extraction.warnings.iter().cloned());

    let processing_time = started.elapsed().as_millis() as u64;
    info!(
        "Upload processed: words={}, chars={}, took={}ms",
        extraction.word_count,
        extraction.char_count(),
        processing_time
    );

    Ok(Json(UploadResponse {
        success: true,
        char_count: extraction.char_count(),
        word_count: extraction.word_count,
        file_name: extraction.file_info.name,
        file_size: extraction.file_info.size,
        file_type: extraction.file_info.mime_type,
        text: extraction.text,
        processing_time,
        warnings: (!warnings.is_empty()).then_some(warnings),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// Pulls the `file` part out of the form. Other parts are drained and ignored.
async fn read_file_field(
    mut multipart: Multipart,
    options: &FileValidationOptions,
) -> Result<UploadedFile, AppError> {
    let mut saw_any_field = false;
    let mut uploaded = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_failure(e, "Malformed multipart body", options))?
    {
        saw_any_field = true;
        let is_file = field.name() == Some(FILE_FIELD);
        let file_name = field.file_name().map(str::to_string);
        let mime_type = field
            .content_type()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(FALLBACK_MIME)
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_failure(e, "Failed to read upload", options))?;

        if is_file && uploaded.is_none() {
            uploaded = Some((file_name, mime_type, data));
        } else {
            debug!("Ignoring extra multipart field ({} bytes)", data.len());
        }
    }

    if !saw_any_field {
        return Err(invalid_upload("No file uploaded".to_string()));
    }

    match uploaded {
        Some((Some(name), mime_type, data)) if !name.is_empty() && !data.is_empty() => {
            Ok(UploadedFile {
                name,
                mime_type,
                data,
            })
        }
        _ => Err(invalid_upload("Invalid file data".to_string())),
    }
}

/// A body cut off by the request size limit is reported as an oversized file,
/// not as a malformed form.
fn multipart_failure(err: MultipartError, context: &str, options: &FileValidationOptions) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return oversized_upload(None, options);
    }
    invalid_upload(format!("{context}: {err}"))
}

fn oversized_upload(size: Option<u64>, options: &FileValidationOptions) -> AppError {
    warn!("Upload exceeds size limit: declared={size:?}B, max={}B", options.max_size_bytes);
    AppError::InvalidUpload {
        message: "File validation failed".to_string(),
        details: vec![size_limit_error(size, options)],
        warnings: vec![],
    }
}

fn invalid_upload(message: String) -> AppError {
    AppError::InvalidUpload {
        message,
        details: vec![],
        warnings: vec![],
    }
}

/// Runs the parser off the async runtime. A panic inside a parser crate is
/// reported as an extraction failure rather than tearing down the request.
async fn extract_on_blocking_pool(data: Bytes, file_info: FileInfo) -> ExtractionResult {
    let fallback = file_info.clone();
    match tokio::task::spawn_blocking(move || extract_text(&data, file_info)).await {
        Ok(result) => result,
        Err(e) => extraction_failure(fallback, &format!("parser aborted: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::extraction::document::fixtures::{docx_bytes, pdf_bytes, sample_resume_lines};
    use crate::extraction::{DOCX_MIME, PDF_MIME};
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "X-ATS-SCANNER-BOUNDARY";

    fn app() -> Router {
        build_router(AppState::for_tests(None))
    }

    fn multipart_body(parts: &[(&str, Option<&str>, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, content_type, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match filename {
                Some(f) => format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n"),
                None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n"),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn upload(body: Vec<u8>) -> (StatusCode, Value) {
        send(body, false).await
    }

    async fn send(body: Vec<u8>, declare_length: bool) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if declare_length {
            builder = builder.header(header::CONTENT_LENGTH, body.len());
        }
        let request = builder.body(Body::from(body)).unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_docx_upload_returns_text_and_counts() {
        let docx = docx_bytes(&sample_resume_lines());
        let (status, json) = upload(multipart_body(&[(
            "file",
            Some("jane_doe_resume.docx"),
            DOCX_MIME,
            &docx,
        )]))
        .await;

        assert_eq!(status, StatusCode::OK, "body: {json}");
        assert_eq!(json["success"], true);
        let text = json["text"].as_str().unwrap();
        assert_eq!(json["wordCount"], text.split_whitespace().count());
        assert_eq!(json["charCount"], text.chars().count());
        assert_eq!(json["fileName"], "jane_doe_resume.docx");
        assert_eq!(json["fileType"], DOCX_MIME);
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_pdf_upload_returns_text_and_counts() {
        let pdf = pdf_bytes(&sample_resume_lines());
        let (status, json) = upload(multipart_body(&[(
            "file",
            Some("jane_doe_resume.pdf"),
            PDF_MIME,
            &pdf,
        )]))
        .await;

        assert_eq!(status, StatusCode::OK, "body: {json}");
        assert_eq!(json["success"], true);
        let text = json["text"].as_str().unwrap();
        assert!(text.chars().count() >= 100, "text: {text}");
        assert_eq!(json["wordCount"], text.split_whitespace().count());
        assert_eq!(json["fileType"], PDF_MIME);
    }

    #[tokio::test]
    async fn test_short_docx_upload_includes_warnings() {
        let docx = docx_bytes(&["Jane Doe", "Rust Engineer"]);
        let (status, json) =
            upload(multipart_body(&[("file", Some("cv.docx"), DOCX_MIME, &docx)])).await;

        assert_eq!(status, StatusCode::OK);
        let warnings = json["warnings"].as_array().unwrap();
        assert!(warnings
            .iter()
            .any(|w| w.as_str().unwrap().contains("Very little text")));
    }

    #[tokio::test]
    async fn test_wrong_type_is_rejected_before_extraction() {
        let (status, json) = upload(multipart_body(&[(
            "file",
            Some("resume.txt"),
            "text/plain",
            b"plain text resume",
        )]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "File validation failed");
        assert_eq!(json["statusCode"], 400);
        assert!(json["details"].as_array().unwrap().len() >= 2);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_unprocessable() {
        let garbage = vec![b'x'; 4096];
        let (status, json) =
            upload(multipart_body(&[("file", Some("resume.pdf"), PDF_MIME, &garbage)])).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "Text extraction failed");
        assert!(json["details"][0]
            .as_str()
            .unwrap()
            .starts_with("Text extraction failed:"));
    }

    #[tokio::test]
    async fn test_empty_form_is_rejected() {
        let (status, json) = upload(multipart_body(&[])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "INVALID_UPLOAD");
    }

    #[tokio::test]
    async fn test_missing_file_field_is_rejected() {
        let (status, json) =
            upload(multipart_body(&[("resume", None, "text/plain", b"hello")])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid file data");
    }

    #[tokio::test]
    async fn test_oversized_upload_reports_file_size() {
        let big = vec![b'%'; 12 * 1024 * 1024];
        let body = multipart_body(&[("file", Some("resume.pdf"), PDF_MIME, &big)]);
        let (status, json) = send(body, true).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "File validation failed");
        assert_eq!(json["code"], "INVALID_UPLOAD");
        assert_eq!(
            json["details"][0],
            "File size (12 MB) exceeds maximum allowed size of 10MB"
        );
    }

    #[tokio::test]
    async fn test_oversized_upload_without_length_hits_body_limit() {
        let big = vec![b'%'; 12 * 1024 * 1024];
        let body = multipart_body(&[("file", Some("resume.pdf"), PDF_MIME, &big)]);
        let (status, json) = send(body, false).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "File validation failed");
        assert_eq!(
            json["details"][0],
            "File size exceeds maximum allowed size of 10MB"
        );
    }
}
