use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::extraction::document::count_words;
use crate::session::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Processing,
    Success,
    Error,
}

/// A file picked by the user, kept so a failed upload can be resent.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub last_modified: Option<i64>,
    pub data: Bytes,
}

/// What the client reads back from `POST /api/upload`, success or error body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReply {
    #[serde(default)]
    pub success: bool,
    pub text: Option<String>,
    pub error: Option<String>,
    pub word_count: Option<usize>,
    pub char_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub success: bool,
    pub text: Option<String>,
    pub error: Option<String>,
    pub word_count: Option<usize>,
    pub char_count: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ResumeSession {
    pub file: Option<SelectedFile>,
    pub extracted_text: String,
    pub status: UploadStatus,
    pub error: Option<String>,
    /// 0 – 100
    pub progress: u8,
}

impl ResumeSession {
    pub fn set_file(&mut self, file: SelectedFile) {
        self.file = Some(file);
    }

    pub fn begin_upload(&mut self, file: SelectedFile) {
        self.status = UploadStatus::Uploading;
        self.error = None;
        self.progress = 0;
        self.set_file(file);
    }

    pub fn mark_processing(&mut self) {
        self.status = UploadStatus::Processing;
    }

    /// Applies the upload endpoint's reply. A success without text is a failure.
    pub fn apply_upload_response(&mut self, reply: UploadReply) -> UploadOutcome {
        match reply.text {
            Some(text) if reply.success && !text.is_empty() => {
                self.extracted_text = text.clone();
                self.status = UploadStatus::Success;
                self.progress = 100;
                UploadOutcome {
                    success: true,
                    text: Some(text),
                    error: None,
                    word_count: reply.word_count,
                    char_count: reply.char_count,
                }
            }
            _ => self.fail(reply.error.as_deref().unwrap_or("Upload failed")),
        }
    }

    /// Records a failed upload, including transport failures that never
    /// produced a reply.
    pub fn fail(&mut self, message: &str) -> UploadOutcome {
        self.status = UploadStatus::Error;
        self.error = Some(message.to_string());
        self.progress = 0;
        UploadOutcome {
            success: false,
            text: None,
            error: Some(message.to_string()),
            word_count: None,
            char_count: None,
        }
    }

    pub fn clear_file(&mut self) {
        *self = Self::default();
    }

    pub fn is_file_uploaded(&self) -> bool {
        self.file.is_some()
    }

    pub fn is_text_extracted(&self) -> bool {
        !self.extracted_text.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.is_file_uploaded() && self.is_text_extracted()
    }

    pub fn word_count(&self) -> usize {
        count_words(&self.extracted_text)
    }

    pub fn char_count(&self) -> usize {
        self.extracted_text.chars().count()
    }

    /// The file a retry would resend.
    pub fn retry_file(&self) -> Result<&SelectedFile, SessionError> {
        self.file.as_ref().ok_or(SessionError::NoFileToRetry)
    }
}
