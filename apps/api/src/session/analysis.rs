use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::models::AnalysisResult;
use crate::session::resume::ResumeSession;
use crate::session::SessionError;

const HISTORY_LIMIT: usize = 10;
const FALLBACK_FAILURE: &str = "ATS analysis failed without error message";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Ats,
    Job,
}

impl AnalysisKind {
    fn id_prefix(&self) -> &'static str {
        match self {
            AnalysisKind::Ats => "ats-",
            AnalysisKind::Job => "job-",
        }
    }

    fn of_id(id: &str) -> Option<Self> {
        [AnalysisKind::Ats, AnalysisKind::Job]
            .into_iter()
            .find(|kind| id.starts_with(kind.id_prefix()))
    }
}

/// A stored analysis result, stamped when it arrived.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub analysis_date: DateTime<Utc>,
    pub processing_time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisFailure {
    pub message: String,
    pub code: String,
    pub timestamp: DateTime<Utc>,
    pub retryable: bool,
}

impl AnalysisFailure {
    fn categorized(message: &str, timestamp: DateTime<Utc>) -> Self {
        let (code, retryable) = categorize_failure(message);
        Self {
            message: message.to_string(),
            code: code.to_string(),
            timestamp,
            retryable,
        }
    }

    fn from_session_error(err: &SessionError, timestamp: DateTime<Utc>) -> Self {
        Self {
            message: err.to_string(),
            code: err.code().to_string(),
            timestamp,
            retryable: false,
        }
    }
}

/// What the client reads back from an analysis endpoint, success or error body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReply {
    #[serde(default)]
    pub success: bool,
    pub data: Option<AnalysisResult>,
    pub error: Option<String>,
    pub processing_time: Option<u64>,
}

/// The request a manual retry would send.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryPlan {
    Ats { resume_text: String },
}

/// Maps a failure message to its error code and whether retrying can help.
/// First match wins.
pub fn categorize_failure(message: &str) -> (&'static str, bool) {
    const RULES: &[(&str, &str, bool)] = &[
        ("Missing resumeText", "MISSING_RESUME_TEXT", false),
        ("too short", "RESUME_TOO_SHORT", false),
        ("too long", "RESUME_TOO_LONG", false),
        ("API key", "API_KEY_ERROR", false),
        ("Failed to parse", "PARSING_ERROR", true),
        ("AI analysis failed", "AI_SERVICE_ERROR", true),
        ("fetch", "NETWORK_ERROR", true),
    ];
    RULES
        .iter()
        .find(|(needle, _, _)| message.contains(needle))
        .map(|(_, code, retryable)| (*code, *retryable))
        .unwrap_or(("ATS_ANALYSIS_FAILED", true))
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    pub analyzing_ats: bool,
    pub analyzing_job: bool,
    pub ats_result: Option<AnalysisRecord>,
    pub job_result: Option<AnalysisRecord>,
    pub error: Option<AnalysisFailure>,
    pub current_analysis_id: Option<String>,
    /// Newest first.
    pub history: Vec<AnalysisRecord>,
}

impl AnalysisSession {
    pub fn is_analyzing(&self) -> bool {
        self.analyzing_ats || self.analyzing_job
    }

    pub fn has_ats_results(&self) -> bool {
        self.ats_result.is_some()
    }

    pub fn has_any_results(&self) -> bool {
        self.ats_result.is_some() || self.job_result.is_some()
    }

    /// Starts an ATS analysis and returns its id.
    pub fn begin_ats(&mut self) -> &str {
        self.begin(AnalysisKind::Ats)
    }

    /// Starts a job-description comparison and returns its id.
    pub fn begin_job(&mut self) -> &str {
        self.begin(AnalysisKind::Job)
    }

    fn begin(&mut self, kind: AnalysisKind) -> &str {
        match kind {
            AnalysisKind::Ats => self.analyzing_ats = true,
            AnalysisKind::Job => self.analyzing_job = true,
        }
        self.error = None;
        self.current_analysis_id
            .insert(format!("{}{}", kind.id_prefix(), Uuid::new_v4()))
    }

    /// Applies an ATS reply. Successful results are also pushed to history.
    pub fn apply_ats_response(&mut self, reply: AnalysisReply, received_at: DateTime<Utc>) -> bool {
        self.analyzing_ats = false;
        match Self::record_from(reply, received_at) {
            Ok(record) => {
                self.history.insert(0, record.clone());
                self.history.truncate(HISTORY_LIMIT);
                self.ats_result = Some(record);
                true
            }
            Err(message) => {
                self.fail(&message, received_at);
                false
            }
        }
    }

    pub fn apply_job_response(&mut self, reply: AnalysisReply, received_at: DateTime<Utc>) -> bool {
        self.analyzing_job = false;
        match Self::record_from(reply, received_at) {
            Ok(record) => {
                self.job_result = Some(record);
                true
            }
            Err(message) => {
                self.fail(&message, received_at);
                false
            }
        }
    }

    fn record_from(reply: AnalysisReply, received_at: DateTime<Utc>) -> Result<AnalysisRecord, String> {
        match reply.data {
            Some(result) if reply.success => Ok(AnalysisRecord {
                result,
                analysis_date: received_at,
                processing_time: reply.processing_time,
            }),
            _ => Err(reply.error.unwrap_or_else(|| FALLBACK_FAILURE.to_string())),
        }
    }

    /// Records a failure, categorized from its message.
    pub fn fail(&mut self, message: &str, at: DateTime<Utc>) -> &AnalysisFailure {
        self.analyzing_ats = false;
        self.analyzing_job = false;
        self.error.insert(AnalysisFailure::categorized(message, at))
    }

    /// Works out what a manual retry would run. Failures that make a retry
    /// impossible are recorded as the current (non-retryable) error.
    pub fn retry_plan(&mut self, resume: &ResumeSession) -> Result<RetryPlan, SessionError> {
        if !self.error.as_ref().is_some_and(|e| e.retryable) {
            return Err(SessionError::NotRetryable);
        }

        let plan = if !resume.is_text_extracted() {
            Err(SessionError::NoResumeText)
        } else {
            match self.current_analysis_id.as_deref().and_then(AnalysisKind::of_id) {
                Some(AnalysisKind::Ats) => Ok(RetryPlan::Ats {
                    resume_text: resume.extracted_text.clone(),
                }),
                Some(AnalysisKind::Job) => Err(SessionError::MissingJobDescription),
                None => Err(SessionError::NotRetryable),
            }
        };

        if let Err(err @ (SessionError::NoResumeText | SessionError::MissingJobDescription)) = &plan {
            self.error = Some(AnalysisFailure::from_session_error(err, Utc::now()));
        }
        plan
    }

    pub fn clear_results(&mut self) {
        self.ats_result = None;
        self.job_result = None;
        self.error = None;
        self.current_analysis_id = None;
    }

    pub fn clear_ats_results(&mut self) {
        self.ats_result = None;
        self.clear_current_id_of(AnalysisKind::Ats);
    }

    pub fn clear_job_results(&mut self) {
        self.job_result = None;
        self.clear_current_id_of(AnalysisKind::Job);
    }

    fn clear_current_id_of(&mut self, kind: AnalysisKind) {
        if self
            .current_analysis_id
            .as_deref()
            .is_some_and(|id| id.starts_with(kind.id_prefix()))
        {
            self.current_analysis_id = None;
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// History entries are keyed by their analysis date.
    pub fn history_entry(&self, analysis_date: DateTime<Utc>) -> Option<&AnalysisRecord> {
        self.history.iter().find(|r| r.analysis_date == analysis_date)
    }

    /// The more recent of the stored ATS and job results.
    pub fn last_analysis_type(&self) -> Option<AnalysisKind> {
        match (&self.ats_result, &self.job_result) {
            (Some(ats), Some(job)) if ats.analysis_date > job.analysis_date => Some(AnalysisKind::Ats),
            (Some(_), Some(_)) => Some(AnalysisKind::Job),
            (Some(_), None) => Some(AnalysisKind::Ats),
            (None, Some(_)) => Some(AnalysisKind::Job),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    use crate::session::resume::UploadReply;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn ok_reply(ats_score: f64) -> AnalysisReply {
        serde_json::from_value(json!({
            "success": true,
            "variant": "ats",
            "data": {
                "atsScore": ats_score,
                "jobMatchScore": 61,
                "strengths": ["Clear headers"],
                "missing": [],
                "recommendations": ["Add metrics"],
                "keywordAnalysis": {"matchedKeywords": ["Rust"], "missingKeywords": [], "matchPercentage": 55},
                "formatIssues": [],
                "industrySpecific": [],
                "summary": {"atsLabel": "Good", "jobMatchLabel": "Good", "keywordLabel": "Optimal Range"}
            },
            "processingTime": 1834
        }))
        .unwrap()
    }

    fn error_reply(message: &str) -> AnalysisReply {
        AnalysisReply {
            error: Some(message.to_string()),
            ..AnalysisReply::default()
        }
    }

    fn ready_resume() -> ResumeSession {
        let mut resume = ResumeSession::default();
        resume.apply_upload_response(UploadReply {
            success: true,
            text: Some("Jane Doe, Senior Engineer".to_string()),
            ..UploadReply::default()
        });
        resume
    }

    #[test]
    fn test_categorize_failure() {
        let cases = [
            ("Missing resumeText in request body", "MISSING_RESUME_TEXT", false),
            ("Resume text too short (minimum 100 characters)", "RESUME_TOO_SHORT", false),
            ("Resume text too long (maximum 50,000 characters)", "RESUME_TOO_LONG", false),
            ("Google API key not configured", "API_KEY_ERROR", false),
            ("Failed to parse analysis results - invalid AI response format", "PARSING_ERROR", true),
            ("AI analysis failed: upstream returned 503", "AI_SERVICE_ERROR", true),
            ("Failed to fetch", "NETWORK_ERROR", true),
            ("something odd", "ATS_ANALYSIS_FAILED", true),
        ];
        for (message, code, retryable) in cases {
            assert_eq!(categorize_failure(message), (code, retryable), "{message}");
        }
    }

    #[test]
    fn test_begin_ats_assigns_prefixed_id() {
        let mut session = AnalysisSession::default();
        session.fail("stale", at(0));
        let id = session.begin_ats().to_string();
        assert!(id.starts_with("ats-"));
        assert!(session.analyzing_ats);
        assert!(session.is_analyzing());
        assert_eq!(session.error, None);
        assert!(session.begin_job().starts_with("job-"));
    }

    #[test]
    fn test_successful_reply_is_stored_and_recorded() {
        let mut session = AnalysisSession::default();
        session.begin_ats();
        assert!(session.apply_ats_response(ok_reply(78.0), at(1)));

        assert!(!session.is_analyzing());
        let stored = session.ats_result.as_ref().unwrap();
        assert_eq!(stored.result.ats_score, 78.0);
        assert_eq!(stored.processing_time, Some(1834));
        assert_eq!(session.history_entry(at(1)).unwrap().result.ats_score, 78.0);
        assert!(session.history_entry(at(2)).is_none());
    }

    #[test]
    fn test_history_keeps_last_ten_newest_first() {
        let mut session = AnalysisSession::default();
        for i in 0..12 {
            session.begin_ats();
            session.apply_ats_response(ok_reply(i as f64), at(i));
        }
        assert_eq!(session.history.len(), 10);
        assert_eq!(session.history[0].result.ats_score, 11.0);
        assert_eq!(session.history[9].result.ats_score, 2.0);
    }

    #[test]
    fn test_failed_reply_is_categorized() {
        let mut session = AnalysisSession::default();
        session.begin_ats();
        assert!(!session.apply_ats_response(
            error_reply("Resume text too short (minimum 100 characters)"),
            at(0)
        ));
        let error = session.error.as_ref().unwrap();
        assert_eq!(error.code, "RESUME_TOO_SHORT");
        assert!(!error.retryable);
        assert!(!session.analyzing_ats);

        session.apply_ats_response(AnalysisReply::default(), at(1));
        assert_eq!(session.error.as_ref().unwrap().message, FALLBACK_FAILURE);
    }

    #[test]
    fn test_retry_plan_reruns_ats_with_extracted_text() {
        let mut session = AnalysisSession::default();
        session.begin_ats();
        session.apply_ats_response(error_reply("AI analysis failed: timeout"), at(0));

        let plan = session.retry_plan(&ready_resume()).unwrap();
        assert_eq!(
            plan,
            RetryPlan::Ats {
                resume_text: "Jane Doe, Senior Engineer".to_string()
            }
        );
    }

    #[test]
    fn test_retry_plan_refuses_non_retryable_errors() {
        let mut session = AnalysisSession::default();
        session.begin_ats();
        session.apply_ats_response(error_reply("Google API key not configured"), at(0));
        assert_eq!(session.retry_plan(&ready_resume()), Err(SessionError::NotRetryable));
        assert_eq!(session.error.as_ref().unwrap().code, "API_KEY_ERROR");
    }

    #[test]
    fn test_retry_plan_without_resume_text_records_error() {
        let mut session = AnalysisSession::default();
        session.begin_ats();
        session.fail("Failed to fetch", at(0));

        let err = session.retry_plan(&ResumeSession::default()).unwrap_err();
        assert_eq!(err, SessionError::NoResumeText);
        let error = session.error.as_ref().unwrap();
        assert_eq!(error.code, "NO_RESUME_TEXT");
        assert!(!error.retryable);
    }

    #[test]
    fn test_retry_plan_for_job_comparison_needs_description() {
        let mut session = AnalysisSession::default();
        session.begin_job();
        session.fail("AI analysis failed: timeout", at(0));
        assert_eq!(
            session.retry_plan(&ready_resume()),
            Err(SessionError::MissingJobDescription)
        );
        assert_eq!(session.error.as_ref().unwrap().code, "MISSING_JOB_DESCRIPTION");
    }

    #[test]
    fn test_last_analysis_type_prefers_newest() {
        let mut session = AnalysisSession::default();
        assert_eq!(session.last_analysis_type(), None);

        session.apply_ats_response(ok_reply(70.0), at(5));
        assert_eq!(session.last_analysis_type(), Some(AnalysisKind::Ats));

        session.apply_job_response(ok_reply(60.0), at(3));
        assert_eq!(session.last_analysis_type(), Some(AnalysisKind::Ats));

        session.apply_job_response(ok_reply(60.0), at(9));
        assert_eq!(session.last_analysis_type(), Some(AnalysisKind::Job));
    }

    #[test]
    fn test_clear_functions() {
        let mut session = AnalysisSession::default();
        session.begin_ats();
        session.apply_ats_response(ok_reply(70.0), at(0));

        session.clear_job_results();
        assert!(session.current_analysis_id.is_some());

        session.clear_ats_results();
        assert!(!session.has_ats_results());
        assert_eq!(session.current_analysis_id, None);
        assert_eq!(session.history.len(), 1);

        session.fail("Failed to fetch", at(1));
        session.clear_error();
        assert_eq!(session.error, None);

        session.begin_job();
        session.apply_job_response(ok_reply(50.0), at(2));
        session.clear_results();
        assert!(!session.has_any_results());
        assert_eq!(session.current_analysis_id, None);
    }
}
