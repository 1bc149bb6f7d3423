//! Axum route handlers for the analysis endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use tracing::{error, info};

use crate::analysis::coercion::coerce_analysis;
use crate::analysis::models::{AnalysisResult, AnalysisVariant, AnalyzeRequest};
use crate::analysis::request::{build_generation_request, validate_request};
use crate::analysis::scoring::{summarize, ScoreSummary};
use crate::errors::AppError;
use crate::state::AppState;

const RAW_PREVIEW_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub summary: ScoreSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub success: bool,
    /// The variant that actually served the request.
    pub variant: AnalysisVariant,
    pub data: AnalysisData,
    pub processing_time: u64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze
///
/// Resume vs job description. Without a job description this is served as an
/// ATS-only analysis.
pub async fn handle_analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    run_analysis(&state, body, AnalysisVariant::General).await
}

/// POST /api/analyze/ats
pub async fn handle_analyze_ats(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    run_analysis(&state, body, AnalysisVariant::Ats).await
}

/// POST /api/analyze/parsing
pub async fn handle_analyze_parsing(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    run_analysis(&state, body, AnalysisVariant::Parsing).await
}

/// validate → require generator → build prompt → generate → coerce.
async fn run_analysis(
    state: &AppState,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
    route_variant: AnalysisVariant,
) -> Result<Json<AnalysisResponse>, AppError> {
    let started = Instant::now();

    let Json(request) =
        body.map_err(|e| AppError::Validation(format!("Invalid request body: {}", e.body_text())))?;
    let validated = validate_request(request, route_variant)?;

    let generator = state
        .text_generator
        .as_ref()
        .ok_or_else(|| AppError::Configuration("Google API key not configured".to_string()))?;

    info!(
        "Starting {} analysis: resume_chars={}, has_job_description={}, strict_mode={}",
        validated.variant.as_str(),
        validated.resume_text.chars().count(),
        validated.job_description.is_some(),
        validated.options.strict_mode
    );

    let generation = build_generation_request(&validated, &state.config.gemini_model);
    let raw = generator
        .generate(&generation)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let result = coerce_analysis(&raw, validated.variant).map_err(|e| {
        let preview: String = raw.chars().take(RAW_PREVIEW_CHARS).collect();
        error!("Failed to parse AI response ({e}); raw output: {preview}");
        AppError::ResponseShape(e.to_string())
    })?;

    let processing_time = started.elapsed().as_millis() as u64;
    info!(
        "Analysis completed: variant={}, ats_score={}, job_match_score={}, keyword_match={}, took={}ms",
        validated.variant.as_str(),
        result.ats_score,
        result.job_match_score,
        result.keyword_analysis.match_percentage,
        processing_time
    );

    let summary = summarize(&result);
    Ok(Json(AnalysisResponse {
        success: true,
        variant: validated.variant,
        data: AnalysisData { result, summary },
        processing_time,
    }))
}
