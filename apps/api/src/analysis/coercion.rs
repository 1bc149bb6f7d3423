//! Response coercion: turns raw model output into a bounded `AnalysisResult`.
//!
//! Steps: strip fences and stray prose → parse JSON → require fields →
//! clamp scores to 0–100 → truncate lists → blank variant-excluded fields.
//! Malformed output is a hard failure for the request. It is never repaired.

use serde::Deserialize;
use thiserror::Error;

use crate::analysis::models::{AnalysisResult, AnalysisVariant, KeywordAnalysis};

#[derive(Debug, Error)]
pub enum CoercionError {
    #[error("response contains no JSON object")]
    NoJsonObject,

    #[error("invalid analysis JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Per-variant list caps and forced-empty fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercionProfile {
    /// strengths, missing, recommendations
    pub max_findings: usize,
    /// formatIssues, industrySpecific
    pub max_notes: usize,
    pub max_matched_keywords: usize,
    pub max_missing_keywords: usize,
    pub clear_industry_specific: bool,
    pub clear_missing_keywords: bool,
}

impl CoercionProfile {
    pub fn for_variant(variant: AnalysisVariant) -> Self {
        let base = Self {
            max_findings: 6,
            max_notes: 5,
            max_matched_keywords: 15,
            max_missing_keywords: 10,
            clear_industry_specific: false,
            clear_missing_keywords: false,
        };
        match variant {
            AnalysisVariant::General => Self {
                max_findings: 7,
                ..base
            },
            AnalysisVariant::Ats => base,
            AnalysisVariant::Parsing => Self {
                clear_industry_specific: true,
                clear_missing_keywords: true,
                ..base
            },
        }
    }
}

/// Shape the model is asked for. Lists that the model sometimes omits or
/// nulls are optional here and default to empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    ats_score: f64,
    job_match_score: f64,
    strengths: Vec<String>,
    missing: Vec<String>,
    recommendations: Vec<String>,
    keyword_analysis: RawKeywordAnalysis,
    #[serde(default)]
    format_issues: Option<Vec<String>>,
    #[serde(default)]
    industry_specific: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawKeywordAnalysis {
    matched_keywords: Vec<String>,
    missing_keywords: Vec<String>,
    match_percentage: f64,
}

/// Removes code fences and anything before the first `{` or after the last `}`.
pub fn clean_response_text(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| raw[start..=end].trim())
}

pub fn coerce_analysis(raw: &str, variant: AnalysisVariant) -> Result<AnalysisResult, CoercionError> {
    let json = clean_response_text(raw).ok_or(CoercionError::NoJsonObject)?;
    let parsed: RawAnalysis = serde_json::from_str(json)?;
    Ok(apply_profile(parsed, CoercionProfile::for_variant(variant)))
}

fn apply_profile(raw: RawAnalysis, profile: CoercionProfile) -> AnalysisResult {
    let missing_keywords = if profile.clear_missing_keywords {
        Vec::new()
    } else {
        truncate(raw.keyword_analysis.missing_keywords, profile.max_missing_keywords)
    };
    let industry_specific = if profile.clear_industry_specific {
        Vec::new()
    } else {
        truncate(raw.industry_specific.unwrap_or_default(), profile.max_notes)
    };

    AnalysisResult {
        ats_score: clamp_score(raw.ats_score),
        job_match_score: clamp_score(raw.job_match_score),
        strengths: truncate(raw.strengths, profile.max_findings),
        missing: truncate(raw.missing, profile.max_findings),
        recommendations: truncate(raw.recommendations, profile.max_findings),
        keyword_analysis: KeywordAnalysis {
            matched_keywords: truncate(
                raw.keyword_analysis.matched_keywords,
                profile.max_matched_keywords,
            ),
            missing_keywords,
            match_percentage: clamp_score(raw.keyword_analysis.match_percentage),
        },
        format_issues: truncate(raw.format_issues.unwrap_or_default(), profile.max_notes),
        industry_specific,
    }
}

pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

fn truncate(mut items: Vec<String>, max: usize) -> Vec<String> {
    items.truncate(max);
    items
}
