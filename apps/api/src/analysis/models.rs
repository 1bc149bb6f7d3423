use serde::{Deserialize, Serialize};

/// Keyword overlap reported by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordAnalysis {
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    /// 0 – 100
    pub match_percentage: f64,
}

/// Coerced analysis returned to clients. Scores are always within 0 – 100
/// and every list respects the caps of the variant that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub ats_score: f64,
    pub job_match_score: f64,
    pub strengths: Vec<String>,
    pub missing: Vec<String>,
    pub recommendations: Vec<String>,
    pub keyword_analysis: KeywordAnalysis,
    pub format_issues: Vec<String>,
    pub industry_specific: Vec<String>,
}

/// Which analysis contract a request is served under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisVariant {
    /// Resume compared against a specific job description.
    General,
    /// ATS compatibility and general employability, no job description.
    Ats,
    /// Reports only what an ATS parser would actually extract.
    Parsing,
}

impl AnalysisVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisVariant::General => "general",
            AnalysisVariant::Ats => "ats",
            AnalysisVariant::Parsing => "parsing",
        }
    }
}

/// Request body shared by all analysis endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub options: Option<AnalysisOptions>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    #[serde(default)]
    pub strict_mode: bool,
    #[serde(default)]
    pub include_warnings: bool,
}
