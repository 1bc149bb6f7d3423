use serde::Serialize;

use crate::analysis::models::AnalysisResult;

/// Display band for a 0 – 100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsWork,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 60.0 {
            ScoreBand::Good
        } else if score >= 40.0 {
            ScoreBand::NeedsWork
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::NeedsWork => "Needs Work",
            ScoreBand::Poor => "Poor",
        }
    }
}

/// Keyword match is best in the 50 – 70% range. Higher reads as keyword stuffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeywordBand {
    Optimal,
    Acceptable,
    TooLow,
    TooHigh,
}

impl KeywordBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if (50.0..=70.0).contains(&percentage) {
            KeywordBand::Optimal
        } else if (40.0..=80.0).contains(&percentage) {
            KeywordBand::Acceptable
        } else if percentage < 40.0 {
            KeywordBand::TooLow
        } else {
            KeywordBand::TooHigh
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KeywordBand::Optimal => "Optimal Range",
            KeywordBand::Acceptable => "Acceptable",
            KeywordBand::TooLow => "Too Low",
            KeywordBand::TooHigh => "Too High",
        }
    }
}

/// Labels sent next to the scores so every client renders the same wording.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub ats_label: &'static str,
    pub job_match_label: &'static str,
    pub keyword_label: &'static str,
}

pub fn summarize(result: &AnalysisResult) -> ScoreSummary {
    ScoreSummary {
        ats_label: ScoreBand::from_score(result.ats_score).label(),
        job_match_label: ScoreBand::from_score(result.job_match_score).label(),
        keyword_label: KeywordBand::from_percentage(result.keyword_analysis.match_percentage)
            .label(),
    }
}
