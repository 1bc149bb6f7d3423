// Shared prompt fragments used by every analysis variant.
// Variant-specific prompts live in analysis/prompts.rs.

/// Appended to every system instruction. The coercer still strips fences and
/// stray prose because the model does not always comply.
pub const JSON_ONLY_RULE: &str = "RESPONSE FORMAT: You must respond with valid JSON only. \
No additional text, markdown, or formatting. Do NOT wrap the object in code fences.";

/// The JSON object every analysis variant must return.
pub const ANALYSIS_JSON_SHAPE: &str = r#"Required JSON structure:
{
  "atsScore": 85,
  "jobMatchScore": 78,
  "strengths": ["Strong technical skills", "Relevant experience"],
  "missing": ["Python", "AWS certification"],
  "recommendations": ["Add Python projects", "Get AWS certification"],
  "keywordAnalysis": {
    "matchedKeywords": ["JavaScript", "React", "Node.js"],
    "missingKeywords": ["Python", "AWS", "Docker"],
    "matchPercentage": 65
  },
  "formatIssues": ["Contact info may be in header", "Use standard fonts"],
  "industrySpecific": ["Include relevant certifications", "Add quantified metrics"]
}"#;

/// Background every variant shares about how screening software behaves.
pub const ATS_KNOWLEDGE: &str = "\
CRITICAL ATS KNOWLEDGE:
- 98.4% of Fortune 500 companies use ATS systems
- Modern ATS rank and organize candidates rather than automatically reject them
- 90-95% of resumes are actually reviewed by humans after ATS ranking
- ATS parsing accuracy varies significantly based on formatting choices
- Skills-based hiring is now used by 81% of employers
- Headers/footers, tables, and graphics still cause parsing issues";
