//! Analysis request validation and prompt assembly.

use crate::analysis::models::{AnalysisOptions, AnalysisVariant, AnalyzeRequest};
use crate::analysis::prompts::*;
use crate::errors::AppError;
use crate::llm_client::prompts::{ANALYSIS_JSON_SHAPE, ATS_KNOWLEDGE, JSON_ONLY_RULE};
use crate::llm_client::{GenerationConfig, GenerationRequest};

pub const MIN_RESUME_CHARS: usize = 100;
pub const MAX_RESUME_CHARS: usize = 50_000;
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 50;
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 20_000;

/// A request that passed input validation, bound to the variant that will serve it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub variant: AnalysisVariant,
    pub resume_text: String,
    pub job_description: Option<String>,
    pub options: AnalysisOptions,
}

/// Validates input lengths (in characters) and resolves the variant.
///
/// The general route without a job description is served as an ATS-only
/// analysis. The ATS and parsing routes ignore any job description sent.
pub fn validate_request(
    request: AnalyzeRequest,
    route_variant: AnalysisVariant,
) -> Result<ValidatedRequest, AppError> {
    let resume_text = request
        .resume_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing resumeText in request body".to_string()))?;

    let resume_chars = resume_text.chars().count();
    if resume_chars < MIN_RESUME_CHARS {
        return Err(AppError::Validation(format!(
            "Resume text too short (minimum {MIN_RESUME_CHARS} characters)"
        )));
    }
    if resume_chars > MAX_RESUME_CHARS {
        return Err(AppError::Validation(
            "Resume text too long (maximum 50,000 characters)".to_string(),
        ));
    }

    let job_description = match route_variant {
        AnalysisVariant::General => request.job_description.filter(|t| !t.trim().is_empty()),
        AnalysisVariant::Ats | AnalysisVariant::Parsing => None,
    };

    if let Some(jd) = &job_description {
        let jd_chars = jd.chars().count();
        if jd_chars < MIN_JOB_DESCRIPTION_CHARS {
            return Err(AppError::Validation(format!(
                "Job description too short (minimum {MIN_JOB_DESCRIPTION_CHARS} characters)"
            )));
        }
        if jd_chars > MAX_JOB_DESCRIPTION_CHARS {
            return Err(AppError::Validation(
                "Job description too long (maximum 20,000 characters)".to_string(),
            ));
        }
    }

    let variant = match (route_variant, &job_description) {
        (AnalysisVariant::General, None) => AnalysisVariant::Ats,
        (variant, _) => variant,
    };

    Ok(ValidatedRequest {
        variant,
        resume_text,
        job_description,
        options: request.options.unwrap_or_default(),
    })
}

/// Assembles the text-generation call for a validated request.
pub fn build_generation_request(request: &ValidatedRequest, model: &str) -> GenerationRequest {
    let (intro, scoring, template) = match request.variant {
        AnalysisVariant::General => (GENERAL_SYSTEM_INTRO, GENERAL_SCORING, GENERAL_PROMPT_TEMPLATE),
        AnalysisVariant::Ats => (ATS_SYSTEM_INTRO, ATS_SCORING, ATS_PROMPT_TEMPLATE),
        AnalysisVariant::Parsing => (PARSING_SYSTEM_INTRO, PARSING_SCORING, PARSING_PROMPT_TEMPLATE),
    };

    let system_instruction =
        format!("{intro}\n\n{ATS_KNOWLEDGE}\n\n{JSON_ONLY_RULE}\n\n{ANALYSIS_JSON_SHAPE}\n\n{scoring}");

    let mut prompt = fill_template(
        template,
        &[
            ("{resume_text}", request.resume_text.as_str()),
            ("{job_description}", request.job_description.as_deref().unwrap_or("")),
        ],
    );
    if request.options.strict_mode {
        prompt.push_str("\n\n");
        prompt.push_str(STRICT_MODE_INSTRUCTION);
    }
    if request.options.include_warnings {
        prompt.push_str("\n\n");
        prompt.push_str(INCLUDE_WARNINGS_INSTRUCTION);
    }

    GenerationRequest {
        model: model.to_string(),
        prompt,
        system_instruction,
        config: sampling_for(request.variant),
    }
}

/// Substitutes placeholders in one pass over the template, so user text that
/// happens to contain a placeholder is never expanded.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((at, key, value)) = values
        .iter()
        .filter_map(|&(key, value)| rest.find(key).map(|at| (at, key, value)))
        .min_by_key(|&(at, _, _)| at)
    {
        filled.push_str(&rest[..at]);
        filled.push_str(value);
        rest = &rest[at + key.len()..];
    }
    filled.push_str(rest);
    filled
}

/// The general variant runs on vendor defaults. The ATS-focused variants
/// sample colder for more consistent scores.
fn sampling_for(variant: AnalysisVariant) -> GenerationConfig {
    match variant {
        AnalysisVariant::General => GenerationConfig::default(),
        AnalysisVariant::Ats => GenerationConfig {
            temperature: Some(0.3),
            top_p: Some(0.8),
            top_k: Some(40),
            max_output_tokens: Some(2048),
        },
        AnalysisVariant::Parsing => GenerationConfig {
            temperature: Some(0.2),
            top_p: Some(0.8),
            top_k: Some(40),
            max_output_tokens: Some(2048),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(resume_chars: usize, jd: Option<&str>) -> AnalyzeRequest {
        AnalyzeRequest {
            resume_text: Some("r".repeat(resume_chars)),
            job_description: jd.map(str::to_string),
            options: None,
        }
    }

    fn validation_message(result: Result<ValidatedRequest, AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_resume_text() {
        let msg = validation_message(validate_request(AnalyzeRequest::default(), AnalysisVariant::Ats));
        assert_eq!(msg, "Missing resumeText in request body");
    }

    #[test]
    fn test_blank_resume_text_counts_as_missing() {
        let req = AnalyzeRequest {
            resume_text: Some("   \n ".to_string()),
            ..AnalyzeRequest::default()
        };
        let msg = validation_message(validate_request(req, AnalysisVariant::Ats));
        assert!(msg.starts_with("Missing resumeText"));
    }

    #[test]
    fn test_99_chars_is_too_short() {
        let msg = validation_message(validate_request(request(99, None), AnalysisVariant::Ats));
        assert_eq!(msg, "Resume text too short (minimum 100 characters)");
    }

    #[test]
    fn test_100_chars_is_accepted() {
        assert!(validate_request(request(100, None), AnalysisVariant::Ats).is_ok());
    }

    #[test]
    fn test_length_is_counted_in_characters() {
        let req = AnalyzeRequest {
            resume_text: Some("é".repeat(99)),
            ..AnalyzeRequest::default()
        };
        assert!(validate_request(req, AnalysisVariant::Ats).is_err());
    }

    #[test]
    fn test_too_long_resume() {
        let msg = validation_message(validate_request(request(50_001, None), AnalysisVariant::Ats));
        assert_eq!(msg, "Resume text too long (maximum 50,000 characters)");
    }

    #[test]
    fn test_short_job_description_rejected_on_general_route() {
        let msg = validation_message(validate_request(
            request(500, Some("Rust engineer")),
            AnalysisVariant::General,
        ));
        assert!(msg.starts_with("Job description too short"));
    }

    #[test]
    fn test_ats_route_ignores_job_description() {
        let validated =
            validate_request(request(500, Some("short")), AnalysisVariant::Ats).unwrap();
        assert_eq!(validated.job_description, None);
        assert_eq!(validated.variant, AnalysisVariant::Ats);
    }

    #[test]
    fn test_general_route_without_job_description_runs_ats() {
        let validated = validate_request(request(500, None), AnalysisVariant::General).unwrap();
        assert_eq!(validated.variant, AnalysisVariant::Ats);
    }

    #[test]
    fn test_general_prompt_embeds_both_texts() {
        let jd = "Senior Rust Engineer. Required: Rust, Kafka, Kubernetes, PostgreSQL experience.";
        let validated =
            validate_request(request(200, Some(jd)), AnalysisVariant::General).unwrap();
        assert_eq!(validated.variant, AnalysisVariant::General);

        let built = build_generation_request(&validated, "gemini-2.5-flash");
        assert!(built.prompt.contains(jd));
        assert!(built.prompt.contains(&"r".repeat(200)));
        assert!(!built.prompt.contains("{resume_text}"));
        assert!(built.system_instruction.contains("\"atsScore\""));
        assert_eq!(built.config, GenerationConfig::default());
        assert_eq!(built.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_placeholders_inside_user_text_are_not_expanded() {
        let jd = "Backend role. Paste your {resume_text} here and mention {job_description} twice.";
        let validated =
            validate_request(request(300, Some(jd)), AnalysisVariant::General).unwrap();
        let built = build_generation_request(&validated, "m");

        assert_eq!(built.prompt.matches(&"r".repeat(300)).count(), 1);
        assert!(built.prompt.contains(jd));
    }

    #[test]
    fn test_fill_template_replaces_every_occurrence() {
        let filled = fill_template("{a} and {b}, then {a}", &[("{a}", "x"), ("{b}", "{a}")]);
        assert_eq!(filled, "x and {a}, then x");
    }

    #[test]
    fn test_ats_request_uses_cold_sampling() {
        let validated = validate_request(request(200, None), AnalysisVariant::Ats).unwrap();
        let built = build_generation_request(&validated, "m");
        assert_eq!(built.config.temperature, Some(0.3));
        assert_eq!(built.config.max_output_tokens, Some(2048));
        assert!(built.prompt.contains("WITHOUT requiring a specific job description"));
    }

    #[test]
    fn test_options_append_instructions() {
        let mut req = request(200, None);
        req.options = Some(AnalysisOptions {
            strict_mode: true,
            include_warnings: true,
        });
        let validated = validate_request(req, AnalysisVariant::Parsing).unwrap();
        let built = build_generation_request(&validated, "m");
        assert!(built.prompt.contains(STRICT_MODE_INSTRUCTION));
        assert!(built.prompt.contains(INCLUDE_WARNINGS_INSTRUCTION));
    }
}
