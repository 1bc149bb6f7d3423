// Analysis prompt templates, one system instruction and one prompt per variant.
// Placeholders: {resume_text}, {job_description}.

pub const GENERAL_SYSTEM_INTRO: &str = "You are an expert ATS (Applicant Tracking System) \
analyzer with deep knowledge of how modern ATS platforms (Workday, Taleo, Greenhouse, iCIMS, \
BambooHR) actually function. Optimal keyword match rate is 50-70% (not 100%).";

pub const GENERAL_SCORING: &str = "Scores: 0-100. Arrays: 3-7 items each.";

pub const GENERAL_PROMPT_TEMPLATE: &str = r#"Perform comprehensive ATS analysis of this resume against the job description:

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}

ANALYSIS REQUIREMENTS:

1. ATS COMPATIBILITY SCORE (atsScore):
   - Evaluate formatting for parsing success (standard fonts, simple layout, no tables/graphics)
   - Check for ATS-breaking elements (headers/footers, complex formatting, unusual characters)
   - Assess section structure, headers and date formats
   - Consider contact information placement and formatting

2. JOB MATCH SCORE (jobMatchScore):
   - Calculate keyword alignment (target 50-70% match rate, not 100%)
   - Evaluate skills relevance and experience match
   - Assess education and certification requirements
   - Analyze role level and responsibility alignment

3. STRENGTHS: strong keyword matches, relevant experience, quantified accomplishments.

4. MISSING: critical keywords, skills, technologies or certifications from the job description absent in the resume.

5. RECOMMENDATIONS: specific keyword integration, formatting fixes and content additions.

6. KEYWORD ANALYSIS:
   - matchedKeywords: terms found in both resume and job description
   - missingKeywords: important job description terms absent in the resume
   - matchPercentage: calculated keyword overlap

7. FORMAT ISSUES: specific ATS parsing problems (tables, graphics, headers/footers, dates, contact info).

8. INDUSTRY-SPECIFIC INSIGHTS: sector-specific optimization and certification priorities.

Balance ATS optimization with human readability. Provide specific, actionable insights based on current ATS functionality, not outdated myths."#;

pub const ATS_SYSTEM_INTRO: &str = "You are an expert ATS (Applicant Tracking System) \
compatibility analyzer with deep knowledge of how modern ATS platforms (Workday, Taleo, \
Greenhouse, iCIMS, BambooHR, Lever) actually function. Optimal keyword density is 1.5-2.5% \
of total text (not keyword stuffing).";

pub const ATS_SCORING: &str = "Scoring Guidelines:
- atsScore: 0-100 (ATS parsing and compatibility)
- jobMatchScore: 0-100 (general employability and keyword optimization)
- Arrays: 3-6 items each, specific and actionable";

pub const ATS_PROMPT_TEMPLATE: &str = r#"Perform comprehensive ATS compatibility analysis of this resume. Focus on parsing success, keyword optimization, and general employability WITHOUT requiring a specific job description.

RESUME TO ANALYZE:
{resume_text}

ANALYSIS REQUIREMENTS:

1. ATS COMPATIBILITY SCORE (atsScore 0-100): formatting compatibility, parsing likelihood, section header recognition, contact information placement, date consistency, absence of ATS-breaking elements.

2. GENERAL JOB MATCH SCORE (jobMatchScore 0-100): industry keyword presence and density, skills section completeness, terminology, career progression, quantified achievements.

3. STRENGTHS: well-formatted sections, strong terminology, quantified impact.

4. MISSING: standard sections, keyword optimization gaps, absent metrics, structural problems.

5. RECOMMENDATIONS: formatting changes, keyword placement, section organization, quantification opportunities.

6. KEYWORD ANALYSIS:
   - matchedKeywords: professional terms, skills and industry keywords found
   - missingKeywords: common professional terms that could strengthen the resume
   - matchPercentage: overall keyword density and terminology usage

7. FORMAT ISSUES: headers/footers, tables, graphics, fonts, section headers, contact info, dates.

8. INDUSTRY-SPECIFIC INSIGHTS: certifications, terminology trends, sector formatting practices.

This is ATS-only analysis focusing on parsing success and general professional optimization, not job-specific matching."#;

pub const PARSING_SYSTEM_INTRO: &str = "You simulate the resume parser of a modern ATS \
(Workday, Taleo, Greenhouse, iCIMS, Lever). You report only what such a parser would \
technically extract from the plain text below: contact fields, section headers, job titles, \
employers, dates, degrees and skills. Do not speculate about industries or recruiters.";

pub const PARSING_SCORING: &str = "Scoring Guidelines:
- atsScore: 0-100 (share of standard fields a parser would extract correctly)
- jobMatchScore: 0-100 (how completely the extracted profile represents the candidate)
- Arrays: 3-6 items each. Leave industrySpecific and missingKeywords empty.";

pub const PARSING_PROMPT_TEMPLATE: &str = r#"Simulate how an ATS parser would read this resume text, field by field.

RESUME TEXT:
{resume_text}

REPORT:
1. atsScore: how reliably contact details, section headers, titles, employers, dates and education would be parsed.
2. jobMatchScore: how complete the resulting candidate profile would be.
3. strengths: fields that would parse cleanly.
4. missing: standard fields a parser would fail to find.
5. recommendations: concrete text changes that would fix parsing failures.
6. keywordAnalysis.matchedKeywords: skills a parser would extract into the skills field. matchPercentage: share of listed skills that would be recognized.
7. formatIssues: specific parsing hazards (ambiguous dates, merged columns, missing headers).

Report only technically verifiable parsing behavior."#;

pub const STRICT_MODE_INSTRUCTION: &str = "STRICT MODE: score conservatively. Deduct points \
for every parsing hazard and do not award credit for content that is implied rather than stated.";

pub const INCLUDE_WARNINGS_INSTRUCTION: &str = "Also list every non-fatal parsing warning \
(unusual characters, inconsistent date formats, ambiguous section names) under formatIssues.";
